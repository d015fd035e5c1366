use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use sproutplan_core::AppError;
use sproutplan_models::{
    Notification, NotificationFilterParams, NotificationId, PaginatedNotificationsResponse,
};

use crate::middleware::auth::AuthUser;
use crate::modules::notifications::service::NotificationService;
use crate::state::AppState;

/// List the current user's notifications
#[utoipa::path(
    get,
    path = "/api/notifications",
    summary = "List notifications",
    params(NotificationFilterParams),
    responses(
        (status = 200, description = "Notifications, newest first", body = PaginatedNotificationsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_notifications(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<NotificationFilterParams>,
) -> Result<Json<PaginatedNotificationsResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let notifications = NotificationService::get_notifications(&state.db, user_id, filters).await?;

    Ok(Json(notifications))
}

/// Mark a notification as read
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    summary = "Mark notification read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    let user_id = auth_user.user_id()?;
    let notification =
        NotificationService::mark_read(&state.db, user_id, NotificationId::from(id)).await?;

    Ok(Json(notification))
}

/// Dismiss a notification
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/dismiss",
    summary = "Dismiss notification",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification dismissed", body = Notification),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn dismiss_notification(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    let user_id = auth_user.user_id()?;
    let notification =
        NotificationService::dismiss(&state.db, user_id, NotificationId::from(id)).await?;

    Ok(Json(notification))
}
