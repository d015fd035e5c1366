use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{dismiss_notification, get_notifications, mark_notification_read};

/// Initialize the notifications router
/// Routes: GET /, POST /{id}/read, POST /{id}/dismiss
pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_notifications))
        .route("/{id}/read", post(mark_notification_read))
        .route("/{id}/dismiss", post(dismiss_notification))
}
