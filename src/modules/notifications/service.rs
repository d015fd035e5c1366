use sqlx::PgPool;
use tracing::{debug, error, info, instrument};

use sproutplan_core::{AppError, PaginationMeta};
use sproutplan_models::{
    LESSON_PLAN_RETURNED, LessonPlan, Notification, NotificationFilterParams,
    NotificationId, PaginatedNotificationsResponse, UserId,
};

pub struct NotificationService;

impl NotificationService {
    /// Write a `lesson_plan_returned` notification for a rejected plan.
    ///
    /// Runs inside the caller's transaction so the notification lands if and
    /// only if the rejection does.
    pub async fn create_lesson_plan_returned(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        plan: &LessonPlan,
        recipient: UserId,
        notes: &str,
    ) -> Result<Notification, AppError> {
        let message = format!(
            "Your lesson plan for the week of {} was returned with feedback",
            plan.week_start
        );

        let notification = sqlx::query_as::<_, Notification>(
            r#"INSERT INTO notifications
               (tenant_id, user_id, notification_type, lesson_plan_id, week_start, title, message, review_notes)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id, tenant_id, user_id, notification_type, lesson_plan_id, week_start,
                         title, message, review_notes, is_read, is_dismissed, created_at"#,
        )
        .bind(plan.tenant_id)
        .bind(recipient)
        .bind(LESSON_PLAN_RETURNED)
        .bind(plan.id)
        .bind(plan.week_start)
        .bind("Lesson plan returned")
        .bind(&message)
        .bind(notes)
        .fetch_one(&mut **tx)
        .await?;

        crate::metrics::track_notification_created(LESSON_PLAN_RETURNED);

        debug!(
            notification.id = %notification.id,
            user.id = %recipient,
            plan.id = %plan.id,
            "Created lesson_plan_returned notification"
        );

        Ok(notification)
    }

    /// List a user's notifications, newest first. Dismissed ones are
    /// excluded; `unread=true` narrows to unread.
    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "notifications"))]
    pub async fn get_notifications(
        db: &PgPool,
        user_id: UserId,
        filters: NotificationFilterParams,
    ) -> Result<PaginatedNotificationsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::from(" WHERE user_id = $1 AND is_dismissed = FALSE");
        if filters.unread == Some(true) {
            where_clause.push_str(" AND is_read = FALSE");
        }

        let count_query = format!("SELECT COUNT(*) FROM notifications{}", where_clause);
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(user_id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error counting notifications");
                AppError::from(e)
            })?;

        let data_query = format!(
            "SELECT id, tenant_id, user_id, notification_type, lesson_plan_id, week_start,
                    title, message, review_notes, is_read, is_dismissed, created_at
             FROM notifications{}
             ORDER BY created_at DESC
             LIMIT {} OFFSET {}",
            where_clause, limit, offset
        );
        let notifications = sqlx::query_as::<_, Notification>(&data_query)
            .bind(user_id)
            .fetch_all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error fetching notifications");
                AppError::from(e)
            })?;

        let has_more = offset + limit < total;

        debug!(
            total = %total,
            returned = %notifications.len(),
            "Fetched notifications"
        );

        Ok(PaginatedNotificationsResponse {
            data: notifications,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: filters.pagination.page(),
                has_more,
            },
        })
    }

    /// Mark one of the user's notifications as read.
    #[instrument(skip(db), fields(db.operation = "UPDATE", db.table = "notifications"))]
    pub async fn mark_read(
        db: &PgPool,
        user_id: UserId,
        id: NotificationId,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"UPDATE notifications SET is_read = TRUE
               WHERE id = $1 AND user_id = $2
               RETURNING id, tenant_id, user_id, notification_type, lesson_plan_id, week_start,
                         title, message, review_notes, is_read, is_dismissed, created_at"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Notification not found")))?;

        Ok(notification)
    }

    /// Dismiss one of the user's notifications. Dismissed notifications stop
    /// appearing in listings but stay in the table.
    #[instrument(skip(db), fields(db.operation = "UPDATE", db.table = "notifications"))]
    pub async fn dismiss(
        db: &PgPool,
        user_id: UserId,
        id: NotificationId,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"UPDATE notifications SET is_dismissed = TRUE
               WHERE id = $1 AND user_id = $2
               RETURNING id, tenant_id, user_id, notification_type, lesson_plan_id, week_start,
                         title, message, review_notes, is_read, is_dismissed, created_at"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Notification not found")))?;

        info!(notification.id = %notification.id, "Notification dismissed");

        Ok(notification)
    }
}
