//! Notification domain models and DTOs.
//!
//! Notifications are created by the review workflow (currently only when a
//! plan is returned to its submitter) and mutated only by their recipient,
//! who can mark them read or dismiss them.

use crate::ids::{LessonPlanId, NotificationId, TenantId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sproutplan_core::{PaginationMeta, PaginationParams};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Notification type for a lesson plan returned with review notes.
pub const LESSON_PLAN_RETURNED: &str = "lesson_plan_returned";

/// Notification entity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    /// Unique identifier for the notification
    pub id: NotificationId,
    /// Tenant the notification belongs to
    pub tenant_id: TenantId,
    /// Recipient of the notification
    pub user_id: UserId,
    /// Kind of event the notification reports
    pub notification_type: String,
    /// Plan the notification refers to, if any
    pub lesson_plan_id: Option<LessonPlanId>,
    /// Monday of the week the plan covers, if any
    pub week_start: Option<NaiveDate>,
    /// Short headline
    pub title: String,
    /// Human-readable body
    pub message: String,
    /// Reviewer notes carried along with the event
    pub review_notes: Option<String>,
    /// Whether the recipient has read the notification
    pub is_read: bool,
    /// Whether the recipient has dismissed the notification
    pub is_dismissed: bool,
    /// Timestamp when the notification was created
    pub created_at: DateTime<Utc>,
}

/// Query parameters for filtering notifications.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct NotificationFilterParams {
    /// Only return unread notifications
    pub unread: Option<bool>,
    /// Pagination parameters
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing notifications.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedNotificationsResponse {
    /// List of notifications, newest first
    pub data: Vec<Notification>,
    /// Pagination metadata
    pub meta: PaginationMeta,
}
