//! Scheduled activity domain model.
//!
//! Activities are the contents of a lesson plan: one row per planned
//! activity, keyed into the week by day plus either a position (for
//! position-based plans) or a start/end time (for time-based plans). The
//! review workflow treats them as opaque; only `copy` touches them, by
//! duplicating their structure into the new plans.

use crate::ids::{ActivityId, LessonPlanId};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Scheduled activity entity: one slot of a lesson plan's week.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScheduledActivity {
    /// Unique identifier for the activity
    pub id: ActivityId,
    /// Plan the activity belongs to
    pub lesson_plan_id: LessonPlanId,
    /// Day of the planned week (0 = Monday .. 6 = Sunday)
    pub day_of_week: i16,
    /// Slot index within the day (position-based plans)
    pub position: Option<i16>,
    /// Start time of the slot (time-based plans)
    pub start_time: Option<NaiveTime>,
    /// End time of the slot (time-based plans)
    pub end_time: Option<NaiveTime>,
    /// Title of the activity
    pub title: String,
    /// Optional activity category (e.g. "outdoor", "art")
    pub category: Option<String>,
    /// Optional free-form description
    pub description: Option<String>,
    /// Whether the activity was marked completed in the classroom
    pub is_completed: bool,
    /// Optional teacher rating after running the activity (1-5)
    pub rating: Option<i16>,
    /// Timestamp when the activity was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the activity was last updated
    pub updated_at: DateTime<Utc>,
}
