//! Lesson plan domain models and DTOs.
//!
//! This module contains all data structures for the lesson plan review
//! workflow: the plan entity with its status/audit fields, the submit,
//! review, and copy request DTOs, and filtering parameters.
//!
//! A lesson plan is identified naturally by `(room_id, week_start,
//! schedule_type)`: one plan per room, per week, per schedule flavor. The
//! uniqueness is enforced by the database, so submitting twice lands on the
//! same row instead of creating a duplicate.

use crate::activities::ScheduledActivity;
use crate::ids::{LessonPlanId, LocationId, RoomId, TenantId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sproutplan_core::serde::{deserialize_optional_date, deserialize_optional_uuid};
use sproutplan_core::{PaginationMeta, PaginationParams};
use sqlx::{
    Database, Decode, Encode, FromRow, Type,
    postgres::PgTypeInfo,
};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Error type for lesson plan enum parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonPlanParseError {
    /// The string does not name a known plan status.
    UnknownStatus(String),
    /// The string does not name a known schedule type.
    UnknownScheduleType(String),
}

impl std::error::Error for LessonPlanParseError {}

impl fmt::Display for LessonPlanParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStatus(s) => write!(f, "Unknown plan status: {}", s),
            Self::UnknownScheduleType(s) => write!(f, "Unknown schedule type: {}", s),
        }
    }
}

// ============================================================================
// PlanStatus
// ============================================================================

/// Lifecycle state of a lesson plan.
///
/// None of the states is terminal: an approved or rejected plan can be
/// submitted again, which routes it back through review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
#[schema(example = "submitted")]
pub enum PlanStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl PlanStatus {
    /// Parse a status from its stored form.
    pub fn parse(s: &str) -> Result<Self, LessonPlanParseError> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(LessonPlanParseError::UnknownStatus(s.to_string())),
        }
    }

    /// The stored form of this status.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlanStatus {
    type Err = LessonPlanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx Type implementation for Postgres
impl Type<sqlx::Postgres> for PlanStatus {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

// SQLx Encode implementation
impl<'q> Encode<'q, sqlx::Postgres> for PlanStatus {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

// SQLx Decode implementation
impl<'r> Decode<'r, sqlx::Postgres> for PlanStatus {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

// Serde Deserialize via parse
impl<'de> Deserialize<'de> for PlanStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// ScheduleType
// ============================================================================

/// How a plan's week is sliced into activity slots.
///
/// Position-based plans number their slots; time-based plans give each
/// activity a start and end time. Both flavors can coexist for the same
/// room and week as independent plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[schema(example = "position-based")]
pub enum ScheduleType {
    #[serde(rename = "position-based")]
    PositionBased,
    #[serde(rename = "time-based")]
    TimeBased,
}

impl ScheduleType {
    /// Parse a schedule type from its stored form.
    pub fn parse(s: &str) -> Result<Self, LessonPlanParseError> {
        match s.to_lowercase().as_str() {
            "position-based" => Ok(Self::PositionBased),
            "time-based" => Ok(Self::TimeBased),
            _ => Err(LessonPlanParseError::UnknownScheduleType(s.to_string())),
        }
    }

    /// The stored form of this schedule type.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PositionBased => "position-based",
            Self::TimeBased => "time-based",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScheduleType {
    type Err = LessonPlanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx Type implementation for Postgres
impl Type<sqlx::Postgres> for ScheduleType {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

// SQLx Encode implementation
impl<'q> Encode<'q, sqlx::Postgres> for ScheduleType {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

// SQLx Decode implementation
impl<'r> Decode<'r, sqlx::Postgres> for ScheduleType {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

// Serde Deserialize via parse
impl<'de> Deserialize<'de> for ScheduleType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Entity
// ============================================================================

/// Lesson plan entity: one room's weekly plan under one schedule flavor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LessonPlan {
    /// Unique identifier for the plan
    pub id: LessonPlanId,
    /// Tenant the plan belongs to
    pub tenant_id: TenantId,
    /// Location of the room being planned
    pub location_id: LocationId,
    /// Room the plan covers
    pub room_id: RoomId,
    /// Teacher who owns the plan
    pub teacher_id: UserId,
    /// Monday of the planned week
    pub week_start: NaiveDate,
    /// Schedule flavor of the plan
    pub schedule_type: ScheduleType,
    /// Current lifecycle state
    pub status: PlanStatus,
    /// When the plan was last submitted for review
    pub submitted_at: Option<DateTime<Utc>>,
    /// Who last submitted the plan
    pub submitted_by: Option<UserId>,
    /// When the plan was approved
    pub approved_at: Option<DateTime<Utc>>,
    /// Who approved the plan
    pub approved_by: Option<UserId>,
    /// When the plan was rejected
    pub rejected_at: Option<DateTime<Utc>>,
    /// Who rejected the plan
    pub rejected_by: Option<UserId>,
    /// Reviewer notes from the last approve/reject
    pub review_notes: Option<String>,
    /// Timestamp when the plan was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the plan was last updated
    pub updated_at: DateTime<Utc>,
}

/// A lesson plan together with its scheduled activities.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LessonPlanWithActivities {
    #[serde(flatten)]
    pub plan: LessonPlan,
    pub activities: Vec<ScheduledActivity>,
}

// DTOs

/// DTO for submitting a lesson plan for review.
///
/// Identifies the plan by its natural key; the row is created on first
/// submission and reused afterwards.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitLessonPlanDto {
    /// Tenant to operate in - required for superadmins, taken from the
    /// token for everyone else
    pub tenant_id: Option<TenantId>,
    /// Location of the room being planned
    pub location_id: LocationId,
    /// Room the plan covers
    pub room_id: RoomId,
    /// Monday of the planned week
    pub week_start: NaiveDate,
    /// Schedule flavor of the plan
    pub schedule_type: ScheduleType,
}

/// DTO for approving a submitted lesson plan.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ApproveLessonPlanDto {
    /// Optional reviewer notes
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// DTO for rejecting a submitted lesson plan.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RejectLessonPlanDto {
    /// Reviewer notes explaining the rejection (required)
    #[validate(length(min = 1, max = 1000, message = "Review notes are required when rejecting"))]
    pub notes: String,
}

/// DTO for copying a lesson plan into other rooms.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CopyLessonPlanDto {
    /// Rooms to copy the plan into
    #[validate(length(min = 1, message = "At least one target room is required"))]
    pub target_room_ids: Vec<RoomId>,
    /// Monday of the week the copies are planned for
    pub target_week_start: NaiveDate,
}

/// A single room that could not receive a copy.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CopyConflict {
    /// Room that was skipped
    pub room_id: RoomId,
    /// Why the copy was skipped
    pub reason: String,
}

/// Outcome of a copy operation: copies that were created alongside the
/// rooms that already had a plan in the target slot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CopyLessonPlanResponse {
    pub created: Vec<LessonPlan>,
    pub conflicts: Vec<CopyConflict>,
}

/// Query parameters for filtering lesson plans.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct LessonPlanFilterParams {
    /// Tenant to list plans for (superadmins only)
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub tenant_id: Option<Uuid>,
    /// Filter by the Monday of the planned week
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub week_start: Option<NaiveDate>,
    /// Filter by location
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub location_id: Option<Uuid>,
    /// Filter by room
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub room_id: Option<Uuid>,
    /// Filter by lifecycle state
    pub status: Option<PlanStatus>,
    /// Pagination parameters
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing lesson plans.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedLessonPlansResponse {
    /// List of lesson plans
    pub data: Vec<LessonPlan>,
    /// Pagination metadata
    pub meta: PaginationMeta,
}
