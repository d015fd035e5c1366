//! # Sproutplan Models
//!
//! Domain models and DTOs for the Sproutplan API.
//!
//! This crate provides all data structures used throughout the Sproutplan
//! application, including database entities, request/response DTOs, and
//! validation schemas.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed ID newtypes for every entity
//! - [`roles`]: The closed role set and role name normalization
//! - [`lesson_plans`]: Lesson plan entity, lifecycle enums, and workflow DTOs
//! - [`activities`]: Scheduled activity entity
//! - [`permission_overrides`]: Tenant permission override entity and DTOs
//! - [`notifications`]: Notification entity and DTOs
//! - [`tenancy`]: Tenant, location, and room entities
//! - [`users`]: User entity
//!
//! # Example
//!
//! ```ignore
//! use sproutplan_models::lesson_plans::{LessonPlan, PlanStatus, SubmitLessonPlanDto};
//! use sproutplan_models::roles::Role;
//!
//! let role: Role = "Assistant Director".parse()?;
//! assert_eq!(role.as_str(), "assistant_director");
//! ```

pub mod activities;
pub mod ids;
pub mod lesson_plans;
pub mod notifications;
pub mod permission_overrides;
pub mod roles;
pub mod tenancy;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use ids::{
    ActivityId, LessonPlanId, LocationId, NotificationId, PermissionOverrideId, RoomId, TenantId,
    UserId,
};

pub use roles::{Role, RoleParseError, normalize_role};

pub use lesson_plans::{
    ApproveLessonPlanDto, CopyConflict, CopyLessonPlanDto, CopyLessonPlanResponse, LessonPlan,
    LessonPlanFilterParams, LessonPlanParseError, LessonPlanWithActivities,
    PaginatedLessonPlansResponse, PlanStatus, RejectLessonPlanDto, ScheduleType,
    SubmitLessonPlanDto,
};

pub use activities::ScheduledActivity;

pub use permission_overrides::{
    PermissionCatalogEntry, PermissionOverride, PermissionOverrideFilterParams,
    UpsertPermissionOverrideDto,
};

pub use notifications::{
    LESSON_PLAN_RETURNED, Notification, NotificationFilterParams, PaginatedNotificationsResponse,
};

pub use tenancy::{Location, Room, Tenant};

pub use users::User;
