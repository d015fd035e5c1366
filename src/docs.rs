use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use sproutplan_core::pagination::{PaginationMeta, PaginationParams};
use sproutplan_models::{
    ApproveLessonPlanDto, CopyConflict, CopyLessonPlanDto, CopyLessonPlanResponse, LessonPlan,
    LessonPlanFilterParams, LessonPlanWithActivities, Notification, NotificationFilterParams,
    PaginatedLessonPlansResponse, PaginatedNotificationsResponse, PermissionCatalogEntry,
    PermissionOverride, PermissionOverrideFilterParams, PlanStatus, RejectLessonPlanDto, Role,
    ScheduleType, ScheduledActivity, SubmitLessonPlanDto, UpsertPermissionOverrideDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::lesson_plans::controller::get_lesson_plans,
        crate::modules::lesson_plans::controller::get_lesson_plan_by_id,
        crate::modules::lesson_plans::controller::submit_lesson_plan,
        crate::modules::lesson_plans::controller::approve_lesson_plan,
        crate::modules::lesson_plans::controller::reject_lesson_plan,
        crate::modules::lesson_plans::controller::copy_lesson_plan,
        crate::modules::permissions::controller::get_permission_overrides,
        crate::modules::permissions::controller::upsert_permission_override,
        crate::modules::permissions::controller::get_permission_catalog,
        crate::modules::notifications::controller::get_notifications,
        crate::modules::notifications::controller::mark_notification_read,
        crate::modules::notifications::controller::dismiss_notification,
    ),
    components(
        schemas(
            LessonPlan,
            LessonPlanWithActivities,
            ScheduledActivity,
            PlanStatus,
            ScheduleType,
            SubmitLessonPlanDto,
            ApproveLessonPlanDto,
            RejectLessonPlanDto,
            CopyLessonPlanDto,
            CopyConflict,
            CopyLessonPlanResponse,
            LessonPlanFilterParams,
            PaginatedLessonPlansResponse,
            Role,
            PermissionOverride,
            UpsertPermissionOverrideDto,
            PermissionOverrideFilterParams,
            PermissionCatalogEntry,
            Notification,
            NotificationFilterParams,
            PaginatedNotificationsResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Lesson Plans", description = "Weekly lesson plan submission and review workflow"),
        (name = "Settings", description = "Per-tenant permission override configuration"),
        (name = "Notifications", description = "In-app notifications for workflow events")
    ),
    info(
        title = "Sproutplan API",
        version = "0.1.0",
        description = "A multi-tenant childcare lesson planning API built with Rust, Axum, and PostgreSQL featuring a configurable review workflow.",
        contact(
            name = "API Support",
            email = "support@sproutplan.app"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
