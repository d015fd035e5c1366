use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use sproutplan_core::AppError;
use sproutplan_core::permissions::{
    LESSON_PLAN_APPROVE, LESSON_PLAN_COPY, LESSON_PLAN_REJECT, LESSON_PLAN_SUBMIT,
    LESSON_PLAN_VIEW,
};
use sproutplan_models::{
    ApproveLessonPlanDto, CopyLessonPlanDto, CopyLessonPlanResponse, LessonPlan,
    LessonPlanFilterParams, LessonPlanId, LessonPlanWithActivities,
    PaginatedLessonPlansResponse, RejectLessonPlanDto, SubmitLessonPlanDto, TenantId,
};

use crate::middleware::auth::AuthUser;
use crate::modules::lesson_plans::service::LessonPlanService;
use crate::modules::permissions::service::PermissionService;
use crate::state::AppState;
use crate::utils::auth_helpers::{get_optional_tenant_filter, get_tenant_id_for_scoped_operation};
use crate::validator::ValidatedJson;

/// List lesson plans
#[utoipa::path(
    get,
    path = "/api/lesson-plans",
    summary = "List lesson plans",
    params(LessonPlanFilterParams),
    responses(
        (status = 200, description = "Lesson plans, newest week first", body = PaginatedLessonPlansResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires lesson_plan.view")
    ),
    tag = "Lesson Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_lesson_plans(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<LessonPlanFilterParams>,
) -> Result<Json<PaginatedLessonPlansResponse>, AppError> {
    // Superadmins read across tenants and may narrow with ?tenant_id;
    // everyone else is checked and scoped within their own tenant
    let tenant_filter = match get_optional_tenant_filter(&auth_user)? {
        None => filters.tenant_id.map(TenantId::from),
        Some(tenant_id) => {
            PermissionService::authorize(
                &state.db,
                state.cache.as_ref(),
                tenant_id,
                auth_user.role_name(),
                LESSON_PLAN_VIEW,
            )
            .await?;
            Some(tenant_id)
        }
    };

    let plans = LessonPlanService::get_lesson_plans(&state.db, tenant_filter, filters).await?;

    Ok(Json(plans))
}

/// Get a lesson plan with its activities
#[utoipa::path(
    get,
    path = "/api/lesson-plans/{id}",
    summary = "Get lesson plan",
    params(
        ("id" = Uuid, Path, description = "Lesson plan ID")
    ),
    responses(
        (status = 200, description = "Plan with activities in schedule order", body = LessonPlanWithActivities),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires lesson_plan.view"),
        (status = 404, description = "Lesson plan not found")
    ),
    tag = "Lesson Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_lesson_plan_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LessonPlanWithActivities>, AppError> {
    let tenant_filter = get_optional_tenant_filter(&auth_user)?;
    if let Some(tenant_id) = tenant_filter {
        PermissionService::authorize(
            &state.db,
            state.cache.as_ref(),
            tenant_id,
            auth_user.role_name(),
            LESSON_PLAN_VIEW,
        )
        .await?;
    }

    let plan = LessonPlanService::get_plan_with_activities(
        &state.db,
        tenant_filter,
        LessonPlanId::from(id),
    )
    .await?;

    Ok(Json(plan))
}

/// Submit a lesson plan for review
#[utoipa::path(
    post,
    path = "/api/lesson-plans/submit",
    summary = "Submit lesson plan",
    request_body = SubmitLessonPlanDto,
    responses(
        (status = 200, description = "Plan submitted; status shows whether it was auto-approved", body = LessonPlan),
        (status = 400, description = "week_start is not a Monday or room/location mismatch"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires lesson_plan.submit"),
        (status = 404, description = "Room not found")
    ),
    tag = "Lesson Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn submit_lesson_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<SubmitLessonPlanDto>,
) -> Result<Json<LessonPlan>, AppError> {
    let tenant_id = get_tenant_id_for_scoped_operation(&auth_user, dto.tenant_id)?;
    let actor = auth_user.user_id()?;

    PermissionService::authorize(
        &state.db,
        state.cache.as_ref(),
        tenant_id,
        auth_user.role_name(),
        LESSON_PLAN_SUBMIT,
    )
    .await?;

    let plan = LessonPlanService::submit_plan(
        &state.db,
        state.cache.as_ref(),
        tenant_id,
        actor,
        auth_user.role_name(),
        dto,
    )
    .await?;

    Ok(Json(plan))
}

/// Approve a submitted lesson plan
#[utoipa::path(
    post,
    path = "/api/lesson-plans/{id}/approve",
    summary = "Approve lesson plan",
    params(
        ("id" = Uuid, Path, description = "Lesson plan ID")
    ),
    request_body = ApproveLessonPlanDto,
    responses(
        (status = 200, description = "Plan approved", body = LessonPlan),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires lesson_plan.approve"),
        (status = 404, description = "Lesson plan not found"),
        (status = 409, description = "Plan is not waiting for review")
    ),
    tag = "Lesson Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn approve_lesson_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ApproveLessonPlanDto>,
) -> Result<Json<LessonPlan>, AppError> {
    let reviewer = auth_user.user_id()?;
    let tenant_filter = get_optional_tenant_filter(&auth_user)?;
    if let Some(tenant_id) = tenant_filter {
        PermissionService::authorize(
            &state.db,
            state.cache.as_ref(),
            tenant_id,
            auth_user.role_name(),
            LESSON_PLAN_APPROVE,
        )
        .await?;
    }

    let plan = LessonPlanService::approve_plan(
        &state.db,
        tenant_filter,
        reviewer,
        LessonPlanId::from(id),
        dto,
    )
    .await?;

    Ok(Json(plan))
}

/// Reject a submitted lesson plan with notes
#[utoipa::path(
    post,
    path = "/api/lesson-plans/{id}/reject",
    summary = "Reject lesson plan",
    params(
        ("id" = Uuid, Path, description = "Lesson plan ID")
    ),
    request_body = RejectLessonPlanDto,
    responses(
        (status = 200, description = "Plan rejected and submitter notified", body = LessonPlan),
        (status = 400, description = "Review notes are blank"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires lesson_plan.reject"),
        (status = 404, description = "Lesson plan not found"),
        (status = 409, description = "Plan is not submitted")
    ),
    tag = "Lesson Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn reject_lesson_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<RejectLessonPlanDto>,
) -> Result<Json<LessonPlan>, AppError> {
    let reviewer = auth_user.user_id()?;
    let tenant_filter = get_optional_tenant_filter(&auth_user)?;
    if let Some(tenant_id) = tenant_filter {
        PermissionService::authorize(
            &state.db,
            state.cache.as_ref(),
            tenant_id,
            auth_user.role_name(),
            LESSON_PLAN_REJECT,
        )
        .await?;
    }

    let plan = LessonPlanService::reject_plan(
        &state.db,
        tenant_filter,
        reviewer,
        LessonPlanId::from(id),
        dto,
    )
    .await?;

    Ok(Json(plan))
}

/// Copy a lesson plan into other rooms
#[utoipa::path(
    post,
    path = "/api/lesson-plans/{id}/copy",
    summary = "Copy lesson plan",
    params(
        ("id" = Uuid, Path, description = "Source lesson plan ID")
    ),
    request_body = CopyLessonPlanDto,
    responses(
        (status = 200, description = "Drafts created; rooms that already had a plan are listed as conflicts", body = CopyLessonPlanResponse),
        (status = 400, description = "target_week_start is not a Monday"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires lesson_plan.copy"),
        (status = 404, description = "Source plan not found")
    ),
    tag = "Lesson Plans",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn copy_lesson_plan(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CopyLessonPlanDto>,
) -> Result<Json<CopyLessonPlanResponse>, AppError> {
    let actor = auth_user.user_id()?;
    let tenant_filter = get_optional_tenant_filter(&auth_user)?;
    if let Some(tenant_id) = tenant_filter {
        PermissionService::authorize(
            &state.db,
            state.cache.as_ref(),
            tenant_id,
            auth_user.role_name(),
            LESSON_PLAN_COPY,
        )
        .await?;
    }

    let response = LessonPlanService::copy_plan(
        &state.db,
        tenant_filter,
        actor,
        LessonPlanId::from(id),
        dto,
    )
    .await?;

    Ok(Json(response))
}
