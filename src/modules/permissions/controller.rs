use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use sproutplan_core::AppError;
use sproutplan_core::permissions::{PERMISSION_OVERRIDE_MANAGE, PERMISSION_OVERRIDE_VIEW};
use sproutplan_models::{
    PermissionCatalogEntry, PermissionOverride, PermissionOverrideFilterParams, TenantId,
    UpsertPermissionOverrideDto,
};

use crate::middleware::auth::AuthUser;
use crate::modules::permissions::service::PermissionService;
use crate::state::AppState;
use crate::utils::auth_helpers::get_tenant_id_for_scoped_operation;
use crate::validator::ValidatedJson;

/// List a tenant's permission overrides
#[utoipa::path(
    get,
    path = "/api/settings/permission-overrides",
    summary = "List permission overrides",
    params(PermissionOverrideFilterParams),
    responses(
        (status = 200, description = "Overrides configured for the tenant", body = Vec<PermissionOverride>),
        (status = 400, description = "Missing tenant_id for superadmin"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires permission_override.view")
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_permission_overrides(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PermissionOverrideFilterParams>,
) -> Result<Json<Vec<PermissionOverride>>, AppError> {
    let tenant_id =
        get_tenant_id_for_scoped_operation(&auth_user, params.tenant_id.map(TenantId::from))?;

    PermissionService::authorize(
        &state.db,
        state.cache.as_ref(),
        tenant_id,
        auth_user.role_name(),
        PERMISSION_OVERRIDE_VIEW,
    )
    .await?;

    let overrides =
        PermissionService::list_overrides(&state.db, state.cache.as_ref(), tenant_id).await?;

    Ok(Json(overrides))
}

/// Create or update a permission override
#[utoipa::path(
    post,
    path = "/api/settings/permission-overrides",
    summary = "Upsert permission override",
    request_body = UpsertPermissionOverrideDto,
    responses(
        (status = 200, description = "Override saved", body = PermissionOverride),
        (status = 400, description = "Missing tenant_id for superadmin"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires permission_override.manage"),
        (status = 404, description = "Override id not found for this tenant"),
        (status = 409, description = "Another override already uses this permission name"),
        (status = 422, description = "Unknown permission or superadmin in a role set")
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn upsert_permission_override(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpsertPermissionOverrideDto>,
) -> Result<Json<PermissionOverride>, AppError> {
    let tenant_id = get_tenant_id_for_scoped_operation(&auth_user, dto.tenant_id)?;
    let updated_by = auth_user.user_id()?;

    PermissionService::authorize(
        &state.db,
        state.cache.as_ref(),
        tenant_id,
        auth_user.role_name(),
        PERMISSION_OVERRIDE_MANAGE,
    )
    .await?;

    let saved = PermissionService::upsert_override(
        &state.db,
        state.cache.as_ref(),
        tenant_id,
        updated_by,
        dto,
    )
    .await?;

    Ok(Json(saved))
}

/// The permission catalog with registry defaults
#[utoipa::path(
    get,
    path = "/api/settings/permissions",
    summary = "List permission catalog",
    params(PermissionOverrideFilterParams),
    responses(
        (status = 200, description = "All configurable permissions with their default role sets", body = Vec<PermissionCatalogEntry>),
        (status = 400, description = "Missing tenant_id for superadmin"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires permission_override.view")
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_permission_catalog(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PermissionOverrideFilterParams>,
) -> Result<Json<Vec<PermissionCatalogEntry>>, AppError> {
    let tenant_id =
        get_tenant_id_for_scoped_operation(&auth_user, params.tenant_id.map(TenantId::from))?;

    PermissionService::authorize(
        &state.db,
        state.cache.as_ref(),
        tenant_id,
        auth_user.role_name(),
        PERMISSION_OVERRIDE_VIEW,
    )
    .await?;

    Ok(Json(PermissionService::catalog()))
}
