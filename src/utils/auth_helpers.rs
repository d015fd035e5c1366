use sproutplan_core::AppError;
use sproutplan_models::TenantId;

use crate::middleware::auth::AuthUser;

/// Get the tenant_id for operations that require tenant scoping.
///
/// Superadmins carry no tenant in their JWT and must name the tenant they are
/// acting on. Everyone else is scoped to the tenant in their token; any
/// tenant_id they pass is ignored.
pub fn get_tenant_id_for_scoped_operation(
    auth_user: &AuthUser,
    specified_tenant_id: Option<TenantId>,
) -> Result<TenantId, AppError> {
    if auth_user.is_superadmin() {
        return specified_tenant_id.ok_or_else(|| {
            AppError::bad_request(anyhow::anyhow!(
                "Superadmin must specify a tenant_id for this operation"
            ))
        });
    }

    auth_user.tenant_id().ok_or_else(|| {
        AppError::forbidden(anyhow::anyhow!("User must be associated with a tenant"))
    })
}

/// Get optional tenant_id for operations on existing resources (get by id,
/// approve, reject, copy). Superadmins get None (no tenant filter), everyone
/// else gets their own tenant.
pub fn get_optional_tenant_filter(auth_user: &AuthUser) -> Result<Option<TenantId>, AppError> {
    if auth_user.is_superadmin() {
        return Ok(None);
    }

    let tenant_id = auth_user.tenant_id().ok_or_else(|| {
        AppError::forbidden(anyhow::anyhow!("User must be associated with a tenant"))
    })?;
    Ok(Some(tenant_id))
}
