//! Permission override domain models and DTOs.
//!
//! A permission override is a tenant's customization of one permission's
//! role sets: `roles_required` performs the action but lands in review,
//! `auto_approve_roles` performs it and skips review. A role never appears
//! in both sets; the upsert path keeps that true by construction.

use crate::ids::{PermissionOverrideId, TenantId, UserId};
use crate::roles::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sproutplan_core::RegistryEntry;
use sproutplan_core::serde::deserialize_optional_uuid;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Permission override entity: one tenant's configuration for one permission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PermissionOverride {
    /// Unique identifier for the override
    pub id: PermissionOverrideId,
    /// Tenant the override applies to
    pub tenant_id: TenantId,
    /// Full permission name (`resource.action`)
    pub permission_name: String,
    /// Roles that perform the action through review
    pub roles_required: Vec<Role>,
    /// Roles that perform the action and skip review
    pub auto_approve_roles: Vec<Role>,
    /// Who last changed the override
    pub updated_by: Option<UserId>,
    /// Timestamp when the override was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the override was last updated
    pub updated_at: DateTime<Utc>,
}

impl PermissionOverride {
    /// Whether the role goes through review under this override.
    #[inline]
    pub fn requires(&self, role: Role) -> bool {
        self.roles_required.contains(&role)
    }

    /// Whether the role skips review under this override.
    #[inline]
    pub fn auto_approves(&self, role: Role) -> bool {
        self.auto_approve_roles.contains(&role)
    }
}

// DTOs

/// DTO for creating or updating a permission override.
///
/// With an `id` the existing override is updated in place; without one a
/// new override is created for `(tenant, permission_name)`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertPermissionOverrideDto {
    /// Existing override to update, if any
    pub id: Option<PermissionOverrideId>,
    /// Tenant to operate in - required for superadmins, taken from the
    /// token for everyone else
    pub tenant_id: Option<TenantId>,
    /// Full permission name (`resource.action`)
    #[validate(length(min = 1, max = 100))]
    pub permission_name: String,
    /// Roles that perform the action through review
    #[serde(default)]
    pub roles_required: Vec<Role>,
    /// Roles that perform the action and skip review
    #[serde(default)]
    pub auto_approve_roles: Vec<Role>,
}

/// Query parameters for settings endpoints.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct PermissionOverrideFilterParams {
    /// Tenant to operate in - required for superadmins, ignored for
    /// tenant-scoped users
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub tenant_id: Option<Uuid>,
}

/// One permission's catalog entry as served by the settings API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionCatalogEntry {
    /// Full permission name (`resource.action`)
    pub name: String,
    /// Resource the permission applies to
    pub resource: String,
    /// Action on the resource
    pub action: String,
    /// Roles granted the permission when no override exists
    pub default_roles: Vec<String>,
    /// Roles whose submissions bypass review when no override exists
    pub default_auto_approve_roles: Vec<String>,
}

impl From<&RegistryEntry> for PermissionCatalogEntry {
    fn from(entry: &RegistryEntry) -> Self {
        Self {
            name: entry.name.to_string(),
            resource: entry.resource.to_string(),
            action: entry.action.to_string(),
            default_roles: entry.default_roles.iter().map(|r| r.to_string()).collect(),
            default_auto_approve_roles: entry
                .default_auto_approve_roles
                .iter()
                .map(|r| r.to_string())
                .collect(),
        }
    }
}
