//! User entity.
//!
//! Users exist for referential integrity, audit fields, and notification
//! recipients. There is no account management surface: principals arrive in
//! verified bearer tokens, and the seeder creates the rows.

use crate::ids::{TenantId, UserId};
use crate::roles::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// User entity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    /// Unique identifier for the user
    pub id: UserId,
    /// Tenant the user belongs to; `None` for superadmins
    pub tenant_id: Option<TenantId>,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Role within the tenant
    pub role: Role,
    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
