//! Tenant, location, and room entities.
//!
//! These exist for referential integrity and scoping; there is no admin
//! CRUD surface for them here. The seeder and the test fixtures create them
//! directly.

use crate::ids::{LocationId, RoomId, TenantId};
use crate::lesson_plans::ScheduleType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Tenant entity: one childcare organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tenant {
    /// Unique identifier for the tenant
    pub id: TenantId,
    /// Display name of the organization
    pub name: String,
    /// Timestamp when the tenant was created
    pub created_at: DateTime<Utc>,
}

/// Location entity: one site of a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Location {
    /// Unique identifier for the location
    pub id: LocationId,
    /// Tenant the location belongs to
    pub tenant_id: TenantId,
    /// Display name of the location
    pub name: String,
    /// Schedule flavor new plans at this location default to
    pub default_schedule_type: ScheduleType,
    /// Timestamp when the location was created
    pub created_at: DateTime<Utc>,
}

/// Room entity: one classroom at a location.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Room {
    /// Unique identifier for the room
    pub id: RoomId,
    /// Tenant the room belongs to
    pub tenant_id: TenantId,
    /// Location the room is part of
    pub location_id: LocationId,
    /// Display name of the room
    pub name: String,
    /// Timestamp when the room was created
    pub created_at: DateTime<Utc>,
}
