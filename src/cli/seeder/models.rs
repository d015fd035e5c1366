use chrono::NaiveDate;
use uuid::Uuid;

pub struct TenantSeed {
    pub name: String,
}

pub struct LocationSeed {
    pub name: String,
    pub default_schedule_type: &'static str,
    pub tenant_id: Uuid,
}

pub struct RoomSeed {
    pub name: String,
    pub tenant_id: Uuid,
    pub location_id: Uuid,
}

/// Room with the context needed to seed plans into it.
#[derive(Clone, Copy)]
pub struct RoomContext {
    pub room_id: Uuid,
    pub location_id: Uuid,
    pub tenant_id: Uuid,
    pub schedule_type: &'static str,
}

pub struct UserSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: &'static str,
    pub tenant_id: Uuid,
}

pub struct PlanSeed {
    pub tenant_id: Uuid,
    pub location_id: Uuid,
    pub room_id: Uuid,
    pub teacher_id: Uuid,
    pub week_start: NaiveDate,
    pub schedule_type: &'static str,
    pub status: &'static str,
    pub submitted_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
}

pub struct ActivitySeed {
    pub lesson_plan_id: Uuid,
    pub day_of_week: i16,
    pub position: Option<i16>,
    pub start_time: Option<chrono::NaiveTime>,
    pub end_time: Option<chrono::NaiveTime>,
    pub title: &'static str,
    pub category: &'static str,
}

#[derive(Clone)]
pub struct UsersPerTenant {
    pub admins: usize,
    pub directors: usize,
    pub assistant_directors: usize,
    pub teachers: usize,
}

impl Default for UsersPerTenant {
    fn default() -> Self {
        Self {
            admins: 1,
            directors: 1,
            assistant_directors: 1,
            teachers: 4,
        }
    }
}

#[derive(Clone)]
pub struct LocationsPerTenant {
    pub count: usize,
    pub rooms_per_location: usize,
}

impl Default for LocationsPerTenant {
    fn default() -> Self {
        Self {
            count: 2,              // e.g., Main Street, Riverside
            rooms_per_location: 3, // e.g., Sunflowers, Rainbows, Busy Bees
        }
    }
}

#[derive(Clone)]
pub struct SeedConfig {
    pub num_tenants: usize,
    pub locations_per_tenant: LocationsPerTenant,
    pub users_per_tenant: UsersPerTenant,
    /// How many recent weeks get a lesson plan per room
    pub weeks_of_plans: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_tenants: 0,
            locations_per_tenant: LocationsPerTenant::default(),
            users_per_tenant: UsersPerTenant::default(),
            weeks_of_plans: 2,
        }
    }
}

impl SeedConfig {
    pub fn new(num_tenants: usize) -> Self {
        Self {
            num_tenants,
            ..Default::default()
        }
    }

    pub fn with_users(mut self, users: UsersPerTenant) -> Self {
        self.users_per_tenant = users;
        self
    }

    pub fn with_locations(mut self, locations: LocationsPerTenant) -> Self {
        self.locations_per_tenant = locations;
        self
    }

    pub fn with_weeks(mut self, weeks: usize) -> Self {
        self.weeks_of_plans = weeks;
        self
    }

    pub fn total_rooms_per_tenant(&self) -> usize {
        self.locations_per_tenant.count * self.locations_per_tenant.rooms_per_location
    }

    pub fn total_users_per_tenant(&self) -> usize {
        self.users_per_tenant.admins
            + self.users_per_tenant.directors
            + self.users_per_tenant.assistant_directors
            + self.users_per_tenant.teachers
    }

    pub fn total_plans(&self) -> usize {
        self.num_tenants * self.total_rooms_per_tenant() * self.weeks_of_plans
    }
}
