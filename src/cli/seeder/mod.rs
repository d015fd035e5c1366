//! Database seeding module for populating development data.
//!
//! This module provides functionality to seed the database with fake tenants,
//! locations, rooms, users, and lesson plans spread across the review
//! lifecycle.
//!
//! # Module Structure
//!
//! - [`tenants`] - Tenant, location, and room generation and insertion
//! - [`users`] - Staff generation across the role set
//! - [`plans`] - Lesson plan and activity generation
//! - [`models`] - Data structures for seeding configuration
//!
//! # Usage
//!
//! ```ignore
//! use sproutplan::cli::seeder::{SeedConfig, seed_all};
//!
//! let config = SeedConfig::new(5); // 5 tenants with defaults
//! seed_all(&db, config).await?;
//! ```
//!
//! # Performance
//!
//! - Parallel data generation using Rayon
//! - Batch inserts with multi-value INSERT statements
//! - Single transaction per batch
//! - Pre-allocated vectors to avoid reallocation overhead

pub mod models;
pub mod plans;
pub mod tenants;
pub mod users;

pub use models::{LocationsPerTenant, SeedConfig, UsersPerTenant};

use sqlx::PgPool;
use std::time::Instant;

/// Seeds the entire database with tenants, locations, rooms, users, and plans
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!("   - Tenants: {}", config.num_tenants);
    println!(
        "   - Locations per tenant: {}, rooms per location: {}",
        config.locations_per_tenant.count, config.locations_per_tenant.rooms_per_location
    );
    println!(
        "   - Users per tenant: {} admins, {} directors, {} assistant directors, {} teachers",
        config.users_per_tenant.admins,
        config.users_per_tenant.directors,
        config.users_per_tenant.assistant_directors,
        config.users_per_tenant.teachers
    );
    println!("   - Weeks of plans per room: {}", config.weeks_of_plans);
    println!();

    // Step 1: Tenancy hierarchy
    let tenant_ids = tenants::seed_tenants(db, config.num_tenants).await?;
    let locations =
        tenants::seed_locations(db, &tenant_ids, config.locations_per_tenant.count).await?;
    let rooms =
        tenants::seed_rooms(db, &locations, config.locations_per_tenant.rooms_per_location).await?;

    // Step 2: Staff
    let staff = users::seed_users(db, &tenant_ids, &config.users_per_tenant).await?;

    // Step 3: Lesson plans with activities
    let (num_plans, num_activities) =
        plans::seed_plans(db, &rooms, &staff, config.weeks_of_plans).await?;

    println!(
        "\n✅ Seeding complete! Created {} tenants, {} locations, {} rooms, {} users, \
         {} plans ({} activities) in {:?}",
        tenant_ids.len(),
        locations.len(),
        rooms.len(),
        staff.len(),
        num_plans,
        num_activities,
        start_time.elapsed()
    );
    println!("\n📝 Mint a token for any seeded user with: sproutplan-cli mint-token --email <email>");

    Ok(())
}

/// Clears all seeded data from the database
///
/// Preserves superadmins and uses a transaction for atomicity.
pub async fn clear_seeded_data(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;

    // Seeded users all carry a tenant and cascade with it, but this also
    // catches any example.com stragglers
    let users_deleted =
        sqlx::query("DELETE FROM users WHERE email LIKE '%@example.com' AND role <> 'superadmin'")
            .execute(&mut *tx)
            .await?
            .rows_affected();

    // Tenants cascade to locations, rooms, plans, activities, notifications,
    // and permission overrides
    let tenants_deleted = sqlx::query("DELETE FROM tenants")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} tenants and {} users in {:?}",
        tenants_deleted,
        users_deleted,
        start_time.elapsed()
    );
    println!("✅ Seeded data cleared successfully!");

    Ok(())
}
