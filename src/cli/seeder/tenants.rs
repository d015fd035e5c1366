use fake::Fake;
use fake::faker::address::en::*;
use fake::faker::company::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{LocationSeed, RoomContext, RoomSeed, TenantSeed};

const ROOM_NAMES: [&str; 10] = [
    "Sunflowers",
    "Rainbows",
    "Busy Bees",
    "Explorers",
    "Caterpillars",
    "Butterflies",
    "Acorns",
    "Saplings",
    "Fireflies",
    "Cubs",
];

const SCHEDULE_TYPES: [&str; 2] = ["position-based", "time-based"];

/// Generates tenant data in parallel using Rayon
pub fn generate_tenants(count: usize) -> Vec<TenantSeed> {
    (0..count)
        .into_par_iter()
        .map(|_| {
            let company: String = CompanyName().fake();
            TenantSeed {
                name: format!("{} Early Learning", company),
            }
        })
        .collect()
}

/// Generates location data for tenants
///
/// Locations alternate their default schedule type so seeded data exercises
/// both plan layouts.
pub fn generate_locations(tenant_ids: &[Uuid], locations_per_tenant: usize) -> Vec<LocationSeed> {
    tenant_ids
        .par_iter()
        .flat_map(|&tenant_id| {
            (0..locations_per_tenant)
                .map(|i| {
                    let city: String = CityName().fake();
                    LocationSeed {
                        name: format!("{} Campus", city),
                        default_schedule_type: SCHEDULE_TYPES[i % SCHEDULE_TYPES.len()],
                        tenant_id,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Generates room data for locations
pub fn generate_rooms(locations: &[(Uuid, Uuid)], rooms_per_location: usize) -> Vec<RoomSeed> {
    locations
        .par_iter()
        .flat_map(|&(location_id, tenant_id)| {
            (0..rooms_per_location)
                .map(|i| {
                    let name = if i < ROOM_NAMES.len() {
                        ROOM_NAMES[i].to_string()
                    } else {
                        format!("Room {}", i + 1)
                    };

                    RoomSeed {
                        name,
                        tenant_id,
                        location_id,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Seeds tenants into the database
pub async fn seed_tenants(
    db: &PgPool,
    count: usize,
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏢 Seeding {} tenants...", count);

    let tenants = generate_tenants(count);
    let tenant_ids = insert_tenants_batch(db, &tenants).await?;

    println!(
        "   ✓ Inserted {} tenants in {:?}",
        tenant_ids.len(),
        start_time.elapsed()
    );

    Ok(tenant_ids)
}

/// Seeds locations for given tenants, returning (location_id, tenant_id,
/// default_schedule_type) in insertion order
pub async fn seed_locations(
    db: &PgPool,
    tenant_ids: &[Uuid],
    locations_per_tenant: usize,
) -> Result<Vec<(Uuid, Uuid, &'static str)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let total = tenant_ids.len() * locations_per_tenant;
    println!(
        "📍 Seeding {} locations ({} per tenant)...",
        total, locations_per_tenant
    );

    let locations = generate_locations(tenant_ids, locations_per_tenant);
    let location_ids = insert_locations_batch(db, &locations).await?;

    println!(
        "   ✓ Inserted {} locations in {:?}",
        location_ids.len(),
        start_time.elapsed()
    );

    Ok(location_ids
        .into_iter()
        .zip(locations.iter())
        .map(|(id, seed)| (id, seed.tenant_id, seed.default_schedule_type))
        .collect())
}

/// Seeds rooms for given locations, returning each room with its context
pub async fn seed_rooms(
    db: &PgPool,
    locations: &[(Uuid, Uuid, &'static str)],
    rooms_per_location: usize,
) -> Result<Vec<RoomContext>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let total = locations.len() * rooms_per_location;
    println!(
        "🚪 Seeding {} rooms ({} per location)...",
        total, rooms_per_location
    );

    let location_pairs: Vec<(Uuid, Uuid)> = locations
        .iter()
        .map(|&(location_id, tenant_id, _)| (location_id, tenant_id))
        .collect();
    let rooms = generate_rooms(&location_pairs, rooms_per_location);
    let room_ids = insert_rooms_batch(db, &rooms).await?;

    // Rooms come back in insertion order, so index math recovers each
    // room's location and schedule type
    let contexts = room_ids
        .into_iter()
        .enumerate()
        .map(|(i, room_id)| {
            let location_idx = i / rooms_per_location;
            let (location_id, tenant_id, schedule_type) = locations[location_idx];
            RoomContext {
                room_id,
                location_id,
                tenant_id,
                schedule_type,
            }
        })
        .collect();

    println!(
        "   ✓ Inserted {} rooms in {:?}",
        rooms.len(),
        start_time.elapsed()
    );

    Ok(contexts)
}

async fn insert_tenants_batch(
    db: &PgPool,
    tenants: &[TenantSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 500;
    let mut all_ids = Vec::with_capacity(tenants.len());

    for chunk in tenants.chunks(BATCH_SIZE) {
        let ids = insert_tenants_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_tenants_chunk(
    tx: &mut Transaction<'_, Postgres>,
    tenants: &[TenantSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if tenants.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO tenants (name) VALUES ");

    for i in 0..tenants.len() {
        if i > 0 {
            query.push_str(", ");
        }
        query.push_str(&format!("(${})", i + 1));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for tenant in tenants {
        q = q.bind(&tenant.name);
    }

    let ids: Vec<Uuid> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

async fn insert_locations_batch(
    db: &PgPool,
    locations: &[LocationSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 500;
    let mut all_ids = Vec::with_capacity(locations.len());

    for chunk in locations.chunks(BATCH_SIZE) {
        let ids = insert_locations_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_locations_chunk(
    tx: &mut Transaction<'_, Postgres>,
    locations: &[LocationSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if locations.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO locations (name, default_schedule_type, tenant_id) VALUES ");

    for i in 0..locations.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 3;
        query.push_str(&format!(
            "(${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for location in locations {
        q = q
            .bind(&location.name)
            .bind(location.default_schedule_type)
            .bind(location.tenant_id);
    }

    let ids: Vec<Uuid> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

async fn insert_rooms_batch(
    db: &PgPool,
    rooms: &[RoomSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 500;
    let mut all_ids = Vec::with_capacity(rooms.len());

    for chunk in rooms.chunks(BATCH_SIZE) {
        let ids = insert_rooms_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_rooms_chunk(
    tx: &mut Transaction<'_, Postgres>,
    rooms: &[RoomSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if rooms.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO rooms (name, tenant_id, location_id) VALUES ");

    for i in 0..rooms.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 3;
        query.push_str(&format!(
            "(${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for room in rooms {
        q = q
            .bind(&room.name)
            .bind(room.tenant_id)
            .bind(room.location_id);
    }

    let ids: Vec<Uuid> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}
