use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use sproutplan_models::Role;

use super::models::{UserSeed, UsersPerTenant};

/// Generates user data in parallel using Rayon
///
/// Specs are laid out sequentially per tenant, then generated in parallel.
pub fn generate_users_parallel(
    tenant_ids: &[Uuid],
    users_per_tenant: &UsersPerTenant,
) -> Vec<UserSeed> {
    let total_users = tenant_ids.len()
        * (users_per_tenant.admins
            + users_per_tenant.directors
            + users_per_tenant.assistant_directors
            + users_per_tenant.teachers);

    let mut user_specs = Vec::with_capacity(total_users);

    for (tenant_idx, &tenant_id) in tenant_ids.iter().enumerate() {
        let mut user_idx = 0;
        for _ in 0..users_per_tenant.admins {
            user_specs.push((Role::Admin, tenant_id, tenant_idx, user_idx));
            user_idx += 1;
        }
        for _ in 0..users_per_tenant.directors {
            user_specs.push((Role::Director, tenant_id, tenant_idx, user_idx));
            user_idx += 1;
        }
        for _ in 0..users_per_tenant.assistant_directors {
            user_specs.push((Role::AssistantDirector, tenant_id, tenant_idx, user_idx));
            user_idx += 1;
        }
        for _ in 0..users_per_tenant.teachers {
            user_specs.push((Role::Teacher, tenant_id, tenant_idx, user_idx));
            user_idx += 1;
        }
    }

    user_specs
        .into_par_iter()
        .map(|(role, tenant_id, tenant_idx, user_idx)| {
            generate_user(role, tenant_id, tenant_idx, user_idx)
        })
        .collect()
}

fn generate_user(role: Role, tenant_id: Uuid, tenant_idx: usize, user_idx: usize) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let email = format!(
        "{}.{}+{}{}@example.com",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        role.as_str(),
        tenant_idx * 1000 + user_idx
    );

    UserSeed {
        first_name,
        last_name,
        email,
        role: role.as_str(),
        tenant_id,
    }
}

/// Seeds users for given tenants, returning (user_id, tenant_id, role)
pub async fn seed_users(
    db: &PgPool,
    tenant_ids: &[Uuid],
    users_per_tenant: &UsersPerTenant,
) -> Result<Vec<(Uuid, Uuid, &'static str)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("👥 Generating user data in parallel...");
    let users = generate_users_parallel(tenant_ids, users_per_tenant);

    let user_ids = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        user_ids.len(),
        start_time.elapsed()
    );

    Ok(user_ids
        .into_iter()
        .zip(users.iter())
        .map(|(id, seed)| (id, seed.tenant_id, seed.role))
        .collect())
}

async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 5 params per user keeps batches well under the Postgres param limit
    const BATCH_SIZE: usize = 1000;

    let mut all_ids = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        let ids = insert_users_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (first_name, last_name, email, role, tenant_id) VALUES ",
    );

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 5;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4,
            param_idx + 5
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(user.role)
            .bind(user.tenant_id);
    }

    let ids: Vec<Uuid> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}
