//! CLI command implementations for administrative tasks.

pub mod seeder;

use sqlx::PgPool;
use uuid::Uuid;

use sproutplan_auth::create_access_token;
use sproutplan_config::JwtConfig;

/// Creates a superadmin account.
///
/// Superadmins carry no tenant and can only be created here, never through
/// the API.
pub async fn create_superadmin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Result<Uuid, Box<dyn std::error::Error>> {
    let id: Option<Uuid> = sqlx::query_scalar(
        "INSERT INTO users (first_name, last_name, email, role, tenant_id)
         VALUES ($1, $2, $3, 'superadmin', NULL)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .fetch_optional(db)
    .await?;

    id.ok_or_else(|| "User with this email already exists".into())
}

/// Mints an access token for an existing user, looked up by email.
///
/// The API has no login endpoint; tokens are issued out-of-band. This
/// command covers local development.
pub async fn mint_token(
    db: &PgPool,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let row: Option<(Uuid, Option<Uuid>, String)> =
        sqlx::query_as("SELECT id, tenant_id, role FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await?;

    let (user_id, tenant_id, role) = row.ok_or("No user with that email")?;

    let token = create_access_token(user_id, email, tenant_id, &role, jwt_config)
        .map_err(|e| format!("Failed to mint token: {}", e.error))?;

    Ok(token)
}
