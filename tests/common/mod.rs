use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::Request;
use sproutplan_auth::create_access_token;
use sproutplan_config::JwtConfig;
use sproutplan_models::{LessonPlanId, LocationId, RoomId, TenantId, UserId};
#[allow(unused_imports)]
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Secret shared by the test app state and every token the tests mint.
pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-characters-long";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry: 3600,
    }
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub role: String,
    pub tenant_id: Option<TenantId>,
}

#[allow(dead_code)]
pub struct TestRoom {
    pub id: RoomId,
    pub location_id: LocationId,
    pub tenant_id: TenantId,
}

pub async fn create_test_tenant(tx: &mut Transaction<'_, Postgres>) -> TenantId {
    sqlx::query_scalar::<_, TenantId>(
        r#"
        INSERT INTO tenants (name)
        VALUES ($1)
        RETURNING id
        "#,
    )
    .bind(generate_unique_tenant_name())
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

/// Create a test user with the given role slug.
/// Pass `tenant_id: None` only for the "superadmin" role.
pub async fn create_test_user(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    role: &str,
    tenant_id: Option<TenantId>,
) -> TestUser {
    let id = sqlx::query_scalar::<_, UserId>(
        r#"
        INSERT INTO users (tenant_id, first_name, last_name, email, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(tenant_id)
    .bind("Test")
    .bind("User")
    .bind(email)
    .bind(role)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        role: role.to_string(),
        tenant_id,
    }
}

/// Create a location with one room under the given tenant.
#[allow(dead_code)]
pub async fn create_test_room(tx: &mut Transaction<'_, Postgres>, tenant_id: TenantId) -> TestRoom {
    let location_id = sqlx::query_scalar::<_, LocationId>(
        r#"
        INSERT INTO locations (tenant_id, name)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(tenant_id)
    .bind(format!("Location {}", Uuid::new_v4()))
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    let id = sqlx::query_scalar::<_, RoomId>(
        r#"
        INSERT INTO rooms (tenant_id, location_id, name)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(tenant_id)
    .bind(location_id)
    .bind(format!("Room {}", Uuid::new_v4()))
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestRoom {
        id,
        location_id,
        tenant_id,
    }
}

/// Insert a lesson plan directly in the given review status.
#[allow(dead_code)]
pub async fn create_test_plan(
    tx: &mut Transaction<'_, Postgres>,
    room: &TestRoom,
    teacher_id: UserId,
    week_start: chrono::NaiveDate,
    status: &str,
) -> LessonPlanId {
    sqlx::query_scalar::<_, LessonPlanId>(
        r#"
        INSERT INTO lesson_plans
            (tenant_id, location_id, room_id, teacher_id, week_start, schedule_type,
             status, submitted_at, submitted_by)
        VALUES ($1, $2, $3, $4, $5, 'position-based', $6,
                CASE WHEN $6 <> 'draft' THEN NOW() END,
                CASE WHEN $6 <> 'draft' THEN $4 END)
        RETURNING id
        "#,
    )
    .bind(room.tenant_id)
    .bind(room.location_id)
    .bind(room.id)
    .bind(teacher_id)
    .bind(week_start)
    .bind(status)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn generate_unique_tenant_name() -> String {
    format!("Test Tenant {}", Uuid::new_v4())
}

/// Mint an access token for a test user, signed with the test secret.
pub fn mint_token(user: &TestUser) -> String {
    create_access_token(
        user.id.into(),
        &user.email,
        user.tenant_id.map(Uuid::from),
        &user.role,
        &test_jwt_config(),
    )
    .unwrap()
}

/// Attach peer connect info to a hand-built request.
///
/// The rate limiter on /api keys on the peer IP, which oneshot requests
/// don't carry unless we insert it the way a real listener would.
pub fn with_peer<B>(mut request: Request<B>, peer: &str) -> Request<B> {
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

#[allow(dead_code)]
pub fn with_default_peer<B>(request: Request<B>) -> Request<B> {
    with_peer(request, "127.0.0.1:4000")
}
