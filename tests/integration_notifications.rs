mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::json;
use sproutplan::router::init_router;
use sproutplan::state::AppState;
use sproutplan_config::{CorsConfig, RateLimitConfig};
use sproutplan_models::{NotificationId, TenantId, UserId};
use sqlx::{PgPool, Postgres, Transaction};
use tower::ServiceExt;

use common::{
    create_test_plan, create_test_room, create_test_tenant, create_test_user,
    generate_unique_email, mint_token, test_jwt_config, with_default_peer,
};

fn setup_test_app(pool: PgPool) -> axum::Router {
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig {
            allowed_origins: vec![],
        },
        rate_limit_config: RateLimitConfig::default(),
        cache: None,
    };
    init_router(state)
}

async fn insert_notification(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: TenantId,
    user_id: UserId,
) -> NotificationId {
    sqlx::query_scalar::<_, NotificationId>(
        r#"
        INSERT INTO notifications (tenant_id, user_id, notification_type, title, message)
        VALUES ($1, $2, 'lesson_plan_returned', 'Lesson plan returned', 'Please revise')
        RETURNING id
        "#,
    )
    .bind(tenant_id)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unauthorized_access_to_notifications(pool: PgPool) {
    let app = setup_test_app(pool);

    let request = Request::builder()
        .method("GET")
        .uri("/api/notifications")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(with_default_peer(request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reject_delivers_notification_to_submitter(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let tenant_id = create_test_tenant(&mut tx).await;
    let room = create_test_room(&mut tx, tenant_id).await;
    let teacher =
        create_test_user(&mut tx, &generate_unique_email(), "teacher", Some(tenant_id)).await;
    let director =
        create_test_user(&mut tx, &generate_unique_email(), "director", Some(tenant_id)).await;
    let week = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    let plan_id = create_test_plan(&mut tx, &room, teacher.id, week, "submitted").await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());
    let request = Request::builder()
        .method("POST")
        .uri(&format!("/api/lesson-plans/{}/reject", plan_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", mint_token(&director)))
        .body(Body::from(
            serde_json::to_string(&json!({"notes": "Mondays need a gross motor block"})).unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(with_default_peer(request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = setup_test_app(pool);
    let request = Request::builder()
        .method("GET")
        .uri("/api/notifications")
        .header("authorization", format!("Bearer {}", mint_token(&teacher)))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(with_default_peer(request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let notifications = body["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);

    let notification = &notifications[0];
    assert_eq!(notification["notification_type"], "lesson_plan_returned");
    assert_eq!(notification["lesson_plan_id"], plan_id.to_string());
    assert_eq!(notification["week_start"], "2025-03-03");
    assert_eq!(
        notification["review_notes"],
        "Mondays need a gross motor block"
    );
    assert_eq!(notification["is_read"], false);
    assert_eq!(body["meta"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_notifications_scoped_to_recipient(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let tenant_id = create_test_tenant(&mut tx).await;
    let recipient =
        create_test_user(&mut tx, &generate_unique_email(), "teacher", Some(tenant_id)).await;
    let coworker =
        create_test_user(&mut tx, &generate_unique_email(), "teacher", Some(tenant_id)).await;
    insert_notification(&mut tx, tenant_id, recipient.id).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool);
    let request = Request::builder()
        .method("GET")
        .uri("/api/notifications")
        .header("authorization", format!("Bearer {}", mint_token(&coworker)))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(with_default_peer(request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_notification_read(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let tenant_id = create_test_tenant(&mut tx).await;
    let teacher =
        create_test_user(&mut tx, &generate_unique_email(), "teacher", Some(tenant_id)).await;
    let notification_id = insert_notification(&mut tx, tenant_id, teacher.id).await;
    tx.commit().await.unwrap();

    let token = mint_token(&teacher);

    let app = setup_test_app(pool.clone());
    let request = Request::builder()
        .method("POST")
        .uri(&format!("/api/notifications/{}/read", notification_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(with_default_peer(request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["is_read"], true);
    assert_eq!(body["is_dismissed"], false);

    // Read notifications drop out of the unread view but stay in the list
    let app = setup_test_app(pool.clone());
    let request = Request::builder()
        .method("GET")
        .uri("/api/notifications?unread=true")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(with_default_peer(request)).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let app = setup_test_app(pool);
    let request = Request::builder()
        .method("GET")
        .uri("/api/notifications")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(with_default_peer(request)).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dismissed_notification_leaves_the_list(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let tenant_id = create_test_tenant(&mut tx).await;
    let teacher =
        create_test_user(&mut tx, &generate_unique_email(), "teacher", Some(tenant_id)).await;
    let notification_id = insert_notification(&mut tx, tenant_id, teacher.id).await;
    tx.commit().await.unwrap();

    let token = mint_token(&teacher);

    let app = setup_test_app(pool.clone());
    let request = Request::builder()
        .method("POST")
        .uri(&format!("/api/notifications/{}/dismiss", notification_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(with_default_peer(request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["is_dismissed"], true);

    let app = setup_test_app(pool);
    let request = Request::builder()
        .method("GET")
        .uri("/api/notifications")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(with_default_peer(request)).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["meta"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_touch_another_users_notification(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let tenant_id = create_test_tenant(&mut tx).await;
    let recipient =
        create_test_user(&mut tx, &generate_unique_email(), "teacher", Some(tenant_id)).await;
    let coworker =
        create_test_user(&mut tx, &generate_unique_email(), "teacher", Some(tenant_id)).await;
    let notification_id = insert_notification(&mut tx, tenant_id, recipient.id).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone());
    let request = Request::builder()
        .method("POST")
        .uri(&format!("/api/notifications/{}/read", notification_id))
        .header("authorization", format!("Bearer {}", mint_token(&coworker)))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(with_default_peer(request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let is_read = sqlx::query_scalar::<_, bool>("SELECT is_read FROM notifications WHERE id = $1")
        .bind(notification_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!is_read);
}
