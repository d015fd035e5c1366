use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    approve_lesson_plan, copy_lesson_plan, get_lesson_plan_by_id, get_lesson_plans,
    reject_lesson_plan, submit_lesson_plan,
};

/// Initialize the lesson plans router
/// Routes: GET /, POST /submit, GET /{id}, POST /{id}/approve,
/// POST /{id}/reject, POST /{id}/copy
pub fn init_lesson_plans_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_lesson_plans))
        .route("/submit", post(submit_lesson_plan))
        .route("/{id}", get(get_lesson_plan_by_id))
        .route("/{id}/approve", post(approve_lesson_plan))
        .route("/{id}/reject", post(reject_lesson_plan))
        .route("/{id}/copy", post(copy_lesson_plan))
}
