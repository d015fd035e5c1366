use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    get_permission_catalog, get_permission_overrides, upsert_permission_override,
};

/// Initialize the settings router
/// Routes: GET /permission-overrides, POST /permission-overrides, GET /permissions
pub fn init_settings_router() -> Router<AppState> {
    Router::new()
        .route(
            "/permission-overrides",
            get(get_permission_overrides).post(upsert_permission_override),
        )
        .route("/permissions", get(get_permission_catalog))
}
