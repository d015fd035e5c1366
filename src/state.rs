use std::time::Duration;

use sqlx::PgPool;
use tracing::warn;

use sproutplan_cache::{CacheConfig, RedisCache};
use sproutplan_config::{CorsConfig, JwtConfig, RateLimitConfig};
use sproutplan_db::init_db_pool;

/// Shared application state passed to all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    /// Optional Redis cache. The app runs without it when Redis is down.
    pub cache: Option<RedisCache>,
}

pub async fn init_app_state() -> AppState {
    let cache_config = CacheConfig::from_env();
    let cache = match RedisCache::new(
        &cache_config.redis_url,
        Duration::from_secs(cache_config.default_ttl_seconds),
    )
    .await
    {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!(error = %e, "Redis unavailable, running without cache");
            None
        }
    };

    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        cache,
    }
}
