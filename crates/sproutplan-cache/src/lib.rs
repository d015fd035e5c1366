//! # Sproutplan Cache
//!
//! Redis-based caching utilities for the Sproutplan API.
//!
//! This crate provides:
//! - Redis connection management
//! - Cache operations (get, set, delete, invalidate by pattern)
//! - Cache configuration from environment variables
//! - Cache key generation for permission overrides
//!
//! The cache is optional at runtime: the application degrades to direct
//! database reads when Redis is unavailable.
//!
//! # Example
//!
//! ```ignore
//! use sproutplan_cache::{CacheConfig, RedisCache};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = CacheConfig::from_env();
//!     let cache = RedisCache::new(&config.redis_url, Duration::from_secs(config.default_ttl_seconds))
//!         .await
//!         .unwrap();
//!
//!     // Set a value
//!     cache.set("key", &my_value).await.unwrap();
//!
//!     // Get a value
//!     let value: Option<MyType> = cache.get("key").await;
//! }
//! ```

pub mod config;
pub mod keys;
pub mod redis;

pub use config::CacheConfig;
pub use keys::invalidate;
pub use redis::{CacheError, RedisCache};
