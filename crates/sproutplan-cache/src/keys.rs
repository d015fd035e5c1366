//! Cache key generation and invalidation utilities.
//!
//! Provides consistent cache key generation and invalidation helpers for
//! the permission resolver, which reads tenant override configuration on
//! every gated workflow action.

use crate::RedisCache;
use tracing::warn;
use uuid::Uuid;

/// Prefix for all cache keys to avoid collisions with other Redis users.
const CACHE_PREFIX: &str = "sproutplan";

/// Builds a cache key with the standard prefix.
fn build_key(parts: &[&str]) -> String {
    format!("{}:{}", CACHE_PREFIX, parts.join(":"))
}

/// Cache keys for permission override configuration.
///
/// Overrides are cached as the full per-tenant set rather than one key per
/// permission, so an upsert only has a single key to invalidate and the
/// resolver never caches the absence of a row.
pub mod permission_overrides {
    use super::*;

    /// Key for the full override set of a tenant.
    pub fn by_tenant(tenant_id: Uuid) -> String {
        build_key(&["tenant", &tenant_id.to_string(), "overrides"])
    }

    /// Pattern to invalidate all override keys for a tenant.
    pub fn invalidation_pattern(tenant_id: Uuid) -> String {
        format!("{}:tenant:{}:overrides*", CACHE_PREFIX, tenant_id)
    }
}

/// Cache invalidation helper for common operations.
///
/// This module provides high-level invalidation functions that handle
/// all related cache keys for a given entity type.
pub mod invalidate {
    use super::*;

    /// Invalidate a tenant's cached permission overrides.
    ///
    /// Call this after upserting an override row (including the paired row
    /// written by approve/reject synchronization).
    pub async fn permission_overrides(cache: Option<&RedisCache>, tenant_id: Uuid) {
        let Some(cache) = cache else { return };

        if let Err(e) = cache
            .invalidate(&permission_overrides::by_tenant(tenant_id))
            .await
        {
            warn!(error = %e, tenant_id = %tenant_id, "Failed to invalidate override cache");
        }

        if let Err(e) = cache
            .invalidate_pattern(&permission_overrides::invalidation_pattern(tenant_id))
            .await
        {
            warn!(error = %e, tenant_id = %tenant_id, "Failed to invalidate override cache pattern");
        }
    }
}
