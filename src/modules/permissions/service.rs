use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

use sproutplan_cache::{RedisCache, invalidate, keys};
use sproutplan_core::AppError;
use sproutplan_core::permissions::{
    LESSON_PLAN_AUTO_APPROVE, LESSON_PLAN_SUBMIT, REGISTRY, Resolution, paired_permission,
    registry_entry,
};
use sproutplan_models::{
    PermissionCatalogEntry, PermissionOverride, PermissionOverrideId, Role, TenantId,
    UpsertPermissionOverrideDto, UserId,
};

pub struct PermissionService;

impl PermissionService {
    /// Fetch all override rows for a tenant, through the cache when available.
    ///
    /// The full per-tenant set is cached under a single key so an upsert has
    /// one key to invalidate and the absence of a row is never cached wrong.
    async fn fetch_overrides(
        db: &PgPool,
        cache: Option<&RedisCache>,
        tenant_id: TenantId,
    ) -> Result<Vec<PermissionOverride>, AppError> {
        let cache_key = keys::permission_overrides::by_tenant(tenant_id.into());

        if let Some(cache) = cache
            && let Some(overrides) = cache.get::<Vec<PermissionOverride>>(&cache_key).await
        {
            debug!(tenant.id = %tenant_id, "Permission overrides found in cache");
            return Ok(overrides);
        }

        let overrides = sqlx::query_as::<_, PermissionOverride>(
            r#"SELECT id, tenant_id, permission_name, roles_required, auto_approve_roles, updated_by, created_at, updated_at
               FROM permission_overrides WHERE tenant_id = $1
               ORDER BY permission_name"#,
        )
        .bind(tenant_id)
        .fetch_all(db)
        .await?;

        if let Some(cache) = cache
            && let Err(e) = cache.set(&cache_key, &overrides).await
        {
            warn!(error = %e, "Failed to cache permission overrides");
        }

        Ok(overrides)
    }

    /// Look up a single override row for a tenant and permission.
    async fn get_override(
        db: &PgPool,
        cache: Option<&RedisCache>,
        tenant_id: TenantId,
        permission_name: &str,
    ) -> Result<Option<PermissionOverride>, AppError> {
        let overrides = Self::fetch_overrides(db, cache, tenant_id).await?;
        Ok(overrides
            .into_iter()
            .find(|o| o.permission_name == permission_name))
    }

    /// Resolve whether a role may perform a permission within a tenant.
    ///
    /// Resolution order:
    /// 1. Unknown role names are denied.
    /// 2. Superadmins are always allowed, never reviewed.
    /// 3. An override row for (tenant, permission) replaces the defaults
    ///    entirely: role in auto set = allowed without review, role in
    ///    required set = allowed with review, otherwise denied.
    /// 4. No row: the registry defaults decide. `requires_approval` is only
    ///    meaningful for permissions that carry a default auto set (submit).
    /// 5. Permissions the registry doesn't know are denied.
    #[instrument(skip(db, cache))]
    pub async fn resolve(
        db: &PgPool,
        cache: Option<&RedisCache>,
        tenant_id: TenantId,
        role_name: &str,
        permission_name: &str,
    ) -> Result<Resolution, AppError> {
        let Ok(role) = Role::parse(role_name) else {
            debug!(role = %role_name, "Unknown role denied");
            return Ok(Resolution::denied());
        };

        if role.is_superadmin() {
            return Ok(Resolution {
                allowed: true,
                requires_approval: false,
            });
        }

        if let Some(override_row) =
            Self::get_override(db, cache, tenant_id, permission_name).await?
        {
            if override_row.auto_approves(role) {
                return Ok(Resolution {
                    allowed: true,
                    requires_approval: false,
                });
            }
            if override_row.requires(role) {
                return Ok(Resolution {
                    allowed: true,
                    requires_approval: true,
                });
            }
            return Ok(Resolution::denied());
        }

        let Some(entry) = registry_entry(permission_name) else {
            debug!(permission = %permission_name, "Unknown permission denied");
            return Ok(Resolution::denied());
        };

        if !entry.allows(role.as_str()) {
            return Ok(Resolution::denied());
        }

        let requires_approval =
            !entry.default_auto_approve_roles.is_empty() && !entry.auto_approves(role.as_str());

        Ok(Resolution {
            allowed: true,
            requires_approval,
        })
    }

    /// Resolve a permission and turn denial into a 403.
    pub async fn authorize(
        db: &PgPool,
        cache: Option<&RedisCache>,
        tenant_id: TenantId,
        role_name: &str,
        permission_name: &str,
    ) -> Result<Resolution, AppError> {
        let resolution = Self::resolve(db, cache, tenant_id, role_name, permission_name).await?;
        crate::metrics::track_permission_check(resolution.allowed, role_name);

        if !resolution.allowed {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Access denied. Missing required permission: {}",
                permission_name
            )));
        }

        Ok(resolution)
    }

    /// Decide whether a submission by this role lands as approved directly.
    ///
    /// Precedence: a `lesson_plan.auto_approve` override row wins, then the
    /// auto set of a `lesson_plan.submit` override row, then the registry's
    /// default auto set for submit. Superadmins always auto-approve.
    #[instrument(skip(db, cache))]
    pub async fn should_auto_approve(
        db: &PgPool,
        cache: Option<&RedisCache>,
        tenant_id: TenantId,
        role_name: &str,
    ) -> Result<bool, AppError> {
        let Ok(role) = Role::parse(role_name) else {
            return Ok(false);
        };

        if role.is_superadmin() {
            return Ok(true);
        }

        let overrides = Self::fetch_overrides(db, cache, tenant_id).await?;

        if let Some(row) = overrides
            .iter()
            .find(|o| o.permission_name == LESSON_PLAN_AUTO_APPROVE)
        {
            return Ok(row.auto_approves(role));
        }

        if let Some(row) = overrides
            .iter()
            .find(|o| o.permission_name == LESSON_PLAN_SUBMIT)
        {
            return Ok(row.auto_approves(role));
        }

        Ok(registry_entry(LESSON_PLAN_SUBMIT)
            .map(|entry| entry.auto_approves(role.as_str()))
            .unwrap_or(false))
    }

    /// All override rows configured for a tenant.
    #[instrument(skip(db, cache))]
    pub async fn list_overrides(
        db: &PgPool,
        cache: Option<&RedisCache>,
        tenant_id: TenantId,
    ) -> Result<Vec<PermissionOverride>, AppError> {
        Self::fetch_overrides(db, cache, tenant_id).await
    }

    /// The static permission catalog with registry defaults.
    pub fn catalog() -> Vec<PermissionCatalogEntry> {
        REGISTRY.iter().map(PermissionCatalogEntry::from).collect()
    }

    /// Enforce mutual exclusivity between the two role sets.
    ///
    /// A role submitted in both sets keeps only its newest membership: if it
    /// was already in one set, the other set's membership is the new one and
    /// wins. A role new to both stays in roles_required. Duplicates within a
    /// set are dropped.
    fn sanitize_role_sets(
        existing: Option<&PermissionOverride>,
        roles_required: Vec<Role>,
        auto_approve_roles: Vec<Role>,
    ) -> (Vec<Role>, Vec<Role>) {
        let prev_required: &[Role] = existing.map(|o| o.roles_required.as_slice()).unwrap_or(&[]);
        let prev_auto: &[Role] = existing
            .map(|o| o.auto_approve_roles.as_slice())
            .unwrap_or(&[]);

        let mut required: Vec<Role> = Vec::new();
        for role in roles_required {
            if !required.contains(&role) {
                required.push(role);
            }
        }
        let mut auto: Vec<Role> = Vec::new();
        for role in auto_approve_roles {
            if !auto.contains(&role) {
                auto.push(role);
            }
        }

        let dual: Vec<Role> = required
            .iter()
            .copied()
            .filter(|r| auto.contains(r))
            .collect();

        for role in dual {
            let was_required = prev_required.contains(&role);
            let was_auto = prev_auto.contains(&role);

            if was_required && !was_auto {
                // The auto membership is the new one, the role moved there.
                required.retain(|r| *r != role);
            } else {
                // New to both, or moved back to required: required wins.
                auto.retain(|r| *r != role);
            }
        }

        (required, auto)
    }

    /// Create or update an override row for a tenant.
    ///
    /// Without an id the row is addressed by its (tenant, permission) natural
    /// key and inserted or updated in place. With an id the existing row is
    /// updated. Approve and reject are kept in sync: writing either one
    /// writes its partner with the same role sets in the same transaction,
    /// preserving the partner row's own id.
    #[instrument(skip(db, cache, dto), fields(permission = %dto.permission_name))]
    pub async fn upsert_override(
        db: &PgPool,
        cache: Option<&RedisCache>,
        tenant_id: TenantId,
        updated_by: UserId,
        dto: UpsertPermissionOverrideDto,
    ) -> Result<PermissionOverride, AppError> {
        let known = registry_entry(&dto.permission_name).is_some()
            || dto.permission_name == LESSON_PLAN_AUTO_APPROVE;
        if !known {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Unknown permission: {}",
                dto.permission_name
            )));
        }

        if dto.roles_required.contains(&Role::Superadmin)
            || dto.auto_approve_roles.contains(&Role::Superadmin)
        {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Superadmin access is implicit and cannot be configured"
            )));
        }

        let mut tx = db.begin().await?;

        let existing = match dto.id {
            Some(id) => Self::fetch_for_update_by_id(&mut tx, tenant_id, id).await?,
            None => Self::fetch_for_update_by_name(&mut tx, tenant_id, &dto.permission_name).await?,
        };

        if dto.id.is_some() && existing.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Permission override not found"
            )));
        }

        let (roles_required, auto_approve_roles) = Self::sanitize_role_sets(
            existing.as_ref(),
            dto.roles_required,
            dto.auto_approve_roles,
        );

        let override_row = match existing {
            Some(existing) => {
                sqlx::query_as::<_, PermissionOverride>(
                    r#"UPDATE permission_overrides
                       SET permission_name = $1, roles_required = $2, auto_approve_roles = $3, updated_by = $4, updated_at = NOW()
                       WHERE id = $5
                       RETURNING id, tenant_id, permission_name, roles_required, auto_approve_roles, updated_by, created_at, updated_at"#,
                )
                .bind(&dto.permission_name)
                .bind(&roles_required)
                .bind(&auto_approve_roles)
                .bind(updated_by)
                .bind(existing.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| Self::map_unique_violation(e, &dto.permission_name))?
            }
            None => {
                sqlx::query_as::<_, PermissionOverride>(
                    r#"INSERT INTO permission_overrides (tenant_id, permission_name, roles_required, auto_approve_roles, updated_by)
                       VALUES ($1, $2, $3, $4, $5)
                       RETURNING id, tenant_id, permission_name, roles_required, auto_approve_roles, updated_by, created_at, updated_at"#,
                )
                .bind(tenant_id)
                .bind(&dto.permission_name)
                .bind(&roles_required)
                .bind(&auto_approve_roles)
                .bind(updated_by)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| Self::map_unique_violation(e, &dto.permission_name))?
            }
        };

        // Keep the approve/reject pair in sync with the same role sets. The
        // partner row keeps its own id.
        if let Some(partner) = paired_permission(&dto.permission_name) {
            sqlx::query(
                r#"INSERT INTO permission_overrides (tenant_id, permission_name, roles_required, auto_approve_roles, updated_by)
                   VALUES ($1, $2, $3, $4, $5)
                   ON CONFLICT ON CONSTRAINT permission_overrides_tenant_permission_key
                   DO UPDATE SET roles_required = EXCLUDED.roles_required,
                                 auto_approve_roles = EXCLUDED.auto_approve_roles,
                                 updated_by = EXCLUDED.updated_by,
                                 updated_at = NOW()"#,
            )
            .bind(tenant_id)
            .bind(partner)
            .bind(&roles_required)
            .bind(&auto_approve_roles)
            .bind(updated_by)
            .execute(&mut *tx)
            .await?;

            debug!(partner = %partner, "Synchronized paired permission");
        }

        tx.commit().await?;

        invalidate::permission_overrides(cache, tenant_id.into()).await;
        crate::metrics::track_override_saved(&override_row.permission_name);

        info!(
            override.id = %override_row.id,
            tenant.id = %tenant_id,
            permission = %override_row.permission_name,
            "Permission override saved"
        );

        Ok(override_row)
    }

    async fn fetch_for_update_by_id(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tenant_id: TenantId,
        id: PermissionOverrideId,
    ) -> Result<Option<PermissionOverride>, AppError> {
        let row = sqlx::query_as::<_, PermissionOverride>(
            r#"SELECT id, tenant_id, permission_name, roles_required, auto_approve_roles, updated_by, created_at, updated_at
               FROM permission_overrides WHERE id = $1 AND tenant_id = $2
               FOR UPDATE"#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row)
    }

    async fn fetch_for_update_by_name(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tenant_id: TenantId,
        permission_name: &str,
    ) -> Result<Option<PermissionOverride>, AppError> {
        let row = sqlx::query_as::<_, PermissionOverride>(
            r#"SELECT id, tenant_id, permission_name, roles_required, auto_approve_roles, updated_by, created_at, updated_at
               FROM permission_overrides WHERE tenant_id = $1 AND permission_name = $2
               FOR UPDATE"#,
        )
        .bind(tenant_id)
        .bind(permission_name)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row)
    }

    fn map_unique_violation(e: sqlx::Error, permission_name: &str) -> AppError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
            && db_err
                .message()
                .contains("permission_overrides_tenant_permission_key")
        {
            return AppError::conflict(anyhow::anyhow!(
                "An override for {} already exists for this tenant",
                permission_name
            ));
        }
        error!(error = %e, "Database error saving permission override");
        AppError::from(e)
    }
}
