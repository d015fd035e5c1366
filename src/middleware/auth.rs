use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use sproutplan_auth::{Claims, verify_token};
use sproutplan_core::AppError;
use sproutplan_models::{Role, TenantId, UserId};

use crate::state::AppState;

/// Extractor that validates the JWT and provides the authenticated user's claims.
///
/// Claims carry the user's id, email, tenant scope, and role name. Permission
/// decisions are made by the override engine from the role name plus the
/// tenant's configuration, so the token itself never lists permissions.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the user ID from the token.
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid user ID in token")))
    }

    /// Get the user's tenant (None for superadmins).
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.0.tenant_id.map(TenantId::from)
    }

    /// Get the user's email.
    pub fn email(&self) -> &str {
        &self.0.email
    }

    /// Get the raw role name from the token.
    pub fn role_name(&self) -> &str {
        &self.0.role
    }

    /// Parse the token's role name into a known role.
    ///
    /// Fails closed: a token carrying a role this build doesn't know is
    /// rejected rather than mapped to a default.
    pub fn role(&self) -> Result<Role, AppError> {
        Role::parse(&self.0.role)
            .map_err(|e| AppError::forbidden(anyhow::anyhow!("{}", e)))
    }

    /// Whether the token belongs to a superadmin.
    pub fn is_superadmin(&self) -> bool {
        matches!(self.role(), Ok(role) if role.is_superadmin())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}
