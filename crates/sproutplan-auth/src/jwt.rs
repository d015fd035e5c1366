//! JWT (JSON Web Token) utilities for authentication.
//!
//! This module provides functions for creating and verifying the access
//! tokens used by the Sproutplan API. Tokens carry the user's identity,
//! tenant scope, and role name; everything authorization needs is resolved
//! from those claims plus the permission configuration.
//!
//! # Example
//!
//! ```ignore
//! use sproutplan_auth::{create_access_token, verify_token};
//! use sproutplan_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//!
//! // Create a token
//! let token = create_access_token(
//!     user_id,
//!     "teacher@sunnydays.example",
//!     Some(tenant_id),
//!     "teacher",
//!     &config,
//! )?;
//!
//! // Verify the token
//! let claims = verify_token(&token, &config)?;
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use sproutplan_config::JwtConfig;
use sproutplan_core::AppError;

use crate::claims::Claims;

/// Creates an access token carrying identity, tenant scope, and role.
///
/// # Arguments
///
/// * `user_id` - The user's UUID
/// * `email` - The user's email address
/// * `tenant_id` - Optional tenant ID for tenant-scoped users (None for superadmins)
/// * `role` - The user's role name (e.g. "teacher", "director")
/// * `jwt_config` - JWT configuration containing the secret and expiry settings
///
/// # Errors
///
/// Returns an error if token encoding fails (e.g., invalid secret key).
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    tenant_id: Option<Uuid>,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        tenant_id,
        role: role.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Verifies an access token and returns the embedded claims.
///
/// Validates the token signature and expiration, then extracts the claims
/// for use in authentication and authorization.
///
/// # Errors
///
/// Returns an unauthorized error if:
/// - The token signature is invalid
/// - The token has expired
/// - The token is malformed
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid or expired token")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_create_access_token_success() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        let result = create_access_token(
            user_id,
            "teacher@example.com",
            Some(tenant_id),
            "teacher",
            &config,
        );

        assert!(result.is_ok());
        let token = result.unwrap();
        assert!(!token.is_empty());
    }

    #[test]
    fn test_verify_token_success() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        let token = create_access_token(
            user_id,
            "director@example.com",
            Some(tenant_id),
            "director",
            &config,
        )
        .unwrap();

        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "director@example.com");
        assert_eq!(claims.tenant_id, Some(tenant_id));
        assert_eq!(claims.role, "director");
    }

    #[test]
    fn test_verify_token_invalid() {
        let config = get_test_jwt_config();
        let result = verify_token("invalid-token", &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token =
            create_access_token(user_id, "teacher@example.com", None, "teacher", &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
        };

        let result = verify_token(&token, &wrong_config);
        assert!(result.is_err());
    }

    #[test]
    fn test_superadmin_token_has_no_tenant() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token =
            create_access_token(user_id, "root@example.com", None, "superadmin", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert!(claims.tenant_id.is_none());
        assert_eq!(claims.role, "superadmin");
    }

    #[test]
    fn test_role_claim_preserves_raw_form() {
        // Normalization happens at use, not at mint
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token = create_access_token(
            user_id,
            "ad@example.com",
            Some(Uuid::new_v4()),
            "Assistant Director",
            &config,
        )
        .unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.role, "Assistant Director");
    }
}
