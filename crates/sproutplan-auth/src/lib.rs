//! # Sproutplan Auth
//!
//! Authentication types and JWT utilities for the Sproutplan API.
//!
//! This crate provides:
//!
//! - [`claims`]: JWT claim structure for access tokens
//! - [`jwt`]: Token creation and verification utilities
//!
//! Token issuance (login, refresh, password flows) is not part of this
//! service: principals arrive in bearer tokens minted elsewhere, and this
//! crate verifies them. Token creation is kept for the CLI and for tests.
//!
//! # Example
//!
//! ```ignore
//! use sproutplan_auth::{Claims, create_access_token, verify_token};
//! use sproutplan_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//!
//! // Create an access token
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
//! println!("User ID: {}", claims.sub);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
