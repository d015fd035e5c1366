//! # Sproutplan Core
//!
//! Core types, errors, and the permission registry for the Sproutplan API.
//!
//! This crate provides foundational types used throughout the Sproutplan
//! application:
//!
//! - [`errors`]: Application error types with HTTP response conversion
//! - [`pagination`]: Pagination utilities for API responses
//! - [`permissions`]: The static permission registry and default role grants
//! - [`serde`]: Custom serde serialization/deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use sproutplan_core::errors::AppError;
//! use sproutplan_core::pagination::{PaginationMeta, PaginationParams};
//! use sproutplan_core::permissions::{self, registry_entry};
//!
//! // Create an error
//! let error = AppError::not_found(anyhow::anyhow!("Lesson plan not found"));
//!
//! // Look up a permission's shipped defaults
//! let entry = registry_entry(permissions::LESSON_PLAN_SUBMIT);
//!
//! // Use pagination
//! let params = PaginationParams::default();
//! let limit = params.limit();
//! ```

pub mod errors;
pub mod pagination;
pub mod permissions;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use permissions::{RegistryEntry, Resolution, paired_permission, registry_entry};
