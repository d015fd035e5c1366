//! Pagination utilities for API responses.
//!
//! Listing endpoints accept either offset-based (`limit` + `offset`) or
//! page-based (`limit` + `page`) pagination. When `page` is provided it takes
//! precedence over `offset`.
//!
//! - `limit`: maximum number of items to return (1-100, default: 10)
//! - `offset`: number of items to skip from the beginning
//! - `page`: 1-indexed page number
//!
//! # Example
//!
//! ```ignore
//! use sproutplan_core::pagination::{PaginationMeta, PaginationParams};
//!
//! // In a handler
//! async fn list_lesson_plans(
//!     Query(params): Query<PaginationParams>,
//! ) -> Result<Json<PaginatedResponse>, AppError> {
//!     let limit = params.limit();
//!     let offset = params.offset();
//!
//!     let plans = fetch_plans(limit, offset).await?;
//!     let total = count_plans().await?;
//!
//!     let meta = PaginationMeta {
//!         total,
//!         limit,
//!         offset: Some(offset),
//!         page: params.page(),
//!         has_more: offset + limit < total,
//!     };
//!
//!     Ok(Json(PaginatedResponse { data: plans, meta }))
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Deserializes an optional string into an optional i64.
///
/// Query parameters may arrive as empty strings, which should be treated
/// as `None`.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Metadata about a paginated response.
///
/// Included alongside the data in paginated API responses.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "data": [...],
///   "meta": {
///     "total": 100,
///     "limit": 10,
///     "offset": 20,
///     "page": 3,
///     "has_more": true
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Maximum items per page (the limit that was applied)
    pub limit: i64,
    /// Number of items skipped (only present if offset-based pagination was used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Current page number (only present if page-based pagination was used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether there are more items after this page
    pub has_more: bool,
}

/// Query parameters for pagination.
///
/// Supports both offset-based and page-based pagination; when `page` is
/// provided it takes precedence over `offset`.
///
/// # Limits
///
/// - `limit` is clamped to the range [1, 100]
/// - `offset` is clamped to a minimum of 0
/// - `page` is clamped to a minimum of 1
#[derive(Debug, Clone, Hash, Deserialize, ToSchema)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0, ignored if `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(10),
            offset: Some(0),
            page: Some(1),
        }
    }
}

impl PaginationParams {
    /// Returns the effective limit, clamped to [1, 100].
    ///
    /// Defaults to 10 if not specified.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    /// Returns the effective offset.
    ///
    /// If `page` is set, calculates the offset from the page number.
    /// Otherwise, returns the explicit offset or 0.
    ///
    /// The offset is always clamped to a minimum of 0.
    #[must_use]
    pub fn offset(&self) -> i64 {
        // If page is provided, calculate offset from page
        if let Some(page) = self.page {
            let page = page.max(1);
            let limit = self.limit();
            (page - 1) * limit
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    /// Returns the page number if provided, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}
