//! Role domain model.
//!
//! Roles form a closed set stored as TEXT in the database and carried as a
//! string claim in access tokens. Every string entering the system goes
//! through [`normalize_role`], so `"Assistant Director"`, `"assistant-director"`
//! and `"assistant_director"` all name the same role.
//!
//! # Example
//!
//! ```ignore
//! use sproutplan_models::roles::Role;
//!
//! let role: Role = "Assistant Director".parse().unwrap();
//! assert_eq!(role, Role::AssistantDirector);
//! assert_eq!(role.as_str(), "assistant_director");
//!
//! // Unknown roles fail to parse
//! assert!("janitor".parse::<Role>().is_err());
//! ```

use serde::{Deserialize, Serialize};
use sproutplan_core::permissions;
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Normalizes a role name to its canonical slug.
///
/// Lowercases the input, turns spaces and hyphens into underscores, replaces
/// any other invalid character with an underscore, collapses consecutive
/// underscores, and trims underscores from both ends.
pub fn normalize_role(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c == ' ' || c == '-' {
                '_'
            } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Collapse consecutive underscores and trim underscores from ends
    let mut result = String::new();
    let mut prev_underscore = false;
    for c in slug.chars() {
        if c == '_' {
            if !prev_underscore && !result.is_empty() {
                result.push(c);
            }
            prev_underscore = true;
        } else {
            result.push(c);
            prev_underscore = false;
        }
    }

    result.trim_end_matches('_').to_string()
}

/// Error type for role parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleParseError {
    /// The string does not name a known role.
    UnknownRole(String),
}

impl std::error::Error for RoleParseError {}

impl fmt::Display for RoleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRole(name) => write!(f, "Unknown role: {}", name),
        }
    }
}

/// A user's role.
///
/// `Superadmin` operates across tenants and is implicitly granted every
/// permission; `Parent` is a view-only guardian account. The remaining
/// variants are tenant staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[schema(example = "teacher")]
pub enum Role {
    Teacher,
    AssistantDirector,
    Director,
    Admin,
    Superadmin,
    Parent,
}

impl Role {
    /// Every role, in no particular order.
    pub const ALL: [Role; 6] = [
        Role::Teacher,
        Role::AssistantDirector,
        Role::Director,
        Role::Admin,
        Role::Superadmin,
        Role::Parent,
    ];

    /// Parse a role from an arbitrary string, normalizing it first.
    ///
    /// Returns `Err` if the normalized string does not name a known role.
    pub fn parse(name: &str) -> Result<Self, RoleParseError> {
        match normalize_role(name).as_str() {
            permissions::ROLE_TEACHER => Ok(Self::Teacher),
            permissions::ROLE_ASSISTANT_DIRECTOR => Ok(Self::AssistantDirector),
            permissions::ROLE_DIRECTOR => Ok(Self::Director),
            permissions::ROLE_ADMIN => Ok(Self::Admin),
            permissions::ROLE_SUPERADMIN => Ok(Self::Superadmin),
            permissions::ROLE_PARENT => Ok(Self::Parent),
            _ => Err(RoleParseError::UnknownRole(name.to_string())),
        }
    }

    /// The canonical slug for this role, as stored in the database and
    /// used by the permission registry.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => permissions::ROLE_TEACHER,
            Self::AssistantDirector => permissions::ROLE_ASSISTANT_DIRECTOR,
            Self::Director => permissions::ROLE_DIRECTOR,
            Self::Admin => permissions::ROLE_ADMIN,
            Self::Superadmin => permissions::ROLE_SUPERADMIN,
            Self::Parent => permissions::ROLE_PARENT,
        }
    }

    /// Whether this role bypasses all permission checks.
    #[inline]
    pub const fn is_superadmin(&self) -> bool {
        matches!(self, Self::Superadmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Role {
    type Error = RoleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Role {
    type Error = RoleParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

// SQLx Type implementation for Postgres
impl Type<sqlx::Postgres> for Role {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

// SQLx Encode implementation
impl<'q> Encode<'q, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

// SQLx Decode implementation
impl<'r> Decode<'r, sqlx::Postgres> for Role {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

// SQLx array type support for Postgres (role sets on override rows)
impl PgHasArrayType for Role {
    fn array_type_info() -> PgTypeInfo {
        <String as PgHasArrayType>::array_type_info()
    }
}

// Serde Deserialize with normalization
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
