//! Permission registry for the Sproutplan API.
//!
//! This module is the static catalog of every permission the application
//! knows about: its `resource.action` name, the roles granted it out of the
//! box, and (for submission) the roles whose submissions bypass review. The
//! catalog is compile-time data; tenants customize it through
//! `permission_overrides` rows, never by mutating the registry.
//!
//! Names not present in the catalog resolve to "no role permitted", so a
//! typo in a permission name fails closed rather than open.
//!
//! # Example
//!
//! ```ignore
//! use sproutplan_core::permissions::{self, registry_entry};
//!
//! let entry = registry_entry(permissions::LESSON_PLAN_APPROVE).unwrap();
//! assert!(entry.allows(permissions::ROLE_DIRECTOR));
//! assert!(!entry.allows(permissions::ROLE_TEACHER));
//! ```

// =============================================================================
// Role slugs
// =============================================================================

/// Classroom teacher
pub const ROLE_TEACHER: &str = "teacher";
/// Assistant director of a location
pub const ROLE_ASSISTANT_DIRECTOR: &str = "assistant_director";
/// Director of a location
pub const ROLE_DIRECTOR: &str = "director";
/// Tenant administrator
pub const ROLE_ADMIN: &str = "admin";
/// Cross-tenant operator; implicitly granted every permission
pub const ROLE_SUPERADMIN: &str = "superadmin";
/// View-only guardian account
pub const ROLE_PARENT: &str = "parent";

// =============================================================================
// Lesson plan permissions
// =============================================================================

/// Permission to view lesson plans
pub const LESSON_PLAN_VIEW: &str = "lesson_plan.view";
/// Permission to create and edit draft lesson plans
pub const LESSON_PLAN_CREATE: &str = "lesson_plan.create";
/// Permission to submit a lesson plan for review
pub const LESSON_PLAN_SUBMIT: &str = "lesson_plan.submit";
/// Permission to approve a submitted lesson plan
pub const LESSON_PLAN_APPROVE: &str = "lesson_plan.approve";
/// Permission to reject a submitted lesson plan
pub const LESSON_PLAN_REJECT: &str = "lesson_plan.reject";
/// Permission to copy a lesson plan into other rooms
pub const LESSON_PLAN_COPY: &str = "lesson_plan.copy";
/// Override-layer key controlling submit-time auto-approval.
///
/// Not a catalog entry: it only ever exists as a tenant override row. When
/// present it takes precedence over the `lesson_plan.submit` configuration
/// for the auto-approval decision.
pub const LESSON_PLAN_AUTO_APPROVE: &str = "lesson_plan.auto_approve";

// =============================================================================
// Permission override permissions
// =============================================================================

/// Permission to view a tenant's permission overrides
pub const PERMISSION_OVERRIDE_VIEW: &str = "permission_override.view";
/// Permission to create and update permission overrides
pub const PERMISSION_OVERRIDE_MANAGE: &str = "permission_override.manage";

/// A single entry in the permission catalog.
///
/// `default_roles` and `default_auto_approve_roles` hold role slugs as
/// produced by role normalization. `superadmin` is intentionally absent from
/// every set: the resolver short-circuits it before defaults are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Full permission name (`resource.action`)
    pub name: &'static str,
    /// Resource the permission applies to
    pub resource: &'static str,
    /// Action on the resource
    pub action: &'static str,
    /// Roles granted the permission when no tenant override exists
    pub default_roles: &'static [&'static str],
    /// Roles whose submissions bypass review when no tenant override exists
    pub default_auto_approve_roles: &'static [&'static str],
}

impl RegistryEntry {
    /// Returns whether the role slug is granted this permission by default.
    #[must_use]
    pub fn allows(&self, role_slug: &str) -> bool {
        self.default_roles.contains(&role_slug)
    }

    /// Returns whether the role slug bypasses review by default.
    #[must_use]
    pub fn auto_approves(&self, role_slug: &str) -> bool {
        self.default_auto_approve_roles.contains(&role_slug)
    }
}

const STAFF: &[&str] = &[ROLE_TEACHER, ROLE_ASSISTANT_DIRECTOR, ROLE_DIRECTOR, ROLE_ADMIN];
const REVIEWERS: &[&str] = &[ROLE_ASSISTANT_DIRECTOR, ROLE_DIRECTOR, ROLE_ADMIN];

/// The shipped permission catalog.
pub const REGISTRY: &[RegistryEntry] = &[
    RegistryEntry {
        name: LESSON_PLAN_VIEW,
        resource: "lesson_plan",
        action: "view",
        default_roles: &[
            ROLE_TEACHER,
            ROLE_ASSISTANT_DIRECTOR,
            ROLE_DIRECTOR,
            ROLE_ADMIN,
            ROLE_PARENT,
        ],
        default_auto_approve_roles: &[],
    },
    RegistryEntry {
        name: LESSON_PLAN_CREATE,
        resource: "lesson_plan",
        action: "create",
        default_roles: STAFF,
        default_auto_approve_roles: &[],
    },
    RegistryEntry {
        name: LESSON_PLAN_SUBMIT,
        resource: "lesson_plan",
        action: "submit",
        default_roles: STAFF,
        default_auto_approve_roles: &[ROLE_DIRECTOR, ROLE_ADMIN],
    },
    RegistryEntry {
        name: LESSON_PLAN_APPROVE,
        resource: "lesson_plan",
        action: "approve",
        default_roles: REVIEWERS,
        default_auto_approve_roles: &[],
    },
    RegistryEntry {
        name: LESSON_PLAN_REJECT,
        resource: "lesson_plan",
        action: "reject",
        default_roles: REVIEWERS,
        default_auto_approve_roles: &[],
    },
    RegistryEntry {
        name: LESSON_PLAN_COPY,
        resource: "lesson_plan",
        action: "copy",
        default_roles: STAFF,
        default_auto_approve_roles: &[],
    },
    RegistryEntry {
        name: PERMISSION_OVERRIDE_VIEW,
        resource: "permission_override",
        action: "view",
        default_roles: &[ROLE_DIRECTOR, ROLE_ADMIN],
        default_auto_approve_roles: &[],
    },
    RegistryEntry {
        name: PERMISSION_OVERRIDE_MANAGE,
        resource: "permission_override",
        action: "manage",
        default_roles: &[ROLE_ADMIN],
        default_auto_approve_roles: &[],
    },
];

/// Looks up a permission by name.
///
/// Returns `None` for unknown names, which callers must treat as
/// "no role permitted".
#[must_use]
pub fn registry_entry(name: &str) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|entry| entry.name == name)
}

/// Returns the partner of a paired permission, if any.
///
/// `lesson_plan.approve` and `lesson_plan.reject` are configured together:
/// saving an override for either keeps the other's override in step.
#[must_use]
pub fn paired_permission(name: &str) -> Option<&'static str> {
    match name {
        LESSON_PLAN_APPROVE => Some(LESSON_PLAN_REJECT),
        LESSON_PLAN_REJECT => Some(LESSON_PLAN_APPROVE),
        _ => None,
    }
}

/// The effective access computed for a (tenant, role, permission) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Whether the role may perform the action at all
    pub allowed: bool,
    /// Whether performing the action puts the result through review
    pub requires_approval: bool,
}

impl Resolution {
    /// Not allowed; `requires_approval` is meaningless and held `false`.
    #[must_use]
    pub fn denied() -> Self {
        Self {
            allowed: false,
            requires_approval: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_entry_known_name() {
        let entry = registry_entry(LESSON_PLAN_SUBMIT).unwrap();
        assert_eq!(entry.resource, "lesson_plan");
        assert_eq!(entry.action, "submit");
    }

    #[test]
    fn test_registry_entry_unknown_name() {
        assert!(registry_entry("lesson_plan.telepathy").is_none());
        assert!(registry_entry("").is_none());
    }

    #[test]
    fn test_auto_approve_key_is_not_a_catalog_entry() {
        assert!(registry_entry(LESSON_PLAN_AUTO_APPROVE).is_none());
    }

    #[test]
    fn test_submit_defaults() {
        let entry = registry_entry(LESSON_PLAN_SUBMIT).unwrap();
        assert!(entry.allows(ROLE_TEACHER));
        assert!(entry.allows(ROLE_ADMIN));
        assert!(!entry.allows(ROLE_PARENT));
        assert!(entry.auto_approves(ROLE_DIRECTOR));
        assert!(entry.auto_approves(ROLE_ADMIN));
        assert!(!entry.auto_approves(ROLE_TEACHER));
        assert!(!entry.auto_approves(ROLE_ASSISTANT_DIRECTOR));
    }

    #[test]
    fn test_review_defaults_exclude_teachers() {
        for name in [LESSON_PLAN_APPROVE, LESSON_PLAN_REJECT] {
            let entry = registry_entry(name).unwrap();
            assert!(entry.allows(ROLE_ASSISTANT_DIRECTOR));
            assert!(entry.allows(ROLE_DIRECTOR));
            assert!(entry.allows(ROLE_ADMIN));
            assert!(!entry.allows(ROLE_TEACHER));
            assert!(!entry.allows(ROLE_PARENT));
        }
    }

    #[test]
    fn test_view_includes_parents() {
        let entry = registry_entry(LESSON_PLAN_VIEW).unwrap();
        assert!(entry.allows(ROLE_PARENT));
    }

    #[test]
    fn test_override_management_defaults() {
        let view = registry_entry(PERMISSION_OVERRIDE_VIEW).unwrap();
        assert!(view.allows(ROLE_DIRECTOR));
        assert!(view.allows(ROLE_ADMIN));
        assert!(!view.allows(ROLE_ASSISTANT_DIRECTOR));

        let manage = registry_entry(PERMISSION_OVERRIDE_MANAGE).unwrap();
        assert!(manage.allows(ROLE_ADMIN));
        assert!(!manage.allows(ROLE_DIRECTOR));
    }

    #[test]
    fn test_superadmin_never_listed() {
        for entry in REGISTRY {
            assert!(!entry.allows(ROLE_SUPERADMIN), "{}", entry.name);
            assert!(!entry.auto_approves(ROLE_SUPERADMIN), "{}", entry.name);
        }
    }

    #[test]
    fn test_registry_names_match_resource_and_action() {
        for entry in REGISTRY {
            assert_eq!(entry.name, format!("{}.{}", entry.resource, entry.action));
        }
    }

    #[test]
    fn test_paired_permission_symmetry() {
        assert_eq!(paired_permission(LESSON_PLAN_APPROVE), Some(LESSON_PLAN_REJECT));
        assert_eq!(paired_permission(LESSON_PLAN_REJECT), Some(LESSON_PLAN_APPROVE));
        assert_eq!(paired_permission(LESSON_PLAN_SUBMIT), None);
        assert_eq!(paired_permission("unknown"), None);
    }

    #[test]
    fn test_resolution_denied() {
        let res = Resolution::denied();
        assert!(!res.allowed);
        assert!(!res.requires_approval);
    }
}
