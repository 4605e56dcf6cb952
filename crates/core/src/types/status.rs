//! Status and role enums.

use serde::{Deserialize, Serialize};

/// Resolved membership status shown on the roster.
///
/// A membership resolves to `Active` when its record carries an active
/// status and the end date is null or in the future. Everything else,
/// including users with no membership at all, is `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    #[default]
    Inactive,
}

impl MembershipStatus {
    /// Human-readable label used by the roster table and CSV export.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

/// Admin role for panel authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "text", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access, including admin-user management.
    SuperAdmin,
    /// Can view the roster and export it.
    Admin,
    /// Read-only access to the roster; cannot export.
    Viewer,
}

impl AdminRole {
    /// Whether this role may trigger the CSV export.
    #[must_use]
    pub const fn can_export(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    /// Parse a role from its snake_case name.
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(Self::SuperAdmin),
            "admin" => Some(Self::Admin),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// The snake_case name stored in the database.
    #[must_use]
    pub const fn as_name(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_status_label() {
        assert_eq!(MembershipStatus::Active.label(), "Active");
        assert_eq!(MembershipStatus::Inactive.label(), "Inactive");
    }

    #[test]
    fn test_membership_status_default_is_inactive() {
        assert_eq!(MembershipStatus::default(), MembershipStatus::Inactive);
    }

    #[test]
    fn test_admin_role_export_capability() {
        assert!(AdminRole::SuperAdmin.can_export());
        assert!(AdminRole::Admin.can_export());
        assert!(!AdminRole::Viewer.can_export());
    }

    #[test]
    fn test_admin_role_name_roundtrip() {
        for role in [AdminRole::SuperAdmin, AdminRole::Admin, AdminRole::Viewer] {
            assert_eq!(AdminRole::from_name(role.as_name()), Some(role));
        }
        assert_eq!(AdminRole::from_name("root"), None);
    }
}
