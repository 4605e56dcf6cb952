//! Admin user domain types.
//!
//! These types represent validated domain objects for panel operators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gogn_core::{AdminRole, AdminUserId, Email};

/// A panel operator (domain type).
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// Admin's role/permission level.
    pub role: AdminRole,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The logged-in admin as stored in the session.
///
/// A trimmed copy of [`AdminUser`]; serialized into the session store on
/// login and read back by the auth extractors on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(admin: &AdminUser) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
            role: admin.role,
        }
    }
}

impl CurrentAdmin {
    /// Whether this operator may trigger the CSV export.
    #[must_use]
    pub const fn can_export(&self) -> bool {
        self.role.can_export()
    }
}
