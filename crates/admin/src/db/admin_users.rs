//! Repository for admin user (panel operator) operations.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use gogn_core::{AdminRole, AdminUserId, Email};

use super::RepositoryError;
use crate::models::AdminUser;

/// Database row for admin users. Converted to the domain type via
/// `TryFrom`, which validates the stored email and role.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i64,
    email: String,
    name: String,
    role: String,
    access_key_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email for admin {}: {e}", row.id))
        })?;
        let role = AdminRole::from_name(&row.role).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "unknown role '{}' for admin {}",
                row.role, row.id
            ))
        })?;

        Ok(Self {
            id: AdminUserId::new(row.id),
            email,
            name: row.name,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Hash an access key for storage or comparison.
#[must_use]
pub fn hash_access_key(access_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(access_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Repository for admin user operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up an admin by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no admin has that email, or
    /// `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<AdminUser, RepositoryError> {
        let row: Option<AdminUserRow> = sqlx::query_as(
            r"
            SELECT id, email, name, role, access_key_hash, created_at, updated_at
            FROM admin.admin_user
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Verify an access key for the given email.
    ///
    /// Returns the admin on success, `NotFound` on unknown email or wrong
    /// key. The two failure modes are deliberately indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` on any credential mismatch.
    pub async fn verify_access_key(
        &self,
        email: &Email,
        access_key: &SecretString,
    ) -> Result<AdminUser, RepositoryError> {
        let row: Option<AdminUserRow> = sqlx::query_as(
            r"
            SELECT id, email, name, role, access_key_hash, created_at, updated_at
            FROM admin.admin_user
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };

        if row.access_key_hash != hash_access_key(access_key.expose_secret()) {
            return Err(RepositoryError::NotFound);
        }

        row.try_into()
    }

    /// Create a new admin with the given access key hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        role: AdminRole,
        access_key_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        let row: AdminUserRow = sqlx::query_as(
            r"
            INSERT INTO admin.admin_user (email, name, role, access_key_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, access_key_hash, created_at, updated_at
            ",
        )
        .bind(email.as_str())
        .bind(name)
        .bind(role.as_name())
        .bind(access_key_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("admin with email {email} already exists"))
            }
            _ => RepositoryError::Database(e),
        })?;

        row.try_into()
    }

    /// List all admins, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows: Vec<AdminUserRow> = sqlx::query_as(
            r"
            SELECT id, email, name, role, access_key_hash, created_at, updated_at
            FROM admin.admin_user
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_access_key_is_stable_hex() {
        let hash = hash_access_key("correct horse battery staple");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_access_key("correct horse battery staple"));
    }

    #[test]
    fn test_hash_access_key_differs_per_key() {
        assert_ne!(hash_access_key("a"), hash_access_key("b"));
    }
}
