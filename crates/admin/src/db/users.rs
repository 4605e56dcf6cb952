//! Repository for the host user store (`directory` schema).
//!
//! The panel does not own this schema: it pages and searches the user
//! table and reads/writes exactly one metadata key, the synthetic member
//! code.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gogn_core::UserId;

use super::RepositoryError;
use crate::models::User;
use crate::roster::SortDirection;

/// The single `directory.user_meta` key this panel writes.
pub const MEMBER_CODE_META_KEY: &str = "member_code";

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    display_name: Option<String>,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            display_name: row.display_name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

/// Repository for host user store operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count users matching the search text (all users when `None`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, search: Option<&str>) -> Result<i64, RepositoryError> {
        let pattern = search_pattern(search);
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM directory.users
            WHERE $1::text IS NULL
               OR display_name ILIKE $1
               OR email ILIKE $1
            ",
        )
        .bind(pattern)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Fetch one page of users matching the search text, ordered by
    /// display name in the given direction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_page(
        &self,
        search: Option<&str>,
        dir: SortDirection,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, RepositoryError> {
        let pattern = search_pattern(search);
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            r"
            SELECT id, display_name, email, created_at
            FROM directory.users
            WHERE $1::text IS NULL
               OR display_name ILIKE $1
               OR email ILIKE $1
            ORDER BY display_name {} NULLS LAST, id ASC
            LIMIT $2 OFFSET $3
            ",
            dir.as_sql()
        ))
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Fetch every user matching the search text, ordered by display name.
    ///
    /// Used by the plan-filtered roster path, which must materialize the
    /// whole user set before filtering in memory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(
        &self,
        search: Option<&str>,
        dir: SortDirection,
    ) -> Result<Vec<User>, RepositoryError> {
        let pattern = search_pattern(search);
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            r"
            SELECT id, display_name, email, created_at
            FROM directory.users
            WHERE $1::text IS NULL
               OR display_name ILIKE $1
               OR email ILIKE $1
            ORDER BY display_name {} NULLS LAST, id ASC
            ",
            dir.as_sql()
        ))
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Read the stored member code for a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn member_code(&self, user_id: UserId) -> Result<Option<String>, RepositoryError> {
        let code: Option<String> = sqlx::query_scalar(
            r"
            SELECT meta_value
            FROM directory.user_meta
            WHERE user_id = $1 AND meta_key = $2
            ",
        )
        .bind(user_id)
        .bind(MEMBER_CODE_META_KEY)
        .fetch_optional(self.pool)
        .await?;

        Ok(code)
    }
}

/// Build the ILIKE pattern for a search term, or `None` for no filtering.
fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern_wraps_term() {
        assert_eq!(search_pattern(Some("ada")), Some("%ada%".to_string()));
    }

    #[test]
    fn test_search_pattern_empty_is_none() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("")), None);
        assert_eq!(search_pattern(Some("   ")), None);
    }
}
