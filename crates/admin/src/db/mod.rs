//! Database operations for the admin panel.
//!
//! # Schemas
//!
//! - `admin` - owned by this panel: `admin_user` (operators) and `session`
//!   (tower-sessions storage)
//! - `directory` - the host user store (read, plus one metadata key written)
//! - `membership` - the membership add-on's tables (read-only); may be
//!   absent entirely, in which case all plan features are disabled
//!
//! # Migrations
//!
//! Migrations cover only the `admin` schema (the other schemas are not ours)
//! and are stored in `crates/admin/migrations/`. Run via:
//! ```bash
//! cargo run -p gogn-cli -- migrate
//! ```

pub mod admin_users;
pub mod memberships;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use memberships::MembershipStore;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
