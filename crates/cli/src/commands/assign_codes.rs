//! Member code assignment command.
//!
//! Runs the same assignor the admin panel runs on each roster render,
//! useful for backfilling codes after importing membership data.
//!
//! # Usage
//!
//! ```bash
//! gogn-cli assign-codes
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//! - `MEMBER_CODE_PREFIX` - Code prefix (default: GOGN)

use sqlx::PgPool;
use thiserror::Error;

use gogn_admin::db::{MembershipStore, RepositoryError};
use gogn_admin::roster::assignor::assign_member_codes;

use super::MissingDatabaseUrl;

/// Errors that can occur while assigning codes.
#[derive(Debug, Error)]
pub enum AssignError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingDatabaseUrl),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Assign member codes for every plan.
///
/// # Errors
///
/// Returns `AssignError` if the database is unreachable or any assignment
/// transaction fails.
pub async fn run() -> Result<(), AssignError> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;
    let prefix = std::env::var("MEMBER_CODE_PREFIX").unwrap_or_else(|_| "GOGN".to_string());

    tracing::info!("Connecting to admin database...");
    let pool = PgPool::connect(&database_url).await?;

    let store = MembershipStore::detect(pool.clone()).await?;
    if !store.is_available() {
        tracing::warn!("Membership tables not found; nothing to assign");
        return Ok(());
    }

    let stats = assign_member_codes(&pool, &store, &prefix).await?;
    tracing::info!(
        "Assignment complete: {} written, {} unchanged",
        stats.written,
        stats.unchanged
    );

    Ok(())
}
