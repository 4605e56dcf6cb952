//! CLI command implementations.

pub mod admin;
pub mod assign_codes;
pub mod migrate;
pub mod seed;

/// Load the admin database URL from the environment, falling back to
/// `DATABASE_URL`.
pub(crate) fn database_url() -> Result<String, MissingDatabaseUrl> {
    std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MissingDatabaseUrl)
}

/// Neither `ADMIN_DATABASE_URL` nor `DATABASE_URL` is set.
#[derive(Debug, thiserror::Error)]
#[error("Missing environment variable: ADMIN_DATABASE_URL (or DATABASE_URL)")]
pub struct MissingDatabaseUrl;
