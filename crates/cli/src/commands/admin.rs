//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! gogn-cli admin create -e admin@example.com -n "Admin Name" -r super_admin
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use rand::Rng;
use sqlx::PgPool;
use thiserror::Error;

use gogn_admin::db::admin_users::{AdminUserRepository, hash_access_key};
use gogn_admin::db::RepositoryError;
use gogn_core::{AdminRole, Email, EmailError};

use super::MissingDatabaseUrl;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingDatabaseUrl),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin, viewer")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Create a new admin user.
///
/// Generates a random access key, stores its hash, and logs the key once.
/// The key cannot be recovered afterwards.
///
/// # Errors
///
/// Returns `AdminError` if the inputs are invalid, the database is
/// unreachable, or the email is already taken.
pub async fn create_user(email: &str, name: &str, role: &str) -> Result<i64, AdminError> {
    dotenvy::dotenv().ok();

    let role = AdminRole::from_name(role).ok_or_else(|| AdminError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email)?;

    let database_url = super::database_url()?;

    tracing::info!("Connecting to admin database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating admin user: {} ({})", email, role.as_name());

    let access_key = hex::encode(rand::rng().random::<[u8; 32]>());
    let repo = AdminUserRepository::new(&pool);
    let admin = repo
        .create(&email, name, role, &hash_access_key(&access_key))
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        admin.id,
        admin.email,
        admin.role.as_name()
    );
    tracing::info!("");
    tracing::info!("Access key (shown once, store it securely):");
    tracing::info!("  {}", access_key);

    Ok(admin.id.as_i64())
}
