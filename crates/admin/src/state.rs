//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::db::{AdminUserRepository, MembershipStore, RepositoryError, UserRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    memberships: MembershipStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Probes once for the membership add-on's tables; their absence is a
    /// supported configuration, not a startup failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the availability probe fails.
    pub async fn new(config: AdminConfig, pool: PgPool) -> Result<Self, RepositoryError> {
        let memberships = MembershipStore::detect(pool.clone()).await?;
        if !memberships.is_available() {
            tracing::warn!("membership tables not found; plan features disabled");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                memberships,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the membership add-on store.
    #[must_use]
    pub fn memberships(&self) -> &MembershipStore {
        &self.inner.memberships
    }

    /// Get a repository for host user store operations.
    #[must_use]
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.inner.pool)
    }

    /// Get a repository for admin user operations.
    #[must_use]
    pub fn admin_users(&self) -> AdminUserRepository<'_> {
        AdminUserRepository::new(&self.inner.pool)
    }
}
