//! Read-only access to the membership add-on's tables.
//!
//! The `membership` schema belongs to an optional add-on and may be
//! missing entirely. [`MembershipStore::detect`] probes for it once at
//! startup; when absent, every query degrades to an empty result so the
//! rest of the panel keeps working without plan data.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gogn_core::{MembershipId, PlanId, UserId};

use super::RepositoryError;
use crate::models::{Membership, Plan};

/// Internal row type for plan queries.
#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: i64,
    name: String,
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        Self {
            id: PlanId::new(row.id),
            name: row.name,
        }
    }
}

/// Internal row type for membership queries (joined with the plan name).
#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    id: i64,
    user_id: i64,
    plan_id: i64,
    plan_name: String,
    status: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
}

impl From<MembershipRow> for Membership {
    fn from(row: MembershipRow) -> Self {
        Self {
            id: MembershipId::new(row.id),
            user_id: UserId::new(row.user_id),
            plan_id: PlanId::new(row.plan_id),
            plan_name: row.plan_name,
            status: row.status,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

/// Store for membership add-on data, aware of its own availability.
#[derive(Debug, Clone)]
pub struct MembershipStore {
    pool: PgPool,
    available: bool,
}

impl MembershipStore {
    /// Probe for the add-on's tables and build a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the probe query itself fails;
    /// a missing schema is not an error.
    pub async fn detect(pool: PgPool) -> Result<Self, RepositoryError> {
        let regclass: Option<String> =
            sqlx::query_scalar("SELECT to_regclass('membership.plan')::text")
                .fetch_one(&pool)
                .await?;

        Ok(Self {
            pool,
            available: regclass.is_some(),
        })
    }

    /// Whether the membership add-on's tables exist.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// All plans, ordered by name. Empty when the add-on is absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn plans(&self) -> Result<Vec<Plan>, RepositoryError> {
        if !self.available {
            return Ok(Vec::new());
        }

        let rows: Vec<PlanRow> =
            sqlx::query_as("SELECT id, name FROM membership.plan ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Plan::from).collect())
    }

    /// The user's most recent active membership, if any.
    ///
    /// A user can hold several records over time; the roster shows the one
    /// with the latest start date whose status is `active`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn membership_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Membership>, RepositoryError> {
        if !self.available {
            return Ok(None);
        }

        let row: Option<MembershipRow> = sqlx::query_as(
            r"
            SELECT m.id, m.user_id, m.plan_id, p.name AS plan_name,
                   m.status, m.start_date, m.end_date
            FROM membership.membership m
            JOIN membership.plan p ON p.id = m.plan_id
            WHERE m.user_id = $1 AND m.status = 'active'
            ORDER BY m.start_date DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Membership::from))
    }
}
