//! Development data seeding.
//!
//! Creates the external `directory` and `membership` schemas with a small
//! fixture set so the panel can be developed against a local database.
//! Never run against an environment where those schemas are owned by the
//! real host system.
//!
//! # Usage
//!
//! ```bash
//! gogn-cli seed
//! ```

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use thiserror::Error;

use super::MissingDatabaseUrl;

/// Errors that can occur during seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingDatabaseUrl),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

const SCHEMA_SQL: &str = r"
CREATE SCHEMA IF NOT EXISTS directory;
CREATE SCHEMA IF NOT EXISTS membership;

CREATE TABLE IF NOT EXISTS directory.users (
    id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
    display_name TEXT,
    email TEXT NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS directory.user_meta (
    user_id BIGINT NOT NULL REFERENCES directory.users (id) ON DELETE CASCADE,
    meta_key TEXT NOT NULL,
    meta_value TEXT NOT NULL,
    PRIMARY KEY (user_id, meta_key)
);

CREATE TABLE IF NOT EXISTS membership.plan (
    id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS membership.membership (
    id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES directory.users (id) ON DELETE CASCADE,
    plan_id BIGINT NOT NULL REFERENCES membership.plan (id) ON DELETE CASCADE,
    status TEXT NOT NULL DEFAULT 'active',
    start_date TIMESTAMPTZ NOT NULL,
    end_date TIMESTAMPTZ
);
";

/// Fixture users: (display name, email).
const USERS: &[(Option<&str>, &str)] = &[
    (Some("Ada Lovelace"), "ada@example.com"),
    (Some("Grace Hopper"), "grace@example.com"),
    (Some("Alan Turing"), "alan@example.com"),
    (None, "anon@example.com"),
];

/// Seed the database with development data.
///
/// Idempotent: existing fixture rows are left alone.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or a statement fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;

    tracing::info!("Connecting to admin database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating directory and membership schemas...");
    sqlx::raw_sql(SCHEMA_SQL).execute(&pool).await?;

    tracing::info!("Inserting fixture users...");
    for (display_name, email) in USERS {
        sqlx::query(
            r"
            INSERT INTO directory.users (display_name, email)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            ",
        )
        .bind(display_name)
        .bind(email)
        .execute(&pool)
        .await?;
    }

    tracing::info!("Inserting fixture plans and memberships...");
    for plan in ["Gold", "Silver"] {
        sqlx::query(
            r"
            INSERT INTO membership.plan (name)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM membership.plan WHERE name = $1)
            ",
        )
        .bind(plan)
        .execute(&pool)
        .await?;
    }

    let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).single();
    sqlx::query(
        r"
        INSERT INTO membership.membership (user_id, plan_id, status, start_date)
        SELECT u.id, p.id, 'active', $1
        FROM directory.users u
        JOIN membership.plan p ON p.name = 'Gold'
        WHERE u.email = 'ada@example.com'
          AND NOT EXISTS (
              SELECT 1 FROM membership.membership m WHERE m.user_id = u.id
          )
        ",
    )
    .bind(start)
    .execute(&pool)
    .await?;

    sqlx::query(
        r"
        INSERT INTO membership.membership (user_id, plan_id, status, start_date)
        SELECT u.id, p.id, 'active', $1
        FROM directory.users u
        JOIN membership.plan p ON p.name = 'Silver'
        WHERE u.email = 'grace@example.com'
          AND NOT EXISTS (
              SELECT 1 FROM membership.membership m WHERE m.user_id = u.id
          )
        ",
    )
    .bind(start)
    .execute(&pool)
    .await?;

    tracing::info!("Seed complete!");
    Ok(())
}
