//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! GET  /                       - Redirect to the members roster
//!
//! # Auth (access key)
//! GET  /login                  - Login page
//! POST /login                  - Verify email + access key
//! POST /logout                 - Logout
//!
//! # Members
//! GET  /members                - Roster listing (search, plan filter, sort)
//! POST /members/export         - CSV export (admin role, CSRF protected)
//! ```

pub mod auth;
pub mod members;

use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/members") }))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/members", get(members::index))
        .route("/members/export", post(members::export_csv))
}
