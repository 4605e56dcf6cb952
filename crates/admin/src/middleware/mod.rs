//! Middleware and extractors for the admin panel.

pub mod auth;
pub mod csrf;
pub mod session;

pub use auth::RequireAdmin;
pub use session::create_session_layer;
