//! Domain models for the admin panel.

pub mod admin_user;
pub mod member;
pub mod session;

pub use admin_user::{AdminUser, CurrentAdmin};
pub use member::{Membership, Plan, User};
pub use session::session_keys;

// Re-export the role enum from core for convenience
pub use gogn_core::AdminRole;
