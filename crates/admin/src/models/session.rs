//! Session key constants.

/// Keys under which values are stored in the tower-sessions session.
pub mod session_keys {
    /// The logged-in admin ([`crate::models::CurrentAdmin`]).
    pub const CURRENT_ADMIN: &str = "current_admin";
    /// The per-session anti-forgery token for the export form.
    pub const CSRF_TOKEN: &str = "csrf_token";
}
