//! Synchronizer-token CSRF protection for state-changing forms.
//!
//! A random token lives in the session and is embedded in each form; the
//! POST handler compares the submitted copy against the stored one and
//! fails closed on any mismatch.

use rand::Rng;
use tower_sessions::Session;

use crate::models::session_keys;

/// Get the session's CSRF token, creating one on first use.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn ensure_csrf_token(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(token) = session.get::<String>(session_keys::CSRF_TOKEN).await? {
        return Ok(token);
    }

    let token = hex::encode(rand::rng().random::<[u8; 32]>());
    session
        .insert(session_keys::CSRF_TOKEN, token.clone())
        .await?;
    Ok(token)
}

/// Check a submitted token against the session's stored one.
///
/// Returns `false` when no token has been issued yet, so a forged POST
/// before any page render is still rejected.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn verify_csrf_token(
    session: &Session,
    submitted: &str,
) -> Result<bool, tower_sessions::session::Error> {
    let stored = session.get::<String>(session_keys::CSRF_TOKEN).await?;
    Ok(stored.is_some_and(|token| !submitted.is_empty() && token == submitted))
}
