//! Login and logout route handlers.

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use gogn_core::Email;

use crate::{
    db::RepositoryError,
    error::AppError,
    filters,
    middleware::auth::{clear_current_admin, set_current_admin},
    models::CurrentAdmin,
    state::AppState,
};

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    /// Error message to show; empty when there is none.
    pub error_message: String,
}

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub access_key: String,
}

/// Login page handler.
#[instrument]
pub async fn login_page() -> Html<String> {
    let template = LoginTemplate {
        error_message: String::new(),
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Login form handler.
///
/// Unknown email and wrong access key produce the same error message, so
/// the form cannot be used to probe for operator accounts.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: tower_sessions::Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Ok(email) = Email::parse(form.email.trim()) else {
        return Ok(login_failed());
    };

    let access_key = SecretString::from(form.access_key);
    match state
        .admin_users()
        .verify_access_key(&email, &access_key)
        .await
    {
        Ok(admin) => {
            let current = CurrentAdmin::from(&admin);
            set_current_admin(&session, &current)
                .await
                .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
            tracing::info!(admin = %current.email, "admin logged in");
            Ok(Redirect::to("/members").into_response())
        }
        Err(RepositoryError::NotFound) => Ok(login_failed()),
        Err(e) => Err(AppError::Database(e)),
    }
}

/// Logout handler.
#[instrument(skip(session))]
pub async fn logout(session: tower_sessions::Session) -> Result<Redirect, AppError> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    Ok(Redirect::to("/login"))
}

fn login_failed() -> Response {
    let template = LoginTemplate {
        error_message: "Invalid email or access key".to_string(),
    };

    (
        axum::http::StatusCode::UNAUTHORIZED,
        Html(template.render().unwrap_or_else(|e| {
            tracing::error!("Template render error: {}", e);
            "Internal Server Error".to_string()
        })),
    )
        .into_response()
}
