//! Authentication route handlers.
//!
//! Signup, login and logout. Every outcome is a redirect; failures carry their
//! explanation as a flash message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, report, set_sentry_user};
use crate::filters;
use crate::middleware::{Flash, OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Flash after a successful signup.
pub const SIGNUP_SUCCESS_MESSAGE: &str = "Account created successfully. Please log in.";

/// Flash when signup fails server-side.
pub const SIGNUP_FAILED_MESSAGE: &str = "Error creating account";

/// Flash when login fails server-side.
pub const LOGIN_FAILED_MESSAGE: &str = "Something went wrong";

// =============================================================================
// Form Types
// =============================================================================

/// Username/password form shared by signup and login.
///
/// Missing fields deserialize as empty strings so they reach the same
/// validation path as blank ones.
#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub messages: Vec<String>,
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
#[instrument(skip_all)]
pub async fn signup_page(flash: Flash) -> Result<impl IntoResponse> {
    let messages = flash.take_all().await?;
    Ok(SignupTemplate { messages })
}

/// Handle signup form submission.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    flash: Flash,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    add_breadcrumb("auth", "Signup submitted", None);

    match state
        .auth()
        .register_with_password(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, username = %user.username, "Account created");
            flash.push(SIGNUP_SUCCESS_MESSAGE).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            report("Signup", &e);
            let message = e
                .user_message()
                .unwrap_or_else(|| SIGNUP_FAILED_MESSAGE.to_owned());
            flash.push(message).await?;
            Ok(Redirect::to("/signup").into_response())
        }
    }
}

// =============================================================================
// Login / Logout Routes
// =============================================================================

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    add_breadcrumb("auth", "Login submitted", None);

    match state
        .auth()
        .login_with_password(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, user.username.as_str());
            tracing::info!(user_id = %user.id, username = %user.username, "User logged in");
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(e) => {
            report("Login", &e);
            let message = e
                .user_message()
                .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_owned());
            Flash::new(session).push(message).await?;
            Ok(Redirect::to("/").into_response())
        }
    }
}

/// Handle logout.
///
/// A failed store delete is not fatal: the user is sent back to the
/// dashboard to retry.
#[instrument(skip_all)]
pub async fn logout(OptionalAuth(user): OptionalAuth, session: Session) -> Response {
    match clear_current_user(&session).await {
        Ok(()) => {
            clear_sentry_user();
            if let Some(user) = user {
                tracing::info!(user_id = %user.id, username = %user.username, "User logged out");
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to end session on logout");
            Redirect::to("/dashboard").into_response()
        }
    }
}
