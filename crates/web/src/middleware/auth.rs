//! Authentication extractors and session helpers.
//!
//! The only access-control checkpoint is [`RequireAuth`]: a presence check for
//! a [`CurrentUser`] in the session.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::flash::Flash;
use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};

/// Flash shown when a guarded page is requested without a login.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in first";

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, queues [`LOGIN_REQUIRED_MESSAGE`] and redirects to
/// the home page. The handler body never runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection produced by [`RequireAuth`].
pub enum AuthRejection {
    /// Not logged in; the flash has already been queued.
    LoginRequired,
    /// The session could not be read or written.
    Session(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::LoginRequired => Redirect::to("/").into_response(),
            Self::Session(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            AuthRejection::Session(AppError::Internal(
                "session layer is not installed".to_owned(),
            ))
        })?;

        let user: Option<CurrentUser> = session
            .get(session_keys::CURRENT_USER)
            .await
            .map_err(|e| AuthRejection::Session(e.into()))?;

        match user {
            Some(user) => Ok(Self(user)),
            None => {
                tracing::debug!(path = %parts.uri.path(), "Login required");
                Flash::new(session)
                    .push(LOGIN_REQUIRED_MESSAGE)
                    .await
                    .map_err(|e| AuthRejection::Session(e.into()))?;
                Err(AuthRejection::LoginRequired)
            }
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Bind a user to the session after a successful login.
///
/// The session id is cycled first so a pre-login session id cannot be reused
/// to ride the authenticated session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// End the session (logout).
///
/// Deletes the session record from the store, then empties the session so
/// the cookie is cleared. If the delete fails the session is left untouched
/// and the user stays logged in.
///
/// # Errors
///
/// Returns an error if the store delete fails.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.delete().await?;
    session.flush().await
}
