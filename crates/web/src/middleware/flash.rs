//! One-shot flash messages carried in the session.
//!
//! A handler queues a message with [`Flash::push`] before redirecting; the next
//! rendered page drains the queue with [`Flash::take_all`]. Draining removes
//! the queue in a single session operation, so a message is shown at most once.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// Flash mailbox for the current request's session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(flash: Flash) -> Result<Response> {
///     flash.push("Saved").await?;
///     Ok(Redirect::to("/").into_response())
/// }
/// ```
#[derive(Clone)]
pub struct Flash(Session);

impl Flash {
    /// Wrap a session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Queue a message for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn push(
        &self,
        message: impl Into<String>,
    ) -> Result<(), tower_sessions::session::Error> {
        let mut messages: Vec<String> = self
            .0
            .get(session_keys::FLASH)
            .await?
            .unwrap_or_default();
        messages.push(message.into());
        self.0.insert(session_keys::FLASH, messages).await
    }

    /// Remove and return every queued message, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or written.
    pub async fn take_all(&self) -> Result<Vec<String>, tower_sessions::session::Error> {
        Ok(self
            .0
            .remove::<Vec<String>>(session_keys::FLASH)
            .await?
            .unwrap_or_default())
    }
}

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_owned()))
    }
}
