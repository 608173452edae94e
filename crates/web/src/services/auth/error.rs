//! Authentication error types.

use thiserror::Error;

use latchkey_core::UsernameError;

use crate::db::RepositoryError;

/// Flash text for a signup or login form with an empty field.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill all fields";

/// Flash text for a taken username.
pub const USERNAME_TAKEN_MESSAGE: &str = "Username already exists";

/// Flash text for any failed login, whatever the reason.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required form field was empty.
    #[error("missing required fields")]
    MissingFields,

    /// Username failed validation.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl AuthError {
    /// Text safe to show the user, or `None` for server-side failures.
    ///
    /// Server-side failures get a generic message chosen by the caller.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::MissingFields => Some(MISSING_FIELDS_MESSAGE.to_owned()),
            Self::InvalidUsername(UsernameError::Empty) => Some(MISSING_FIELDS_MESSAGE.to_owned()),
            Self::InvalidUsername(err) => Some(capitalize(&err.to_string())),
            Self::UserAlreadyExists => Some(USERNAME_TAKEN_MESSAGE.to_owned()),
            Self::InvalidCredentials => Some(INVALID_CREDENTIALS_MESSAGE.to_owned()),
            Self::Repository(_) | Self::PasswordHash(_) => None,
        }
    }

    /// Whether this error indicates a server-side failure worth reporting.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::PasswordHash(_))
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            AuthError::MissingFields.user_message().as_deref(),
            Some("Please fill all fields")
        );
        assert_eq!(
            AuthError::UserAlreadyExists.user_message().as_deref(),
            Some("Username already exists")
        );
        assert_eq!(
            AuthError::InvalidCredentials.user_message().as_deref(),
            Some("Invalid username or password.")
        );
        assert_eq!(
            AuthError::InvalidUsername(UsernameError::TooLong { max: 64 })
                .user_message()
                .as_deref(),
            Some("Username must be at most 64 characters")
        );
    }

    #[test]
    fn test_empty_username_reads_as_missing_field() {
        assert_eq!(
            AuthError::InvalidUsername(UsernameError::Empty)
                .user_message()
                .as_deref(),
            Some(MISSING_FIELDS_MESSAGE)
        );
    }

    #[test]
    fn test_server_errors_have_no_user_message() {
        let err = AuthError::PasswordHash("boom".to_owned());
        assert!(err.is_server_error());
        assert!(err.user_message().is_none());

        let err = AuthError::Repository(RepositoryError::DataCorruption("bad".to_owned()));
        assert!(err.is_server_error());
        assert!(err.user_message().is_none());

        assert!(!AuthError::InvalidCredentials.is_server_error());
    }
}
