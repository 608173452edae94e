//! Authentication service.
//!
//! Username/password registration and login over a [`UserStore`] and a
//! [`CredentialHasher`].

mod error;
pub mod password;

pub use error::{
    AuthError, INVALID_CREDENTIALS_MESSAGE, MISSING_FIELDS_MESSAGE, USERNAME_TAKEN_MESSAGE,
};
pub use password::{Argon2Hasher, CredentialHasher};

use std::sync::Arc;

use latchkey_core::Username;

use crate::db::{RepositoryError, UserStore};
use crate::models::user::User;

/// Authentication service.
///
/// Borrowed from [`AppState`](crate::state::AppState) per request; holds no state of its own.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    hasher: &'a Arc<dyn CredentialHasher>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore, hasher: &'a Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    /// Register a new user with username and password.
    ///
    /// The existence lookup only short-circuits the common duplicate case;
    /// the store's uniqueness constraint decides concurrent signups.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if either field is empty.
    /// Returns `AuthError::InvalidUsername` if the username fails validation.
    /// Returns `AuthError::UserAlreadyExists` if the username is already registered.
    /// Returns `AuthError::Repository` or `AuthError::PasswordHash` on server-side failure.
    pub async fn register_with_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let username = Username::parse(username)?;

        if self.users.get_by_username(&username).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = self.hash_password(password).await?;

        let user = self
            .users
            .create(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// Every credential failure collapses into `InvalidCredentials` so the
    /// caller cannot tell an unknown username from a wrong password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    /// Returns `AuthError::Repository` or `AuthError::PasswordHash` on server-side failure.
    pub async fn login_with_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let Some((user, password_hash)) = self.users.get_password_hash(&username).await? else {
            self.verify_absent(password).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = Arc::clone(self.hasher);
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
    }

    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, AuthError> {
        let hasher = Arc::clone(self.hasher);
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
    }

    async fn verify_absent(&self, password: &str) -> Result<(), AuthError> {
        let hasher = Arc::clone(self.hasher);
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify_absent(&password))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }
}
