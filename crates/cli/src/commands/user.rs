//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! latchkey-cli user create -u alice -p hunter2
//! ```
//!
//! Users are created through the same registration path as the signup form,
//! so the same validation and hashing apply.

use std::sync::Arc;

use latchkey_core::UserId;
use latchkey_web::config::{ConfigError, database_url_from_env};
use latchkey_web::db::{self, PgUserRepository};
use latchkey_web::services::auth::{Argon2Hasher, AuthError, AuthService, CredentialHasher};
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Registration was rejected or failed.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create a new user.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `UserError::Auth` if the username is invalid or taken.
pub async fn create_user(username: &str, password: &str) -> Result<UserId, UserError> {
    let database_url = database_url_from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let users = PgUserRepository::new(pool);
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::new());

    let user = AuthService::new(&users, &hasher)
        .register_with_password(username, password)
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );

    Ok(user.id)
}
