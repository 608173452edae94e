//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebConfig;
use crate::db::UserStore;
use crate::services::auth::{AuthService, CredentialHasher};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The credential store and the
/// password hasher are trait objects so tests can run the full router against
/// in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Web service configuration
    /// * `users` - Credential store
    /// * `hasher` - Password hasher
    #[must_use]
    pub fn new(
        config: WebConfig,
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                hasher,
            }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the credential store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Get a reference to the password hasher.
    #[must_use]
    pub fn hasher(&self) -> &Arc<dyn CredentialHasher> {
        &self.inner.hasher
    }

    /// Authentication service over this state's store and hasher.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.users(), self.hasher())
    }
}
