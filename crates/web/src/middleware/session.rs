//! Session middleware configuration.
//!
//! The layer is generic over the store: `PostgresStore` in production,
//! `MemoryStore` in tests. Cookies are signed with a key derived from the
//! configured session secret.

use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use tower_sessions::{
    Expiry, SessionManagerLayer, SessionStore,
    cookie::{Key, SameSite, time::Duration},
    service::SignedCookie,
};

use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "latchkey_session";

/// Session expiry time in seconds (7 days).
pub const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over `store`.
///
/// # Arguments
///
/// * `store` - Backing session store
/// * `config` - Web configuration (for session secret and cookie security)
#[must_use]
pub fn create_session_layer<Store>(
    store: Store,
    config: &WebConfig,
) -> SessionManagerLayer<Store, SignedCookie>
where
    Store: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config))
}

/// Derive the 64-byte cookie signing key from the session secret.
fn signing_key(config: &WebConfig) -> Key {
    let digest = Sha512::digest(config.session_secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}
