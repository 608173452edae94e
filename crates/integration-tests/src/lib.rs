//! End-to-end test harness for Latchkey.
//!
//! [`TestApp::spawn`] serves the real router on an ephemeral port, backed by
//! in-memory stores for accounts and sessions, so the tests need no database.
//! Both stores can be switched into a failing state (see [`faults`]).
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p latchkey-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

pub mod faults;

pub use faults::{FaultySessionStore, FaultyUserStore};

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use argon2::Params;
use reqwest::{Client, Response, header};
use secrecy::SecretString;
use tokio::task::JoinHandle;
use url::Url;

use latchkey_web::config::{SentryConfig, WebConfig};
use latchkey_web::middleware::session::SESSION_COOKIE_NAME;
use latchkey_web::routes;
use latchkey_web::services::auth::Argon2Hasher;
use latchkey_web::state::AppState;

/// Stylesheet directory of the web crate.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static");

/// A running server plus handles to its in-memory state.
pub struct TestApp {
    /// Address the server listens on.
    pub addr: SocketAddr,
    /// Account store behind the server.
    pub users: Arc<FaultyUserStore>,
    /// Session store behind the server.
    pub sessions: FaultySessionStore,
    server: JoinHandle<()>,
}

impl TestApp {
    /// Start a server on `127.0.0.1:0`.
    ///
    /// Passwords are hashed with real Argon2id at minimal cost.
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let users = Arc::new(FaultyUserStore::default());
        let sessions = FaultySessionStore::default();
        let hasher = Argon2Hasher::with_params(
            Params::new(Params::MIN_M_COST, 1, 1, None).expect("Invalid Argon2 parameters"),
        );
        let state = AppState::new(test_config(addr), users.clone(), Arc::new(hasher));

        let app = routes::app(state, sessions.clone(), Path::new(STATIC_DIR));
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            addr,
            users,
            sessions,
            server,
        }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A fresh browser-like client with its own cookie jar.
    ///
    /// Redirects are not followed so tests can assert on them.
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// A client without a cookie jar, for replaying cookies by hand.
    #[must_use]
    pub fn bare_client() -> Client {
        Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Submit the signup form.
    pub async fn signup(&self, client: &Client, username: &str, password: &str) -> Response {
        self.post_form(client, "/signup", &[("username", username), ("password", password)])
            .await
    }

    /// Submit the login form.
    pub async fn login(&self, client: &Client, username: &str, password: &str) -> Response {
        self.post_form(client, "/login", &[("username", username), ("password", password)])
            .await
    }

    /// POST a form body to `path`.
    pub async fn post_form(&self, client: &Client, path: &str, form: &[(&str, &str)]) -> Response {
        client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to send form")
    }

    /// GET `path` and return the status and body.
    pub async fn get_page(&self, client: &Client, path: &str) -> (reqwest::StatusCode, String) {
        let response = client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        let status = response.status();
        let body = response.text().await.expect("Failed to read body");
        (status, body)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// The `name=value` pair of the session cookie set by `response`, if any.
#[must_use]
pub fn session_cookie(response: &Response) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE_NAME}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with(&prefix))
        .find_map(|v| v.split(';').next().map(str::to_owned))
}

fn test_config(addr: SocketAddr) -> WebConfig {
    WebConfig {
        database_url: SecretString::from("postgres://unused"),
        host: addr.ip(),
        port: addr.port(),
        base_url: Url::parse(&format!("http://{addr}")).expect("Invalid test base URL"),
        session_secret: SecretString::from("q8Zt3vLx0Wm5Rk2Pj7Ny4Bc9Hs6Df1Ga"),
        sentry: SentryConfig::default(),
    }
}
