//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                - Home page (login form, pending messages)
//! GET  /signup          - Signup page
//! POST /signup          - Signup action
//! POST /login           - Login action
//! GET  /dashboard       - Dashboard (requires auth)
//! GET  /logout          - Logout action
//! POST /logout          - Logout action
//! GET  /health          - Liveness check
//! GET  /health/ready    - Readiness check
//! GET  /static/*        - Stylesheet
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod home;

use std::path::Path;
use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create all page and health routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", post(auth::login))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Build the complete application router.
///
/// Sessions live in `session_store`; `static_dir` is served under `/static`.
/// Sentry layers are left to the binary so tests run without a client.
pub fn app<Store>(state: AppState, session_store: Store, static_dir: &Path) -> Router
where
    Store: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, state.config());

    routes()
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}
