//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (binary only)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame and referrer policy)
//! 5. Session layer (tower-sessions, signed cookie)
//!
//! Extractors: [`Flash`], [`RequireAuth`], [`OptionalAuth`].

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    LOGIN_REQUIRED_MESSAGE, OptionalAuth, RequireAuth, clear_current_user, set_current_user,
};
pub use flash::Flash;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
