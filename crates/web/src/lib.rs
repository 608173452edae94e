//! Latchkey web service library.
//!
//! Username/password signup, login, a session-gated dashboard and one-shot
//! flash messages. The binary in `main.rs` wires this library to `PostgreSQL`;
//! tests wire it to in-memory stores through [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
