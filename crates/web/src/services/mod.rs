//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Username/password registration and login

pub mod auth;
