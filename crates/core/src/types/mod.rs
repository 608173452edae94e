//! Core types for Latchkey.

pub mod id;
pub mod username;

pub use id::*;
pub use username::{Username, UsernameError};
