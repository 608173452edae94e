//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use latchkey_core::{UserId, Username};

/// A registered account (domain type).
///
/// The password hash is not part of this type; it only leaves
/// the store through [`UserStore::get_password_hash`](crate::db::UserStore::get_password_hash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique, case-sensitive username.
    pub username: Username,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
