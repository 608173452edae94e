//! In-memory user repository.
//!
//! Used by tests and throwaway local runs. Records live only as long as the
//! process. The existence check and the insert happen under one write guard,
//! so uniqueness holds under concurrent signups.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use latchkey_core::{UserId, Username};

use super::{RepositoryError, UserStore};
use crate::models::user::User;

#[derive(Default)]
struct Records {
    next_id: i32,
    by_username: HashMap<Username, (User, String)>,
}

/// User repository that keeps records in process memory.
#[derive(Default)]
pub struct MemoryUserRepository {
    records: RwLock<Records>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.records.read().await.by_username.len()
    }

    /// Whether no users are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.by_username.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut guard = self.records.write().await;
        let records = &mut *guard;
        let id = records
            .next_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::DataCorruption("user id overflow".to_owned()))?;

        match records.by_username.entry(username.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            )),
            Entry::Vacant(slot) => {
                let user = User {
                    id: UserId::new(id),
                    username: username.clone(),
                    created_at: Utc::now(),
                };
                slot.insert((user.clone(), password_hash.to_owned()));
                records.next_id = id;
                Ok(user)
            }
        }
    }

    async fn get_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records
            .by_username
            .get(username)
            .map(|(user, _)| user.clone()))
    }

    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.by_username.get(username).cloned())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
