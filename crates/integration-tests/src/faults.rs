//! Stores that can be switched into a failing state mid-test.
//!
//! Both wrap the in-memory stores and behave exactly like them until told to
//! fail, so a test can sign up and log in first and then break the backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tower_sessions::session::{Id, Record};
use tower_sessions::{MemoryStore, SessionStore, session_store};

use latchkey_core::Username;
use latchkey_web::db::{MemoryUserRepository, RepositoryError, UserStore};
use latchkey_web::models::user::User;

/// Account store that can be made unreachable.
#[derive(Default)]
pub struct FaultyUserStore {
    inner: MemoryUserRepository,
    down: AtomicBool,
}

impl FaultyUserStore {
    /// Make every following call fail (`true`) or succeed again (`false`).
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    /// Whether no account is stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty().await
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for FaultyUserStore {
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        self.check()?;
        self.inner.create(username, password_hash).await
    }

    async fn get_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        self.check()?;
        self.inner.get_by_username(username).await
    }

    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        self.check()?;
        self.inner.get_password_hash(username).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check()?;
        self.inner.ping().await
    }
}

/// Session store whose deletes can be made to fail.
///
/// Clones share both the sessions and the switch.
#[derive(Debug, Clone, Default)]
pub struct FaultySessionStore {
    inner: MemoryStore,
    fail_deletes: Arc<AtomicBool>,
}

impl FaultySessionStore {
    /// Make every following delete fail (`true`) or succeed again (`false`).
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionStore for FaultySessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        self.inner.create(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.inner.save(record).await
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        self.inner.load(id).await
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(session_store::Error::Backend("session store down".to_owned()));
        }
        self.inner.delete(id).await
    }
}
