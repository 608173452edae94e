//! `PostgreSQL` user repository.
//!
//! Uniqueness of `username` is enforced by the `UNIQUE` constraint on
//! `latchkey.account`; a violation is reported as `RepositoryError::Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use latchkey_core::{UserId, Username};

use super::{RepositoryError, UserStore};
use crate::models::user::User;

/// Row shape of `latchkey.account`.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: UserId,
    username: String,
    created_at: DateTime<Utc>,
}

/// Row shape of `latchkey.account` including the password hash.
#[derive(sqlx::FromRow)]
struct AccountPasswordRow {
    id: UserId,
    username: String,
    created_at: DateTime<Utc>,
    password_hash: String,
}

impl TryFrom<AccountRow> for User {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            username,
            created_at: row.created_at,
        })
    }
}

/// User repository backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row: AccountRow = sqlx::query_as(
            r"
            INSERT INTO latchkey.account (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, created_at
            ",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        User::try_from(row)
    }

    async fn get_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r"
            SELECT id, username, created_at
            FROM latchkey.account
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<AccountPasswordRow> = sqlx::query_as(
            r"
            SELECT id, username, created_at, password_hash
            FROM latchkey.account
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let user = User::try_from(AccountRow {
            id: r.id,
            username: r.username,
            created_at: r.created_at,
        })?;

        Ok(Some((user, r.password_hash)))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
