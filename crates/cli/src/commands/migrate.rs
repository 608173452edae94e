//! Database migration command.
//!
//! Applies `crates/web/migrations/` (the `latchkey` schema) and then the
//! tower-sessions store migration (the `tower_sessions` schema).
//!
//! # Environment Variables
//!
//! - `LATCHKEY_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`, then `DB_URL`)

use latchkey_web::config::{ConfigError, database_url_from_env};
use latchkey_web::db;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url_from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running account migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
