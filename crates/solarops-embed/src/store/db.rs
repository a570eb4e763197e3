//! `SQLite` job database.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Cannot create database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open job database: {0}")]
    Connection(String),

    #[error("Job database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Job query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Jobs referenced by embed tokens.
#[derive(Clone)]
pub struct JobDatabase {
    pool: Pool<Sqlite>,
}

impl JobDatabase {
    /// Open (or create) the job database file, creating its directory.
    pub async fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        // Lookups are single-row reads; a handful of connections covers
        // concurrent session resolution.
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::Connection(format!("{}: {e}", path.display())))?;

        info!(path = %path.display(), "Job database opened");
        Self::migrated(pool).await
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        // Every in-memory connection is its own database, so keep exactly one
        // and never let it idle out.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        Self::migrated(pool).await
    }

    async fn migrated(pool: Pool<Sqlite>) -> Result<Self, DatabaseError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub(super) const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
