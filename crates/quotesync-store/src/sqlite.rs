//! SQLite key-value backend.
//!
//! Connection pooling uses r2d2. Every operation checks a connection out of
//! the pool on a blocking thread via [`tokio::task::spawn_blocking`].

use std::path::Path;

use async_trait::async_trait;
use quotesync_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OptionalExtension;

use crate::kv::KvStore;
use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Key-value store persisted in a single SQLite `kv` table.
#[derive(Clone)]
pub struct SqliteKvStore {
    pool: DbPool,
}

impl SqliteKvStore {
    /// Open (creating if needed) the database at `path` and run migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref())
            .with_init(|conn| conn.execute_batch("PRAGMA busy_timeout = 5000;"));

        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .map_err(|e| Error::store(format!("Failed to create connection pool: {}", e)))?;

        Self::from_pool(pool)
    }

    /// Open a private in-memory database, for tests.
    ///
    /// Each SQLite in-memory connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub fn open_in_memory() -> Result<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(SqliteConnectionManager::memory())
            .map_err(|e| Error::store(format!("Failed to create in-memory pool: {}", e)))?;

        Self::from_pool(pool)
    }

    fn from_pool(pool: DbPool) -> Result<Self> {
        let conn = get_conn(&pool)?;
        migrations::run_migrations(&conn)
            .map_err(|e| Error::store(format!("Failed to run migrations: {}", e)))?;
        drop(conn);

        Ok(Self { pool })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&PooledConnection) -> rusqlite::Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = get_conn(&pool)?;
            op(&conn).map_err(|e| Error::store(e.to_string()))
        })
        .await
        .map_err(|e| Error::store(format!("SQLite task failed: {}", e)))?
    }
}

/// Get a connection from the pool, converting the r2d2 error.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::store(format!("Failed to get connection from pool: {}", e)))
}

#[async_trait]
impl KvStore for SqliteKvStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", [&key], |row| {
                row.get(0)
            })
            .optional()
        })
        .await
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = datetime('now')",
                rusqlite::params![key, value],
            )
            .map(|_| ())
        })
        .await
    }
}
