//! Database connection and schema management.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use tracing::instrument;

/// Table definitions expected by the desktop application.
///
/// Every statement is `CREATE TABLE IF NOT EXISTS`, so applying the schema to
/// a database that already has some or all of these tables is a no-op for
/// those tables and never touches their rows.
const SCHEMA: &str = include_str!("../queries/schema.sql");
// Everything runs sequentially; a second connection would only ever sit idle.
const MAX_CONNECTIONS: u32 = 1;

/// Handle to the local store.
///
/// The file is shared with the desktop application, so connecting must not
/// leave anything behind that the application doesn't expect: no migration
/// bookkeeping tables, no change of journal mode.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn new(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Open)?;
        let db = Self { pool };
        if let Err(err) = db.apply_schema().await {
            db.close().await;
            return Err(err);
        }
        Ok(db)
    }

    /// Open the store at the given path and apply the schema.
    ///
    /// Creates the database file if it doesn't exist. Parent directories must
    /// already exist.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let options = Self::base_options().filename(path.as_ref()).create_if_missing(true);
        Self::new(options).await
    }

    /// Connect to an in-memory database (useful for testing).
    ///
    /// Note:
    /// - In-memory databases are destroyed when the connection closes.
    /// - Do NOT apply `#[cfg(test)]` so that other crates can also use this in their tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = Self::base_options().filename(":memory:");
        Self::new(options).await
    }

    /// Base connection options shared between file and in-memory databases.
    fn base_options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            // The desktop application may still have the file open if the
            // user forgot to quit it. Give its writes a moment to finish.
            .busy_timeout(Duration::from_millis(1500))
    }

    /// Create any missing tables.
    ///
    /// This is called automatically by `connect` and `connect_in_memory`,
    /// but is safe to call any number of times.
    #[instrument("applying database schema", skip(self))]
    async fn apply_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await.or_raise(|| ErrorKind::Schema)?;
        Ok(())
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection.
    ///
    /// Waits for the connection to be returned to the pool and then closes
    /// it. After calling this, the Database instance should not be used.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
