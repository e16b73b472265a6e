//! Repository for the rows this program owns: config defaults, the metadata
//! document and revision data.
//!
//! The `heatmap`, `smart_layer` and `auth` tables belong to the desktop
//! application and are never written here.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{ConfigEntry, DEFAULT_CONFIG, RevisionWrite};
use exn::ResultExt;
use sqlx::SqlitePool;
use tracing::instrument;

/// Repository over the local store.
///
/// # Idempotence
///
/// Every write here is safe to repeat. Config defaults are only inserted for
/// keys that don't exist yet, metadata is only inserted into an empty table
/// (the caller decides, see [`metadata_count`](Self::metadata_count)), and
/// revisions are keyed on their identifier.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    // =========================================================================
    // Config
    // =========================================================================

    /// Insert every entry of [`DEFAULT_CONFIG`] whose key is not present yet.
    ///
    /// Keys that already exist are left alone, whatever their value: the
    /// desktop application (or the user, through it) may have changed them.
    /// Uniqueness of `key` isn't a constraint in the schema, so it's checked
    /// here before each insert.
    ///
    /// Returns the number of keys inserted.
    #[instrument(skip(self))]
    pub async fn seed_defaults(&self) -> Result<usize> {
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        let mut inserted = 0;
        for (key, value) in DEFAULT_CONFIG {
            let existing: i64 = sqlx::query_scalar(include_str!("../queries/count_config_key.sql"))
                .bind(key)
                .fetch_one(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
            if existing != 0 {
                continue;
            }
            sqlx::query(include_str!("../queries/insert_config.sql"))
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
            tracing::debug!(key, value, "seeded default config");
            inserted += 1;
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        Ok(inserted)
    }

    /// Get the value of a config key.
    ///
    /// Returns `None` if the key doesn't exist (or exists with a `NULL`
    /// value). If a key somehow appears more than once, the oldest row wins.
    pub async fn config_value(&self, key: impl AsRef<str>) -> Result<Option<String>> {
        let value: Option<Option<String>> = sqlx::query_scalar(include_str!("../queries/get_config_value.sql"))
            .bind(key.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(value.flatten())
    }

    /// All config rows, in insertion order.
    pub async fn config_entries(&self) -> Result<Vec<ConfigEntry>> {
        sqlx::query_as(include_str!("../queries/list_config.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Number of rows in the `metadata` table (zero or one, if only this
    /// program has written to it).
    pub async fn metadata_count(&self) -> Result<i64> {
        sqlx::query_scalar(include_str!("../queries/count_metadata.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// Store the metadata document.
    ///
    /// This is a plain insert; check [`metadata_count`](Self::metadata_count)
    /// first. The metadata document is never replaced once stored.
    #[instrument(skip_all, fields(bytes = data.len()))]
    pub async fn insert_metadata(&self, data: &[u8]) -> Result<()> {
        sqlx::query(include_str!("../queries/insert_metadata.sql"))
            .bind(data)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// The stored metadata document, if any.
    pub async fn metadata(&self) -> Result<Option<Vec<u8>>> {
        let data: Option<Option<Vec<u8>>> = sqlx::query_scalar(include_str!("../queries/get_metadata.sql"))
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(data.flatten())
    }

    // =========================================================================
    // Revisions
    // =========================================================================

    /// Insert revision data, replacing the data of an existing row with the
    /// same revision identifier.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn upsert_revision(&self, revision_id: &str, data: &[u8]) -> Result<RevisionWrite> {
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        let existing: Option<Option<Vec<u8>>> = sqlx::query_scalar(include_str!("../queries/get_revision.sql"))
            .bind(revision_id)
            .fetch_optional(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        sqlx::query(include_str!("../queries/upsert_revision.sql"))
            .bind(revision_id)
            .bind(data)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        Ok(match existing {
            Some(_) => RevisionWrite::Replaced,
            None => RevisionWrite::Inserted,
        })
    }

    /// Data stored for a revision identifier.
    pub async fn revision(&self, revision_id: &str) -> Result<Option<Vec<u8>>> {
        let data: Option<Option<Vec<u8>>> = sqlx::query_scalar(include_str!("../queries/get_revision.sql"))
            .bind(revision_id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(data.flatten())
    }

    /// Number of rows in the `revision` table.
    pub async fn revision_count(&self) -> Result<i64> {
        sqlx::query_scalar(include_str!("../queries/count_revisions.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }
}
