//! Sequencing of a synchronization run.
//!
//! decode address → fetch revision → open store → seed defaults → fetch
//! metadata (only if none stored) → upsert revision.
//!
//! The revision is fetched before the store is touched, so a bad address or
//! an unreachable service never creates (or modifies) the database file.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use fkm_remote::{Client, LayoutAddress, Revision};
use fkm_store::{Database, Repository, RevisionWrite};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Where the store lives, and whether its directory may be created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreLocation {
    pub path: PathBuf,
    pub mkdir: bool,
}

/// What a run did to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// Canonical revision identifier the data was stored under.
    pub revision_id: String,
    /// Whether the revision row was new or overwritten.
    pub revision_write: RevisionWrite,
    /// Number of default config keys that were missing and got inserted.
    pub seeded_keys: usize,
    /// Whether the metadata document was fetched and stored this run.
    pub metadata_inserted: bool,
}

/// Writes fetched data into an already opened store.
pub struct Synchronizer<'a> {
    client: &'a Client,
    repository: Repository,
}

impl<'a> Synchronizer<'a> {
    pub fn new(client: &'a Client, repository: Repository) -> Self {
        Self { client, repository }
    }

    /// Seed config defaults, fill in metadata if there is none, then store
    /// the revision.
    ///
    /// Every step is idempotent, so a run that fails halfway can simply be
    /// repeated.
    #[instrument(skip_all, fields(revision = %revision.id))]
    pub async fn apply(&self, revision: Revision) -> Result<Report> {
        let seeded_keys = self.repository.seed_defaults().await.or_raise(|| ErrorKind::Store)?;
        let metadata_inserted = self.ensure_metadata().await?;
        let revision_write = self
            .repository
            .upsert_revision(&revision.id, &revision.data)
            .await
            .or_raise(|| ErrorKind::Store)?;
        Ok(Report {
            revision_id: revision.id,
            revision_write,
            seeded_keys,
            metadata_inserted,
        })
    }

    /// The metadata document is immutable once stored: if there's a row
    /// already, the remote isn't even asked.
    async fn ensure_metadata(&self) -> Result<bool> {
        let stored = self.repository.metadata_count().await.or_raise(|| ErrorKind::Store)?;
        if stored != 0 {
            tracing::debug!(rows = stored, "metadata already present; not fetching");
            return Ok(false);
        }
        let metadata = self.client.fetch_metadata().await.map_err(ErrorKind::remote)?;
        self.repository.insert_metadata(&metadata).await.or_raise(|| ErrorKind::Store)?;
        Ok(true)
    }
}

/// Run a full synchronization of one layout address into the store.
#[instrument(skip(client, address), fields(address = %address))]
pub async fn synchronize(client: &Client, store: &StoreLocation, address: &LayoutAddress) -> Result<Report> {
    let revision = client.fetch_revision(address).await.map_err(ErrorKind::remote)?;
    if store.mkdir {
        create_parent_dirs(&store.path).await?;
    }
    let db = Database::connect(&store.path).await.or_raise(|| ErrorKind::Store)?;
    let result = Synchronizer::new(client, Repository::from(&db)).apply(revision).await;
    // Released on both the success and the error path.
    db.close().await;
    let report = result?;
    tracing::info!(
        revision = %report.revision_id,
        write = ?report.revision_write,
        seeded_keys = report.seeded_keys,
        metadata_inserted = report.metadata_inserted,
        "synchronized layout"
    );
    Ok(report)
}

async fn create_parent_dirs(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) else {
        return Ok(());
    };
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o750);
    builder.create(parent).await.or_raise(|| ErrorKind::Io)
}
