//! Transport seam and the fetch operations built on top of it.

use crate::error::Result;
use crate::query::{LayoutQuery, Revision, parse_revision};
use crate::LayoutAddress;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Shared handle to a transport implementation.
pub type TransportHandle = Arc<dyn Transport>;

/// The two remote calls this program is allowed to make.
///
/// Implementations return response bodies untouched. All interpretation of
/// the bodies happens in [`Client`], so it can be exercised with canned
/// responses.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable name of the transport (used for logging only).
    fn name(&self) -> &str;

    /// Send the `getLayout` query document and return the full response body.
    async fn query(&self, query: &LayoutQuery) -> Result<Vec<u8>>;

    /// Fetch the metadata document and return the full response body.
    async fn metadata(&self) -> Result<Vec<u8>>;
}

/// Fetches revision data and metadata through a [`Transport`].
#[derive(Clone)]
pub struct Client {
    transport: TransportHandle,
}

impl Client {
    pub fn new(transport: TransportHandle) -> Self {
        Self { transport }
    }

    /// Query the layout/revision/tour details for the decoded address.
    ///
    /// Returns the canonical revision identifier reported by the service,
    /// alongside the raw `Data` payload to be stored verbatim.
    #[instrument(skip(self, address), fields(transport = self.transport.name(), address = %address))]
    pub async fn fetch_revision(&self, address: &LayoutAddress) -> Result<Revision> {
        let query = LayoutQuery::from(address);
        let body = self.transport.query(&query).await?;
        let revision = parse_revision(&body)?;
        if revision.id != address.revision {
            tracing::debug!(requested = %address.revision, canonical = %revision.id, "service resolved a different revision");
        }
        tracing::info!(revision = %revision.id, bytes = revision.data.len(), "fetched revision data");
        Ok(revision)
    }

    /// Fetch the metadata document. The body is opaque to us.
    #[instrument(skip(self), fields(transport = self.transport.name()))]
    pub async fn fetch_metadata(&self) -> Result<Vec<u8>> {
        let body = self.transport.metadata().await?;
        tracing::info!(bytes = body.len(), "fetched metadata");
        Ok(body)
    }
}
