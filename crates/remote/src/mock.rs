//! Canned-response transport for testing.

use crate::client::Transport;
use crate::error::{ErrorKind, Result};
use crate::query::LayoutQuery;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory transport for testing.
///
/// Each endpoint answers with a fixed body, or fails with
/// [`ErrorKind::FetchFailed`] if no body was configured. Calls are counted
/// so tests can assert that a request was (or wasn't) made.
#[derive(Debug, Default)]
pub struct MockTransport {
    revision: Option<Vec<u8>>,
    metadata: Option<Vec<u8>>,
    query_calls: AtomicUsize,
    metadata_calls: AtomicUsize,
    last_query: Mutex<Option<LayoutQuery>>,
}

impl MockTransport {
    /// Answer `getLayout` queries with the given body.
    pub fn with_revision(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.revision = Some(body.into());
        self
    }

    /// Answer metadata requests with the given body.
    pub fn with_metadata(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.metadata = Some(body.into());
        self
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    /// The most recent query document received.
    pub fn last_query(&self) -> Option<LayoutQuery> {
        self.last_query.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn query(&self, query: &LayoutQuery) -> Result<Vec<u8>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_query.lock() {
            *guard = Some(query.clone());
        }
        match &self.revision {
            Some(body) => Ok(body.clone()),
            None => exn::bail!(ErrorKind::FetchFailed("mock://query".to_string())),
        }
    }

    async fn metadata(&self) -> Result<Vec<u8>> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        match &self.metadata {
            Some(body) => Ok(body.clone()),
            None => exn::bail!(ErrorKind::FetchFailed("mock://metadata".to_string())),
        }
    }
}
