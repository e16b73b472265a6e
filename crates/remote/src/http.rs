//! `reqwest`-backed transport.

use crate::client::Transport;
use crate::error::{ErrorKind, Result};
use crate::query::LayoutQuery;
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::{Response, Url};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_QUERY_ENDPOINT: &str = "https://oryx.zsa.io/graphql";
pub const DEFAULT_METADATA_ENDPOINT: &str = "https://configure.zsa.io/metadata.json";
pub const DEFAULT_USER_AGENT: &str = concat!("fkm/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`HttpTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpOptions {
    pub query_endpoint: String,
    pub metadata_endpoint: String,
    pub user_agent: String,
    /// Deadline for each request, covering connect through to the last byte
    /// of the body.
    pub timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            query_endpoint: DEFAULT_QUERY_ENDPOINT.to_string(),
            metadata_endpoint: DEFAULT_METADATA_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Talks to the real service over HTTPS.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    query_endpoint: Url,
    metadata_endpoint: Url,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("query_endpoint", &self.query_endpoint.as_str())
            .field("metadata_endpoint", &self.metadata_endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(options: HttpOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&options.user_agent)
            .timeout(options.timeout)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self {
            client,
            query_endpoint: Self::endpoint(&options.query_endpoint)?,
            metadata_endpoint: Self::endpoint(&options.metadata_endpoint)?,
        })
    }

    fn endpoint(value: &str) -> Result<Url> {
        Url::parse(value).or_raise(|| ErrorKind::InvalidEndpoint(value.to_string()))
    }

    /// Read the whole body of a successful response.
    ///
    /// An error status is reported as a failed fetch rather than handed back
    /// as a body: an error page must never end up stored as metadata.
    async fn read_body(endpoint: &Url, response: reqwest::Result<Response>) -> Result<Vec<u8>> {
        let failed = || ErrorKind::FetchFailed(endpoint.to_string());
        let response = response.and_then(Response::error_for_status).or_raise(failed)?;
        tracing::debug!(status = %response.status(), %endpoint, "received response");
        let body = response.bytes().await.or_raise(failed)?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn query(&self, query: &LayoutQuery) -> Result<Vec<u8>> {
        let endpoint = &self.query_endpoint;
        let response = self.client.post(endpoint.clone()).json(query).send().await;
        Self::read_body(endpoint, response).await
    }

    async fn metadata(&self) -> Result<Vec<u8>> {
        let endpoint = &self.metadata_endpoint;
        let response = self.client.get(endpoint.clone()).send().await;
        Self::read_body(endpoint, response).await
    }
}
