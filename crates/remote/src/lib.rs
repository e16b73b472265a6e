//! Remote side of the synchronization.
//!
//! Decodes a configurator page address into the identifiers the query
//! endpoint needs, and performs the only two network calls the program makes:
//!
//! - **Revision**: a `getLayout` GraphQL query for one (geometry, layout,
//!   revision) triple, see [`Client::fetch_revision`].
//! - **Metadata**: an unparameterized GET of the metadata document, see
//!   [`Client::fetch_metadata`].
//!
//! Network access goes through the [`Transport`] trait. [`HttpTransport`] is
//! the real thing; `MockTransport` (behind the `mock` feature) is for tests.

mod address;
mod client;
pub mod error;
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod query;

pub use crate::address::LayoutAddress;
pub use crate::client::{Client, Transport, TransportHandle};
pub use crate::http::{
    DEFAULT_METADATA_ENDPOINT, DEFAULT_QUERY_ENDPOINT, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpOptions,
    HttpTransport,
};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockTransport;
pub use crate::query::{LayoutQuery, Revision};
