//! Remote Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Transport failures are kept as child
//! frames underneath [`ErrorKind::FetchFailed`], so the underlying `reqwest`
//! error is still visible when the tree is printed.

use derive_more::{Display, Error};

/// A remote error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The layout address could not be parsed, or doesn't carry enough path
    /// segments to identify a geometry, layout and revision. Fix the input.
    #[display("invalid layout address: {_0}")]
    InvalidAddress(#[error(not(source))] String),
    /// The request to the given endpoint failed at the transport level (or
    /// the server answered with an error status).
    #[display("request to {_0} failed")]
    FetchFailed(#[error(not(source))] String),
    /// The response body did not contain what we needed from it.
    #[display("malformed response: {_0}")]
    MalformedResponse(#[error(not(source))] &'static str),
    /// A configured endpoint is not a valid URL.
    #[display("invalid endpoint: {_0}")]
    InvalidEndpoint(#[error(not(source))] String),
    /// The HTTP client could not be constructed.
    #[display("could not build HTTP client")]
    Client,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed(_))
    }
}
