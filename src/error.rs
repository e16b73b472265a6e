//! Top-level Error Types
//!
//! Every error is terminal: the run aborts and the whole error tree is
//! printed. Errors from the member crates are kept as child frames.

use derive_more::{Display, Error};
use fkm_remote::error::{Error as RemoteError, ErrorKind as RemoteErrorKind};

/// A synchronization error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for synchronization.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration could not be loaded, or the store path resolved.
    #[display("configuration error")]
    Config,
    /// The layout address is malformed or under-specified. Fix it and re-run.
    #[display("invalid layout address")]
    InvalidAddress,
    /// A remote call failed at the transport level.
    #[display("failed to fetch from remote service")]
    FetchFailed,
    /// The remote service answered, but not with what we needed.
    #[display("malformed response from remote service")]
    MalformedResponse,
    /// Opening the store or executing a statement failed.
    #[display("local store error")]
    Store,
    /// Creating the store's parent directories failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Convert a remote error into a top-level error, preserving the remote
    /// crate's `Exn` frame as a child in the error tree.
    #[track_caller]
    pub fn remote(err: RemoteError) -> Error {
        let kind = match &*err {
            RemoteErrorKind::InvalidAddress(_) => Self::InvalidAddress,
            RemoteErrorKind::MalformedResponse(_) => Self::MalformedResponse,
            RemoteErrorKind::FetchFailed(_) => Self::FetchFailed,
            RemoteErrorKind::InvalidEndpoint(_) | RemoteErrorKind::Client => Self::Config,
        };
        err.raise(kind)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed)
    }
}
