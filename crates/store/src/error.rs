//! Store Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. The underlying `sqlx` error is kept
//! as a child frame.

use derive_more::{Display, Error};

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The database file could not be opened or created.
    #[display("could not open database")]
    Open,
    /// Creating the schema failed. Usually means the file isn't an SQLite
    /// database, or a table exists with an incompatible definition.
    #[display("could not apply database schema")]
    Schema,
    /// A query or statement failed.
    #[display("database error")]
    Database,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Open.to_string(), "could not open database");
        assert_eq!(ErrorKind::Schema.to_string(), "could not apply database schema");
        assert_eq!(ErrorKind::Database.to_string(), "database error");
    }
}
