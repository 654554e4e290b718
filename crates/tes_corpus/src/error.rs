//! Error types that can be emitted from this library

use miette::Diagnostic;
use std::time::Duration;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`tes_strings::error::Error`]
    #[error(transparent)]
    Strings(#[from] tes_strings::error::Error),

    /// Transparent warpper for [`rusqlite::Error`]
    #[error(transparent)]
    Store(rusqlite::Error),

    /// Transparent warpper for [`serde_json::Error`]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// the store stayed locked for longer than the busy timeout
    #[error("the translation store stayed locked for longer than {timeout:?}")]
    StoreBusy {
        /// Configured busy timeout
        timeout: Duration,
    },

    /// invalid search parameters
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Invalid parameters passed to a search
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// offset must not be negative
    #[error("offset must not be negative, got {0}")]
    NegativeOffset(i64),

    /// limit must not be negative
    #[error("limit must not be negative, got {0}")]
    NegativeLimit(i64),

    /// threshold must be within 0..=100
    #[error("threshold must be within 0..=100, got {0}")]
    ThresholdOutOfRange(i64),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Error::Store(value)
    }
}

impl Error {
    /// Whether the store reported lock contention
    pub(crate) fn is_busy(error: &rusqlite::Error) -> bool {
        matches!(
            error.sqlite_error_code(),
            Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
        )
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
