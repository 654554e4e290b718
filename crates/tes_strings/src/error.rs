//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// file is too short to hold a string table header
    #[error("file is too short to hold a string table header")]
    TruncatedHeader,

    /// directory declares {count} entries but only {available} bytes follow the header
    #[error("directory declares {count} entries but only {available} bytes follow the header")]
    TruncatedDirectory {
        /// Declared number of entries
        count: u32,
        /// Bytes present after the header
        available: u64,
    },

    /// string {id} points past the end of the file
    #[error("string {id} points to offset {offset} past the end of the file ({length} bytes)")]
    OffsetOutOfBounds {
        /// Identifier of the directory entry
        id: u32,
        /// Offset relative to the string data region
        offset: u32,
        /// Total length of the file
        length: u64,
    },

    /// unsupported file extension {0}
    #[error("unsupported file extension {0:?}")]
    UnsupportedExtension(String),

    /// string {id} is neither UTF-8 nor Windows-1252
    #[error("string {id} is neither UTF-8 nor Windows-1252")]
    Encoding {
        /// Identifier of the directory entry
        id: u32,
    },
}

impl Error {
    /// Whether this error describes a malformed header, directory or offset
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::BinRWError(_)
                | Error::TruncatedHeader
                | Error::TruncatedDirectory { .. }
                | Error::OffsetOutOfBounds { .. }
                | Error::UnsupportedExtension(_)
        )
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
