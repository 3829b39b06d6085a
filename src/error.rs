//! Error kinds surfaced by the library service and its persistence layer.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Every way a library operation can fail.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// A member with this id is already registered
    #[error("[{0}] is already in use as a member id")]
    DuplicateIdentifier(String),

    /// Unknown id or wrong password; the two are deliberately indistinguishable
    #[error("invalid id or password")]
    InvalidCredentials,

    /// No book carries this number
    #[error("[{0}] no such book")]
    NotFound(u32),

    /// The book is already out on loan
    #[error("[{0}] is already borrowed")]
    AlreadyBorrowed(u32),

    /// The book is not out on loan
    #[error("[{0}] is not borrowed")]
    NotBorrowed(u32),

    /// The book is borrowed by someone else
    #[error("[{no}] was borrowed by another member and cannot be returned by {member_id}")]
    BorrowerMismatch {
        /// Book number
        no: u32,
        /// Member that attempted the return
        member_id: String,
    },

    /// A backing file could not be opened, read or written
    #[error("persistence error on {}: {source}", path.display())]
    Persistence {
        /// File involved
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A persisted line could not be decoded
    #[error("malformed record in {} line {line}: {reason}", path.display())]
    MalformedRecord {
        /// File involved
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl LibraryError {
    /// Create a persistence error for `path`.
    pub fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence { path: path.into(), source }
    }

    /// Create a malformed-record error for `path` at `line`.
    pub fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord { path: path.into(), line, reason: reason.into() }
    }

    /// Whether this is a business-rule violation rather than an I/O, format or config failure
    #[must_use]
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Persistence { .. } | Self::MalformedRecord { .. } | Self::Config(_))
    }
}
