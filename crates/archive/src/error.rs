//! Archive Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::{Path, PathBuf};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Archive or an entry's parent directory does not exist.
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Access denied while reading the archive or writing the output tree.
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// The compressed stream could not be decoded.
    #[display("failed to decompress archive")]
    Decompression,
    /// The tar stream itself is malformed.
    #[display("invalid or corrupted archive")]
    InvalidArchive,
    /// An entry name would land outside the output directory.
    #[display("invalid entry path: {}", _0.display())]
    InvalidEntry(#[error(not(source))] PathBuf),
    /// The archive ended before an entry's declared length was copied.
    #[display("archive truncated while extracting: {}", _0.display())]
    Truncated(#[error(not(source))] PathBuf),
    /// Underlying I/O error (disk full, etc.)
    #[display("I/O error: {_0}")]
    Io(IoError),
}

impl ErrorKind {
    pub(crate) fn from_io(err: IoError, path: &Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }

    /// Returns `true` if retrying might succeed.
    ///
    /// Only plain I/O failures qualify; a corrupt or hostile archive stays
    /// that way.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
