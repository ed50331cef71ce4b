//! Embedding Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::{Path, PathBuf};

/// A model loading error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for model loading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Model file does not exist.
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Access denied while reading the model.
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// The compressed model could not be decoded.
    #[display("failed to decompress model")]
    Decompression,
    /// The `<count> <dimensions>` header is missing or unreadable.
    #[display("invalid model header: {_0}")]
    InvalidHeader(#[error(not(source))] String),
    /// A line of a text model could not be parsed.
    #[display("malformed vector on line {line}")]
    Malformed { line: usize },
    /// A vector does not have as many components as the model declares.
    #[display("vector for {word:?} has {actual} components, expected {expected}")]
    DimensionMismatch { word: String, expected: usize, actual: usize },
    /// The model ended before every declared vector was read.
    #[display("model truncated after {read} of {declared} vectors")]
    Truncated { read: usize, declared: usize },
    /// Underlying I/O error
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
    /// A model that fails to parse is corrupt and needs downloading again,
    /// which is not something reading it a second time will fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
