//! Dataset Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::{Path, PathBuf};

/// A dataset error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A corpus directory or batch file does not exist.
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Access denied while reading reviews or writing batches.
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// A batch could not be encoded.
    #[display("failed to serialize batch to {}", _0.display())]
    Serialize(#[error(not(source))] PathBuf),
    /// A batch file is not a valid encoded batch.
    #[display("failed to deserialize batch from {}", _0.display())]
    Deserialize(#[error(not(source))] PathBuf),
    /// Writing batch number `index` failed.
    #[display("failed to save batch {index} to {}", path.display())]
    Save { index: usize, path: PathBuf },
    /// The batch iterator failed to produce the next batch.
    #[display("failed to produce batch {_0}")]
    Produce(#[error(not(source))] usize),
    /// Batch size and sequence length must be at least one.
    #[display("invalid parameter: {_0}")]
    InvalidParameter(#[error(not(source))] &'static str),
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
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
