//! Fetch Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::{Path, PathBuf};

/// A download error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for download operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The HTTP client could not be constructed (TLS backend, etc.)
    #[display("failed to initialize HTTP client")]
    Client,
    /// Connection, DNS or transfer failure.
    #[display("request failed: {_0}")]
    Network(#[error(not(source))] String),
    /// The server answered, but not with success.
    #[display("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    /// Destination directory does not exist and could not be created.
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Access denied while writing or hashing a file.
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Downloaded (or cached) content does not hash to the expected value.
    #[display("checksum mismatch for {}: expected {expected}, found {actual}", path.display())]
    ChecksumMismatch { path: PathBuf, expected: String, actual: String },
    /// A configured checksum is not valid hex of the right length.
    #[display("invalid checksum: {_0}")]
    InvalidChecksum(#[error(not(source))] String),
    /// Every permitted download attempt failed.
    #[display("gave up on {url} after {attempts} attempts")]
    AttemptsExhausted { url: String, attempts: u32 },
    /// The user said no.
    #[display("download declined by user")]
    Declined,
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
        match self {
            Self::Network(_) | Self::Io(_) | Self::ChecksumMismatch { .. } => true,
            Self::Status { status, .. } => *status >= 500 || matches!(status, 408 | 429),
            _ => false,
        }
    }
}
