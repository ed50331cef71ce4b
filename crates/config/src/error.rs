//! Config Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The user's home directory could not be determined.
    #[display("could not determine home directory")]
    NoHomeDirectory,
    /// An explicitly requested configuration file does not exist.
    #[display("configuration file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// A configuration file has an extension we cannot parse.
    #[display("unsupported configuration format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// Merging the configuration layers failed (syntax, types).
    #[display("failed to load configuration")]
    Load,
    /// A value was loaded but is not acceptable.
    #[display("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Configuration problems need the user to change something.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
