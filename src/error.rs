//! Pipeline Error Types
//!
//! Each variant names the pipeline step that failed; the error tree beneath
//! it carries the detail from the library crates.

use derive_more::{Display, Error};
use presave_dataset::Split;
use std::io::Error as IoError;
use std::path::{Path, PathBuf};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline steps.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("failed to acquire the word2vec model")]
    Model,
    #[display("failed to acquire the review corpus")]
    Corpus,
    #[display("failed to download {_0}")]
    Download(#[error(not(source))] String),
    #[display("failed to extract {}", _0.display())]
    Extract(#[error(not(source))] PathBuf),
    #[display("failed to load word vectors from {}", _0.display())]
    Vectors(#[error(not(source))] PathBuf),
    #[display("failed to save the {_0} dataset")]
    Dataset(#[error(not(source))] Split),
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
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
}
