//! Streaming extraction of compressed tar archives.
//!
//! Entries are processed strictly in archive order: the tar format has no
//! index, so nothing is resorted or looked ahead at. Directory entries are
//! created (with any missing ancestors), file entries are copied through a
//! fixed-size buffer so peak memory stays bounded regardless of entry size.
//!
//! ```no_run
//! use presave_archive::Extractor;
//!
//! let summary = Extractor::new("/tmp/corpus").extract_file("/tmp/corpus/aclImdb_v1.tar.gz").unwrap();
//! println!("{} files, {} directories", summary.files, summary.directories);
//! ```

mod entry;
pub mod error;
mod extract;

pub use crate::extract::{BUFFER_SIZE, ExtractSummary, Extractor, PROGRESS_INTERVAL};

use crate::error::Result;
use std::path::Path;

/// Extract `archive` into `output` with default options.
///
/// Shorthand for [`Extractor::new(output).extract_file(archive)`](Extractor::extract_file).
pub fn extract_archive(archive: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ExtractSummary> {
    Extractor::new(output.as_ref()).extract_file(archive)
}
