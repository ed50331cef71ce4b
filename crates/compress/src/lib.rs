//! Compression format detection and streaming decompression.
//!
//! Everything `presave` reads from disk may arrive compressed: the corpus is a
//! `.tar.gz`, the word2vec model is a `.bin.gz`. This crate wraps the decoders
//! behind a single [`Compression`] enum, providing:
//!
//! - **Format detection** from file extensions ([`Compression::from_path`]) or
//!   magic bytes ([`Compression::from_magic_bytes`])
//! - **Streaming** decompression via wrapped readers ([`Compression::wrap_reader`])

mod decode;
mod detect;
pub mod error;

pub use crate::detect::split_extension;

/// A supported compression format. Defaults to [`None`](Self::None).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// Gzip compression (.gz, .tgz)
    Gzip,
}
