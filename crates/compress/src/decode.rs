//! Decompression Operations

use crate::Compression;
use crate::detect::MAGIC_LEN;
use crate::error::{ErrorKind, Result};
use bzip2::read::MultiBzDecoder;
use exn::ResultExt;
use flate2::read::MultiGzDecoder;
use std::io::{BufRead, Read};

impl Compression {
    /// Wrap a reader with the appropriate decompression layer.
    ///
    /// Multi-member gzip and bzip2 streams (concatenated archives) are decoded
    /// in full. Corrupt input surfaces as an I/O error from the returned
    /// reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::{Cursor, Read};
    /// use presave_compress::Compression;
    ///
    /// let mut reader = Compression::None.wrap_reader(Cursor::new(b"plain"));
    /// let mut out = Vec::new();
    /// reader.read_to_end(&mut out).unwrap();
    /// assert_eq!(out, b"plain");
    /// ```
    pub fn wrap_reader<'a, R: Read + 'a>(&self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Compression::None => Box::new(reader),
            Compression::Bzip2 => Box::new(MultiBzDecoder::new(reader)),
            Compression::Gzip => Box::new(MultiGzDecoder::new(reader)),
        }
    }

    /// Detect the format of a buffered stream from its leading magic bytes
    /// without consuming them.
    pub fn sniff<R: BufRead>(reader: &mut R) -> Result<Self> {
        let head = reader.fill_buf().or_raise(|| ErrorKind::InvalidData)?;
        Ok(Self::from_magic_bytes(&head[..head.len().min(MAGIC_LEN)]))
    }
}
