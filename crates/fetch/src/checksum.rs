use crate::error::{Error, ErrorKind, Result};
use md5::{Digest, Md5};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

/// An MD5 digest.
///
/// MD5 is only used here because it's what upstream mirrors publish for the
/// resources we download; it detects corruption, not tampering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 16]);

impl Checksum {
    #[must_use]
    pub fn of_bytes(data: &[u8]) -> Self {
        Self::from_digest(Md5::digest(data).as_slice())
    }

    /// Hash a file, streaming it rather than loading it into memory.
    #[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn of_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| ErrorKind::from_io(e, path))?;
        let mut hasher = Md5::new();
        io::copy(&mut file, &mut hasher).map_err(|e| ErrorKind::from_io(e, path))?;
        Ok(Self::from_digest(hasher.finalize().as_slice()))
    }

    /// Hash `path` and compare against `self`.
    pub fn matches_file(&self, path: impl AsRef<Path>) -> Result<bool> {
        Ok(Self::of_file(path)? == *self)
    }

    fn from_digest(digest: &[u8]) -> Self {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(digest);
        Self(bytes)
    }
}

impl FromStr for Checksum {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut bytes = [0u8; 16];
        match hex::decode_to_slice(s.trim(), &mut bytes) {
            Ok(()) => Ok(Self(bytes)),
            Err(_) => exn::bail!(ErrorKind::InvalidChecksum(s.to_string())),
        }
    }
}

impl Display for Checksum {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&hex::encode(self.0))
    }
}
