use crate::Compression;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

const BZIP2_MAGIC: [u8; 3] = [0x42, 0x5A, 0x68];
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Longest magic byte sequence of any supported format.
pub(crate) const MAGIC_LEN: usize = 3;

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl Compression {
    /// Short name, for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Bzip2 => "bzip2",
            Compression::Gzip => "gzip",
        }
    }

    /// Detect compression from a file extension.
    ///
    /// Unknown or missing extensions are treated as uncompressed.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext.to_lowercase().as_str() {
                "bz2" | "tbz2" => Compression::Bzip2,
                "gz" | "tgz" => Compression::Gzip,
                _ => Compression::None,
            })
            .unwrap_or(Compression::None)
    }

    /// Detect compression format from magic bytes.
    ///
    /// Returns `None` variant if no magic bytes match or if the input is too
    /// short to detect any format.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&BZIP2_MAGIC) {
            return Compression::Bzip2;
        }
        if bytes.starts_with(&GZIP_MAGIC) {
            return Compression::Gzip;
        }
        Compression::None
    }
}

/// Split a compression extension off a path.
///
/// Returns the path with the compression suffix removed, along with the
/// detected format. `model.bin.gz` becomes `(model.bin, Gzip)`, while an
/// uncompressed `model.bin` is returned unchanged. Combined extensions like
/// `.tgz` become `.tar`.
pub fn split_extension(path: impl AsRef<Path>) -> (PathBuf, Compression) {
    let path = path.as_ref();
    let compression = Compression::from_path(path);
    if compression == Compression::None {
        return (path.to_path_buf(), compression);
    }
    let combined = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "tgz" | "tbz2"));
    let stripped = match combined {
        true => path.with_extension("tar"),
        false => path.with_extension(""),
    };
    (stripped, compression)
}
