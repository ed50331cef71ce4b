use crate::error::{ErrorKind, Result};
use crate::tensor::Tensor;
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::instrument;

/// A group of embedded, labelled, variable-length sequences.
///
/// For `n` examples of at most `len` time steps and `d`-dimensional vectors:
///
/// | tensor | shape |
/// |---|---|
/// | `features` | `[n, d, len]` |
/// | `labels` | `[n, 2, len]` |
/// | `features_mask` | `[n, len]` |
/// | `labels_mask` | `[n, len]` |
///
/// Masks hold `1.0` at the time steps that carry data and `0.0` at padding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub features: Tensor,
    pub labels: Tensor,
    pub features_mask: Tensor,
    pub labels_mask: Tensor,
}

impl Batch {
    /// Number of examples.
    pub fn len(&self) -> usize {
        self.features.shape().first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the batch to `path`, replacing any existing file.
    #[instrument(level = "debug", skip(self, path), fields(path = %path.as_ref().display(), examples = self.len()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ErrorKind::from_io(e, path))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self).or_raise(|| ErrorKind::Serialize(path.to_path_buf()))?;
        writer.flush().map_err(|e| ErrorKind::from_io(e, path))?;
        Ok(())
    }

    /// Read a batch previously written with [`save`](Self::save).
    #[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ErrorKind::from_io(e, path))?;
        bincode::deserialize_from(BufReader::new(file)).or_raise(|| ErrorKind::Deserialize(path.to_path_buf()))
    }
}
