use crate::error::{ErrorKind, Result};
use crate::word2vec;
use exn::ResultExt;
use presave_compress::{Compression, split_extension};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::instrument;

/// Ceiling on words reserved up front.
const MAX_PREALLOCATED_WORDS: usize = 1 << 20;
/// Ceiling on vector components reserved up front.
const MAX_PREALLOCATED_VALUES: usize = 1 << 26;

/// Read-only lookup from a word to its embedding.
pub trait WordVectors {
    /// Number of components in every vector.
    fn dimensions(&self) -> usize;

    /// The vector for `word`, if it is in the vocabulary.
    fn vector(&self, word: &str) -> Option<&[f32]>;

    fn has_word(&self, word: &str) -> bool {
        self.vector(word).is_some()
    }
}

/// An embedding table held entirely in memory.
///
/// Vectors are stored row-major in a single allocation; the index maps each
/// word to its row.
#[derive(Debug, Clone, Default)]
pub struct StaticWordVectors {
    dimensions: usize,
    index: HashMap<String, usize>,
    data: Vec<f32>,
}

impl StaticWordVectors {
    /// `words` usually comes from an untrusted header, so it only ever
    /// hints at the allocation up to a fixed ceiling.
    pub(crate) fn with_capacity(dimensions: usize, words: usize) -> Self {
        let words = words.min(MAX_PREALLOCATED_WORDS);
        Self {
            dimensions,
            index: HashMap::with_capacity(words),
            data: Vec::with_capacity(words.saturating_mul(dimensions).min(MAX_PREALLOCATED_VALUES)),
        }
    }

    /// Build a table from `(word, vector)` pairs.
    ///
    /// Every vector must have exactly `dimensions` components. A word that
    /// appears more than once keeps its first vector.
    pub fn from_entries<W, V>(dimensions: usize, entries: impl IntoIterator<Item = (W, V)>) -> Result<Self>
    where
        W: Into<String>,
        V: AsRef<[f32]>,
    {
        let mut vectors = Self::with_capacity(dimensions, 0);
        for (word, vector) in entries {
            vectors.insert(word.into(), vector.as_ref())?;
        }
        Ok(vectors)
    }

    /// Load a model from disk.
    ///
    /// A compression suffix (`.gz`, `.bz2`, ...) selects the decoder, and the
    /// extension left after removing it selects the layout: `.bin` is the
    /// word2vec binary format, anything else is read as text.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (inner, compression) = split_extension(path);
        let file = File::open(path).map_err(|e| ErrorKind::from_io(e, path))?;
        let mut reader = BufReader::new(file);
        let compression = match compression {
            Compression::None => Compression::sniff(&mut reader).or_raise(|| ErrorKind::Decompression)?,
            detected => detected,
        };
        let mut decoder = BufReader::new(compression.wrap_reader(reader));
        let binary = inner.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("bin"));
        tracing::info!(%compression, binary, "Loading word vectors");

        let vectors = if binary {
            word2vec::read_binary(&mut decoder)?
        } else {
            word2vec::read_text(&mut decoder)?
        };
        tracing::info!(
            words = vectors.len(),
            dimensions = vectors.dimensions,
            "Loaded {} word vectors",
            vectors.len()
        );
        Ok(vectors)
    }

    /// Number of words in the vocabulary.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `false` if `word` was already present, leaving the table unchanged.
    pub(crate) fn insert(&mut self, word: String, vector: &[f32]) -> Result<bool> {
        if vector.len() != self.dimensions {
            exn::bail!(ErrorKind::DimensionMismatch {
                word,
                expected: self.dimensions,
                actual: vector.len(),
            });
        }
        if self.index.contains_key(&word) {
            tracing::trace!(%word, "Ignoring duplicate word");
            return Ok(false);
        }
        self.index.insert(word, self.index.len());
        self.data.extend_from_slice(vector);
        Ok(true)
    }
}

impl WordVectors for StaticWordVectors {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn vector(&self, word: &str) -> Option<&[f32]> {
        let row = *self.index.get(word)?;
        self.data.get(row * self.dimensions..(row + 1) * self.dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression as Level;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn binary_model(dimensions: usize, entries: &[(&str, &[f32])]) -> Vec<u8> {
        let mut out = format!("{} {}\n", entries.len(), dimensions).into_bytes();
        for (word, vector) in entries {
            out.extend_from_slice(word.as_bytes());
            out.push(b' ');
            for value in *vector {
                out.extend_from_slice(&value.to_le_bytes());
            }
            out.push(b'\n');
        }
        out
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Level::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_from_entries() {
        let vectors = StaticWordVectors::from_entries(2, [("good", [1.0_f32, 2.0]), ("bad", [3.0, 4.0])]).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors.dimensions(), 2);
        assert_eq!(vectors.vector("bad"), Some([3.0, 4.0].as_slice()));
        assert!(vectors.has_word("good"));
        assert!(!vectors.has_word("ugly"));
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let vectors = StaticWordVectors::from_entries(1, [("a", [1.0_f32]), ("a", [2.0]), ("b", [3.0])]).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors.vector("a"), Some([1.0].as_slice()));
        assert_eq!(vectors.vector("b"), Some([3.0].as_slice()));
    }

    #[test]
    fn test_wrong_dimensions() {
        let err = StaticWordVectors::from_entries(3, [("a", vec![1.0_f32, 2.0])]).unwrap_err();
        assert!(matches!(
            &*err,
            ErrorKind::DimensionMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_load_gzipped_binary() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("vectors.bin.gz");
        let model = binary_model(3, &[("movie", &[0.5, -1.0, 2.0]), ("great", &[1.0, 0.0, -0.25])]);
        std::fs::write(&path, gzip(&model)).unwrap();

        let vectors = StaticWordVectors::load(&path).unwrap();

        assert_eq!(vectors.dimensions(), 3);
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors.vector("movie"), Some([0.5, -1.0, 2.0].as_slice()));
        assert_eq!(vectors.vector("great"), Some([1.0, 0.0, -0.25].as_slice()));
    }

    #[test]
    fn test_load_plain_text() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("vectors.txt");
        std::fs::write(&path, "2 2\nfilm 0.1 0.2\nplot -1 3.5\n").unwrap();

        let vectors = StaticWordVectors::load(&path).unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors.vector("plot"), Some([-1.0, 3.5].as_slice()));
    }

    #[test]
    fn test_load_sniffs_compression_without_suffix() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("vectors.txt");
        std::fs::write(&path, gzip(b"film 0.1 0.2\n")).unwrap();

        let vectors = StaticWordVectors::load(&path).unwrap();

        assert_eq!(vectors.vector("film"), Some([0.1, 0.2].as_slice()));
    }

    #[test]
    fn test_load_missing() {
        let temp = tempfile::tempdir().unwrap();
        let err = StaticWordVectors::load(temp.path().join("missing.bin.gz")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }
}
