use crate::batch::Batch;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// A progress event is emitted every time this many batches have been saved.
pub const PROGRESS_INTERVAL: usize = 500;

/// File name of the batch at `index`.
pub fn batch_file_name(index: usize) -> String {
    format!("dataset-{index}.bin")
}

/// Persists a stream of batches as numbered files in one directory.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    directory: PathBuf,
}

impl DatasetWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Save every batch as `dataset-<i>.bin`, `i` counting up from zero, and
    /// return how many were written.
    ///
    /// The first failure, whether producing or saving a batch, stops the
    /// drain. Files already written are left in place.
    #[instrument(skip(self, batches), fields(directory = %self.directory.display()))]
    pub fn write_all<I>(&self, batches: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<Batch>>,
    {
        fs::create_dir_all(&self.directory).map_err(|e| ErrorKind::from_io(e, &self.directory))?;
        let mut saved = 0;
        for batch in batches {
            let batch = batch.or_raise(|| ErrorKind::Produce(saved))?;
            let path = self.directory.join(batch_file_name(saved));
            batch.save(&path).or_raise(|| ErrorKind::Save {
                index: saved,
                path: path.clone(),
            })?;
            saved += 1;
            if saved % PROGRESS_INTERVAL == 0 {
                tracing::info!(saved, "Saved {saved} batches");
            }
        }
        tracing::info!(saved, "Finished saving {saved} batches to {}", self.directory.display());
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Tensor;
    use rstest::rstest;

    fn batch(examples: usize) -> Batch {
        Batch {
            features: Tensor::zeros(&[examples, 3, 2]),
            labels: Tensor::zeros(&[examples, 2, 2]),
            features_mask: Tensor::zeros(&[examples, 2]),
            labels_mask: Tensor::zeros(&[examples, 2]),
        }
    }

    fn file_names(directory: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(directory)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(PROGRESS_INTERVAL + 1)]
    fn test_writes_numbered_files(#[case] count: usize) {
        let temp = tempfile::tempdir().unwrap();
        let directory = temp.path().join("nested/train");

        let written = DatasetWriter::new(&directory).write_all((0..count).map(|i| Ok(batch(i % 3 + 1)))).unwrap();

        assert_eq!(written, count);
        let mut expected: Vec<String> = (0..count).map(batch_file_name).collect();
        expected.sort();
        assert_eq!(file_names(&directory), expected);
        if count > 2 {
            assert_eq!(Batch::load(directory.join("dataset-2.bin")).unwrap(), batch(3));
        }
    }

    #[test]
    fn test_production_failure_stops_drain() {
        let temp = tempfile::tempdir().unwrap();
        let batches = vec![
            Ok(batch(1)),
            Err(exn::Exn::from(ErrorKind::InvalidParameter("boom"))),
            Ok(batch(1)),
        ];

        let err = DatasetWriter::new(temp.path()).write_all(batches).unwrap_err();

        assert!(matches!(&*err, ErrorKind::Produce(1)));
        assert_eq!(file_names(temp.path()), ["dataset-0.bin"]);
    }

    #[test]
    fn test_save_failure_stops_drain() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join(batch_file_name(1))).unwrap();

        let err = DatasetWriter::new(temp.path()).write_all((0..3).map(|_| Ok(batch(1)))).unwrap_err();

        assert!(matches!(&*err, ErrorKind::Save { index: 1, .. }));
        assert_eq!(file_names(temp.path()), ["dataset-0.bin", "dataset-1.bin"]);
    }
}
