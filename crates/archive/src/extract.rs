use crate::entry::resolve;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use presave_compress::Compression;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tar::{Archive, EntryType};
use tracing::instrument;

/// Size of the transfer buffer used to copy each file entry.
pub const BUFFER_SIZE: usize = 4096;
/// A progress event is emitted every time this many files have been written.
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Counts reported once an archive has been fully extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    /// File entries written.
    pub files: u64,
    /// Directory entries created (or already present).
    pub directories: u64,
    /// Link, device and fifo entries that were not materialized.
    pub skipped: u64,
    /// Root the entries were extracted into.
    pub output: PathBuf,
}
impl ExtractSummary {
    fn new(output: PathBuf) -> Self {
        Self {
            files: 0,
            directories: 0,
            skipped: 0,
            output,
        }
    }
}

/// Extracts tar archives into an output directory.
///
/// By default the extractor expects an archive to list every directory before
/// the files it contains, and a file whose parent is missing fails with
/// [`NotFound`](ErrorKind::NotFound). Archives produced by `tar -c` always
/// satisfy this; hand-assembled ones may not, in which case
/// [`create_missing_parents`](Self::create_missing_parents) relaxes it.
///
/// Extracting over an existing tree is allowed: directories are left alone
/// and file entries overwrite whatever is there.
#[derive(Debug, Clone)]
pub struct Extractor {
    output: PathBuf,
    create_missing_parents: bool,
}
impl Extractor {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            create_missing_parents: false,
        }
    }

    /// Create the parent directories of file entries on demand instead of
    /// relying on the archive to have listed them first.
    #[must_use]
    pub fn create_missing_parents(mut self, enabled: bool) -> Self {
        self.create_missing_parents = enabled;
        self
    }

    /// Extract an archive file from disk.
    ///
    /// The compression format is taken from the file extension, falling back
    /// to the stream's magic bytes when the extension says nothing.
    #[instrument(skip(self, archive), fields(archive = %archive.as_ref().display(), output = %self.output.display()))]
    pub fn extract_file(&self, archive: impl AsRef<Path>) -> Result<ExtractSummary> {
        let archive = archive.as_ref();
        let file = File::open(archive).map_err(|e| ErrorKind::from_io(e, archive))?;
        let mut reader = BufReader::new(file);
        let compression = match Compression::from_path(archive) {
            Compression::None => Compression::sniff(&mut reader).or_raise(|| ErrorKind::Decompression)?,
            detected => detected,
        };
        tracing::debug!(%compression, "Opened archive");
        self.extract_reader(reader, compression)
    }

    /// Extract an archive from any reader, decompressing it with `compression`.
    pub fn extract_reader<R: Read>(&self, reader: R, compression: Compression) -> Result<ExtractSummary> {
        fs::create_dir_all(&self.output).map_err(|e| ErrorKind::from_io(e, &self.output))?;
        let decoder = compression.wrap_reader(reader);
        let mut archive = Archive::new(decoder);
        let mut summary = ExtractSummary::new(self.output.clone());

        tracing::info!("Extracting files");
        for entry in archive.entries().or_raise(|| ErrorKind::InvalidArchive)? {
            let mut entry = entry.or_raise(|| ErrorKind::InvalidArchive)?;
            let raw = entry.path().or_raise(|| ErrorKind::InvalidArchive)?.into_owned();
            let target = self.output.join(resolve(&raw)?);
            match entry.header().entry_type() {
                EntryType::Directory => {
                    fs::create_dir_all(&target).map_err(|e| ErrorKind::from_io(e, &target))?;
                    summary.directories += 1;
                },
                EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse => {
                    if target == self.output {
                        exn::bail!(ErrorKind::InvalidEntry(raw));
                    }
                    let declared = entry.size();
                    self.write_file(&mut entry, &target, declared)?;
                    summary.files += 1;
                    if summary.files % PROGRESS_INTERVAL == 0 {
                        tracing::info!(files = summary.files, directories = summary.directories, "Extracting...");
                    }
                },
                other => {
                    tracing::warn!(entry = %raw.display(), kind = ?other, "Skipping entry that is neither a file nor a directory");
                    summary.skipped += 1;
                },
            }
        }

        tracing::info!(
            files = summary.files,
            directories = summary.directories,
            output = %summary.output.display(),
            "{} files and {} directories extracted to {}",
            summary.files,
            summary.directories,
            summary.output.display(),
        );
        Ok(summary)
    }

    /// Copy exactly `declared` bytes of an entry into `target` through a
    /// fixed-size buffer.
    fn write_file(&self, entry: &mut impl Read, target: &Path, declared: u64) -> Result<()> {
        if self.create_missing_parents
            && let Some(parent) = target.parent()
        {
            fs::create_dir_all(parent).map_err(|e| ErrorKind::from_io(e, parent))?;
        }
        let mut file = File::create(target).map_err(|e| ErrorKind::from_io(e, target))?;
        let mut buffer = [0u8; BUFFER_SIZE];
        let mut written = 0u64;
        loop {
            let count = match entry.read(&mut buffer) {
                Ok(0) => break,
                Ok(count) => count,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).or_raise(|| ErrorKind::InvalidArchive),
            };
            file.write_all(&buffer[..count]).map_err(|e| ErrorKind::from_io(e, target))?;
            written += count as u64;
        }
        file.flush().map_err(|e| ErrorKind::from_io(e, target))?;
        if written != declared {
            exn::bail!(ErrorKind::Truncated(target.to_path_buf()));
        }
        Ok(())
    }
}
