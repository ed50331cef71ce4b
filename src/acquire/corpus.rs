use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::ResultExt;
use presave_config::CorpusConfig;
use presave_fetch::Fetcher;
use std::fs;
use std::path::Path;
use tracing::instrument;

/// What [`ensure_corpus`] had to do.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum CorpusState {
    /// The archive was downloaded and extracted.
    #[display("downloaded")]
    Downloaded,
    /// The archive was already present and only needed extracting.
    #[display("extracted")]
    Extracted,
    /// Both the archive and the extracted tree were already present.
    #[display("cached")]
    Cached,
}

/// Make sure the corpus archive is downloaded and extracted into
/// `config.data_dir`.
///
/// Presence on disk is the only signal: an existing archive is assumed
/// complete and an existing extracted directory is assumed to match it.
#[instrument(skip_all, fields(data_dir = %config.data_dir.display()))]
pub fn ensure_corpus(config: &CorpusConfig, fetcher: &(impl Fetcher + ?Sized)) -> Result<CorpusState> {
    fs::create_dir_all(&config.data_dir).map_err(|e| ErrorKind::from_io(e, &config.data_dir))?;
    let archive = config.archive_path();
    let extracted = config.extracted_path();

    let state = if !archive.exists() {
        tracing::info!(url = %config.url, "Starting corpus download (80MB)...");
        fetcher.fetch_to_file(&config.url, &archive).or_raise(|| ErrorKind::Download(config.url.clone()))?;
        tracing::info!(archive = %archive.display(), "Corpus archive downloaded");
        extract(&archive, &config.data_dir)?;
        CorpusState::Downloaded
    } else if !extracted.exists() {
        tracing::info!(archive = %archive.display(), "Corpus archive already exists");
        extract(&archive, &config.data_dir)?;
        CorpusState::Extracted
    } else {
        tracing::info!(extracted = %extracted.display(), "Corpus already extracted");
        CorpusState::Cached
    };
    tracing::debug!(%state, "Corpus ready");
    Ok(state)
}

fn extract(archive: &Path, output: &Path) -> Result<()> {
    presave_archive::extract_archive(archive, output).or_raise(|| ErrorKind::Extract(archive.to_path_buf()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use presave_fetch::MockFetcher;
    use tar::{Builder, EntryType, Header};

    const URL: &str = "http://example.com/aclImdb_v1.tar.gz";

    fn corpus_archive() -> Vec<u8> {
        let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for directory in ["aclImdb/", "aclImdb/train/", "aclImdb/train/pos/"] {
            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Directory);
            header.set_mode(0o755);
            header.set_size(0);
            builder.append_data(&mut header, directory, std::io::empty()).unwrap();
        }
        let body = b"A wonderful film.";
        let mut header = Header::new_gnu();
        header.set_mode(0o644);
        header.set_size(body.len() as u64);
        builder.append_data(&mut header, "aclImdb/train/pos/0_9.txt", &body[..]).unwrap();
        builder.into_inner().unwrap().finish().unwrap()
    }

    fn config(data_dir: &Path) -> CorpusConfig {
        CorpusConfig {
            url: URL.to_string(),
            data_dir: data_dir.to_path_buf(),
            archive: "aclImdb_v1.tar.gz".to_string(),
            extracted: "aclImdb".to_string(),
        }
    }

    #[test]
    fn test_downloads_then_extracts() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(&temp.path().join("data"));
        let fetcher = MockFetcher::with_resources([(URL, corpus_archive())]);

        let state = ensure_corpus(&config, &fetcher).unwrap();

        assert_eq!(state, CorpusState::Downloaded);
        assert_eq!(fetcher.request_count(URL), 1);
        assert!(config.archive_path().is_file());
        let review = config.extracted_path().join("train/pos/0_9.txt");
        assert_eq!(fs::read_to_string(review).unwrap(), "A wonderful film.");
    }

    #[test]
    fn test_archive_present_only_extracts() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        fs::write(config.archive_path(), corpus_archive()).unwrap();
        let fetcher = MockFetcher::default();

        let state = ensure_corpus(&config, &fetcher).unwrap();

        assert_eq!(state, CorpusState::Extracted);
        assert!(fetcher.requests().is_empty());
        assert!(config.extracted_path().join("train/pos/0_9.txt").is_file());
    }

    #[test]
    fn test_everything_present_does_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        // Not a valid archive: touching it at all would fail.
        fs::write(config.archive_path(), b"garbage").unwrap();
        fs::create_dir(config.extracted_path()).unwrap();
        let fetcher = MockFetcher::default();

        let state = ensure_corpus(&config, &fetcher).unwrap();

        assert_eq!(state, CorpusState::Cached);
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn test_failed_download_leaves_no_archive() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        let fetcher = MockFetcher::default();

        let err = ensure_corpus(&config, &fetcher).unwrap_err();

        assert!(matches!(&*err, ErrorKind::Download(url) if url == URL));
        assert!(!config.archive_path().exists());
    }

    #[test]
    fn test_corrupt_archive_fails_extraction() {
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path());
        fs::write(config.archive_path(), b"garbage").unwrap();

        let err = ensure_corpus(&config, &MockFetcher::default()).unwrap_err();

        assert!(matches!(&*err, ErrorKind::Extract(_)));
    }
}
