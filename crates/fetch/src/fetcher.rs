use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use reqwest::blocking::Client;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::instrument;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Copies the body of a URL somewhere.
///
/// Implementors only provide [`fetch`](Self::fetch); writing to disk is
/// shared so every fetcher gets the same all-or-nothing file semantics.
pub trait Fetcher {
    /// Stream the resource at `url` into `sink`, returning the number of
    /// bytes written.
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64>;

    /// Download `url` to `destination`, creating parent directories as needed.
    ///
    /// The body is written to a temporary file beside the destination and
    /// renamed into place only once the transfer has completed, so an
    /// interrupted download never leaves a partial file at `destination`.
    /// An existing file at `destination` is replaced.
    fn fetch_to_file(&self, url: &str, destination: &Path) -> Result<u64> {
        let directory = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(directory).map_err(|e| ErrorKind::from_io(e, directory))?;
        let mut temp = NamedTempFile::new_in(directory).map_err(|e| ErrorKind::from_io(e, directory))?;
        let bytes = {
            let mut writer = BufWriter::new(temp.as_file_mut());
            let bytes = self.fetch(url, &mut writer)?;
            writer.flush().map_err(|e| ErrorKind::from_io(e, destination))?;
            bytes
        };
        temp.persist(destination).map_err(|e| ErrorKind::from_io(e.error, destination))?;
        tracing::debug!(url, destination = %destination.display(), bytes, "Saved download");
        Ok(bytes)
    }
}

/// Blocking HTTP(S) fetcher.
///
/// There is no overall request timeout: the word2vec model is 1.5GB and a
/// slow link may legitimately take hours. Only connecting is time-limited.
///
/// The HTTP client is built on the first request, so a run that finds
/// everything already on disk never initializes TLS.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: OnceLock<Client>,
}
impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Option::<Duration>::None)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        tracing::debug!("HTTP client initialized");
        Ok(self.client.get_or_init(|| client))
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(skip(self, sink))]
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        let mut response = self.client()?.get(url).send().or_raise(|| ErrorKind::Network(url.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        tracing::info!(content_length = response.content_length(), "Downloading");
        response.copy_to(sink).or_raise(|| ErrorKind::Network(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockFetcher;

    #[test]
    fn test_fetch_to_file_creates_directories() {
        let temp = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::with_resources([("http://example.com/a", b"payload".to_vec())]);
        let destination = temp.path().join("nested/dir/a.bin");

        let bytes = fetcher.fetch_to_file("http://example.com/a", &destination).unwrap();

        assert_eq!(bytes, 7);
        assert_eq!(fs::read(&destination).unwrap(), b"payload");
    }

    #[test]
    fn test_fetch_to_file_replaces_existing() {
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("a.bin");
        fs::write(&destination, b"stale contents that are longer").unwrap();
        let fetcher = MockFetcher::with_resources([("http://example.com/a", b"fresh".to_vec())]);

        fetcher.fetch_to_file("http://example.com/a", &destination).unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"fresh");
    }

    #[test]
    fn test_failed_fetch_leaves_no_file() {
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("a.bin");
        let fetcher = MockFetcher::default();

        let err = fetcher.fetch_to_file("http://example.com/missing", &destination).unwrap_err();

        assert!(matches!(&*err, ErrorKind::Status { status: 404, .. }));
        assert!(!destination.exists());
        // Only the (now removed) temporary file was ever created.
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_http_client_is_built_on_first_use() {
        let fetcher = HttpFetcher::new();
        assert!(fetcher.client.get().is_none());

        let first: *const Client = fetcher.client().unwrap();

        assert!(std::ptr::eq(first, fetcher.client().unwrap()));
    }
}
