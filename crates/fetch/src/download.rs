use crate::checksum::Checksum;
use crate::error::{Error, ErrorKind, Result};
use crate::fetcher::Fetcher;
use std::path::Path;
use tracing::instrument;

/// Checksum-verified downloads with a bounded number of attempts.
///
/// Each attempt fetches the whole resource again; there is no resume. An
/// attempt fails if the transfer fails with a retryable error or if the
/// downloaded file does not hash to the expected checksum. Anything not
/// retryable (a 404, a permissions problem) fails immediately.
pub struct Downloader<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    max_attempts: u32,
}
impl<'a, F: Fetcher + ?Sized> Downloader<'a, F> {
    /// At least one attempt is always made, even if `max_attempts` is zero.
    pub fn new(fetcher: &'a F, max_attempts: u32) -> Self {
        Self {
            fetcher,
            max_attempts: max_attempts.max(1),
        }
    }

    #[instrument(skip(self, destination, expected), fields(destination = %destination.display(), expected = %expected))]
    pub fn download_verified(&self, url: &str, destination: &Path, expected: &Checksum) -> Result<()> {
        let mut last_error: Option<Error> = None;
        for attempt in 1..=self.max_attempts {
            tracing::info!(attempt, max_attempts = self.max_attempts, "Starting download");
            match self.attempt(url, destination, expected) {
                Ok(()) => {
                    tracing::info!(attempt, "Download verified");
                    return Ok(());
                },
                Err(e) if e.is_retryable() => {
                    tracing::warn!(attempt, error = %&*e, "Download attempt failed");
                    last_error = Some(e);
                },
                Err(e) => return Err(e),
            }
        }
        let exhausted = ErrorKind::AttemptsExhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
        };
        match last_error {
            Some(e) => Err(e.raise(exhausted)),
            None => exn::bail!(exhausted),
        }
    }

    fn attempt(&self, url: &str, destination: &Path, expected: &Checksum) -> Result<()> {
        self.fetcher.fetch_to_file(url, destination)?;
        let actual = Checksum::of_file(destination)?;
        if actual != *expected {
            exn::bail!(ErrorKind::ChecksumMismatch {
                path: destination.to_path_buf(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockFetcher;

    const URL: &str = "https://example.com/model.bin.gz";

    #[test]
    fn test_first_attempt_succeeds() {
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("model.bin.gz");
        let fetcher = MockFetcher::with_resources([(URL, b"model".to_vec())]);

        Downloader::new(&fetcher, 5)
            .download_verified(URL, &destination, &Checksum::of_bytes(b"model"))
            .unwrap();

        assert_eq!(fetcher.request_count(URL), 1);
        assert_eq!(std::fs::read(&destination).unwrap(), b"model");
    }

    #[test]
    fn test_retries_after_checksum_mismatch() {
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("model.bin.gz");
        let fetcher = MockFetcher::with_responses(URL, [b"corrupt".to_vec(), b"also corrupt".to_vec(), b"model".to_vec()]);

        Downloader::new(&fetcher, 5)
            .download_verified(URL, &destination, &Checksum::of_bytes(b"model"))
            .unwrap();

        assert_eq!(fetcher.request_count(URL), 3);
        assert_eq!(std::fs::read(&destination).unwrap(), b"model");
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let temp = tempfile::tempdir().unwrap();
        let destination = temp.path().join("model.bin.gz");
        let fetcher = MockFetcher::with_resources([(URL, b"always corrupt".to_vec())]);

        let err = Downloader::new(&fetcher, 3)
            .download_verified(URL, &destination, &Checksum::of_bytes(b"model"))
            .unwrap_err();

        assert!(matches!(&*err, ErrorKind::AttemptsExhausted { attempts: 3, .. }));
        assert_eq!(fetcher.request_count(URL), 3);
    }

    #[test]
    fn test_not_found_is_not_retried() {
        let temp = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::default();

        let err = Downloader::new(&fetcher, 5)
            .download_verified(URL, &temp.path().join("model.bin.gz"), &Checksum::of_bytes(b"model"))
            .unwrap_err();

        assert!(matches!(&*err, ErrorKind::Status { status: 404, .. }));
        assert_eq!(fetcher.request_count(URL), 1);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let temp = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::with_resources([(URL, b"model".to_vec())]);

        Downloader::new(&fetcher, 0)
            .download_verified(URL, &temp.path().join("model.bin.gz"), &Checksum::of_bytes(b"model"))
            .unwrap();

        assert_eq!(fetcher.request_count(URL), 1);
    }
}
