use presave_config::ModelConfig;
use presave_fetch::error::{ErrorKind, Result};
use presave_fetch::{Checksum, Confirm, Downloader, Fetcher};
use std::path::PathBuf;
use tracing::instrument;

/// Resolve the word2vec model to a local file, downloading it if needed.
///
/// An explicitly configured `path` is returned untouched. Otherwise the
/// managed copy is checked against the configured MD5 and, if it is missing
/// or does not match, downloaded again once `confirm` agrees.
#[instrument(skip_all)]
pub fn ensure_model(
    config: &ModelConfig,
    fetcher: &(impl Fetcher + ?Sized),
    confirm: &(impl Confirm + ?Sized),
) -> Result<PathBuf> {
    if let Some(path) = &config.path {
        tracing::info!(path = %path.display(), "Using configured word2vec model");
        return Ok(path.clone());
    }

    let checksum: Checksum = config.md5.parse()?;
    let path = config.managed_path();
    if path.is_file() {
        tracing::info!(path = %path.display(), "Found existing model, checking MD5...");
        if checksum.matches_file(&path)? {
            tracing::info!("Existing model hash matches");
            return Ok(path);
        }
        tracing::warn!("Existing model hash doesn't match, downloading again");
    } else {
        tracing::info!(path = %path.display(), "No previous download of the model found");
    }

    tracing::warn!(file = %config.file, "The word2vec model is a 1.5GB download");
    let prompt = format!("Press ENTER to download {} to {} (or type \"n\" to abort)", config.file, config.dir.display());
    if !confirm.confirm(&prompt)? {
        exn::bail!(ErrorKind::Declined);
    }

    tracing::info!(url = %config.url, "Starting model download (1.5GB!)...");
    Downloader::new(fetcher, config.max_attempts).download_verified(&config.url, &path, &checksum)?;
    tracing::info!(path = %path.display(), "Successfully downloaded word2vec model");
    Ok(path)
}
