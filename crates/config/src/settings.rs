use crate::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BATCH_SIZE: usize = 64;
pub const DEFAULT_MAX_LENGTH: usize = 256;

const CORPUS_URL: &str = "http://ai.stanford.edu/~amaas/data/sentiment/aclImdb_v1.tar.gz";
const MODEL_URL: &str =
    "https://dl4jdata.blob.core.windows.net/resources/wordvectors/GoogleNews-vectors-negative300.bin.gz";
const MODEL_MD5: &str = "1c892c4707a8a1a508b01a01735c0339";
// Everything the tool writes under the home directory lives below this.
const HOME_DATA: &str = "presave-data";

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Examples per saved batch.
    pub batch_size: usize,
    /// Reviews longer than this many known tokens are truncated.
    pub max_length: usize,
    pub corpus: CorpusConfig,
    pub model: ModelConfig,
    pub output: OutputConfig,
}

/// Where the review corpus comes from and where it is unpacked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub url: String,
    pub data_dir: PathBuf,
    /// File name of the downloaded archive inside `data_dir`.
    pub archive: String,
    /// Name of the directory the archive unpacks to inside `data_dir`.
    pub extracted: String,
}
impl CorpusConfig {
    pub fn archive_path(&self) -> PathBuf {
        self.data_dir.join(&self.archive)
    }

    pub fn extracted_path(&self) -> PathBuf {
        self.data_dir.join(&self.extracted)
    }
}

/// The pretrained word2vec model.
///
/// When `path` is set the file is used as-is. Otherwise the model is kept at
/// `dir/file`, verified against `md5` and downloaded from `url` as needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub dir: PathBuf,
    pub file: String,
    pub url: String,
    pub md5: String,
    pub max_attempts: u32,
}
impl ModelConfig {
    /// Location of the checksum-managed copy of the model.
    pub fn managed_path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }
}

/// Destination directories for the saved batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub train: PathBuf,
    pub test: PathBuf,
}

impl Config {
    /// Built-in defaults, rooted at the given home and temporary directories.
    pub fn defaults(home: &Path, temp: &Path) -> Self {
        let data = home.join(HOME_DATA);
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_length: DEFAULT_MAX_LENGTH,
            corpus: CorpusConfig {
                url: CORPUS_URL.to_string(),
                data_dir: temp.join("presave_w2vSentiment"),
                archive: "aclImdb_v1.tar.gz".to_string(),
                extracted: "aclImdb".to_string(),
            },
            model: ModelConfig {
                path: None,
                dir: data.join("w2vec300"),
                file: "GoogleNews-vectors-negative300.bin.gz".to_string(),
                url: MODEL_URL.to_string(),
                md5: MODEL_MD5.to_string(),
                max_attempts: 5,
            },
            output: OutputConfig {
                train: data.join("imdbpresaved").join("train"),
                test: data.join("imdbpresaved").join("test"),
            },
        }
    }

    /// Reject values that would make the pipeline misbehave.
    pub fn validate(&self) -> Result<()> {
        let invalid = |key: &'static str, reason: &'static str| -> Result<()> {
            exn::bail!(ErrorKind::Invalid { key, reason })
        };
        if self.batch_size == 0 {
            return invalid("batch_size", "must be at least 1");
        }
        if self.max_length == 0 {
            return invalid("max_length", "must be at least 1");
        }
        if self.model.max_attempts == 0 {
            return invalid("model.max_attempts", "must be at least 1");
        }
        for (key, value) in [("corpus.url", &self.corpus.url), ("model.url", &self.model.url)] {
            if value.trim().is_empty() {
                return invalid(key, "must not be empty");
            }
        }
        for (key, value) in [
            ("corpus.archive", &self.corpus.archive),
            ("corpus.extracted", &self.corpus.extracted),
            ("model.file", &self.model.file),
        ] {
            if !is_file_name(value) {
                return invalid(key, "must be a single file name");
            }
        }
        if self.model.path.is_none() && self.model.md5.len() != 32 {
            return invalid("model.md5", "must be 32 hexadecimal characters");
        }
        Ok(())
    }
}

fn is_file_name(value: &str) -> bool {
    let mut components = Path::new(value).components();
    matches!((components.next(), components.next()), (Some(std::path::Component::Normal(_)), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn defaults() -> Config {
        Config::defaults(Path::new("/home/user"), Path::new("/tmp"))
    }

    #[test]
    fn test_default_layout() {
        let config = defaults();
        assert_eq!(config.corpus.archive_path(), Path::new("/tmp/presave_w2vSentiment/aclImdb_v1.tar.gz"));
        assert_eq!(config.corpus.extracted_path(), Path::new("/tmp/presave_w2vSentiment/aclImdb"));
        assert_eq!(
            config.model.managed_path(),
            Path::new("/home/user/presave-data/w2vec300/GoogleNews-vectors-negative300.bin.gz")
        );
        assert_eq!(config.output.train, Path::new("/home/user/presave-data/imdbpresaved/train"));
        assert_eq!(config.output.test, Path::new("/home/user/presave-data/imdbpresaved/test"));
        assert_eq!(config.model.max_attempts, 5);
        config.validate().unwrap();
    }

    #[rstest]
    #[case::batch(|c: &mut Config| c.batch_size = 0, "batch_size")]
    #[case::length(|c: &mut Config| c.max_length = 0, "max_length")]
    #[case::attempts(|c: &mut Config| c.model.max_attempts = 0, "model.max_attempts")]
    #[case::url(|c: &mut Config| c.corpus.url = " ".to_string(), "corpus.url")]
    #[case::archive(|c: &mut Config| c.corpus.archive = "../escape.tar.gz".to_string(), "corpus.archive")]
    #[case::nested(|c: &mut Config| c.model.file = "a/b.bin".to_string(), "model.file")]
    #[case::md5(|c: &mut Config| c.model.md5 = "abc".to_string(), "model.md5")]
    fn test_validate_rejects(#[case] mutate: fn(&mut Config), #[case] expected: &str) {
        let mut config = defaults();
        mutate(&mut config);
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { key, .. } if *key == expected));
    }

    #[test]
    fn test_explicit_model_skips_checksum() {
        let mut config = defaults();
        config.model.path = Some(PathBuf::from("/models/custom.txt"));
        config.model.md5 = String::new();
        config.validate().unwrap();
    }
}
