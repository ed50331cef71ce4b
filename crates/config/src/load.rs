use crate::error::{ErrorKind, Result};
use crate::settings::Config;
use directories::{BaseDirs, ProjectDirs};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Prefix of the environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "PRESAVE_";
/// Separator for nested keys in environment variables (`PRESAVE_MODEL__URL`).
pub const ENV_SEPARATOR: &str = "__";

impl Config {
    /// Load the configuration for this user.
    ///
    /// Layers, lowest priority first: built-in defaults, then the
    /// configuration file, then `PRESAVE_*` environment variables. The file
    /// is `explicit` if given, which must then exist, or else
    /// `config.toml` in the platform configuration directory if present.
    ///
    /// The result is not validated: callers apply their own overrides first
    /// and then call [`Config::validate`].
    #[instrument(skip(explicit))]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => default_file().filter(|path| path.is_file()),
        };
        let home = BaseDirs::new().ok_or(ErrorKind::NoHomeDirectory)?;
        let defaults = Self::defaults(home.home_dir(), &std::env::temp_dir());
        Self::from_layers(defaults, file.as_deref())
    }

    /// Merge `file` and the environment over `defaults`.
    pub fn from_layers(defaults: Self, file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(defaults));
        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "Reading configuration file");
            figment = merge_file(figment, path)?;
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
            .extract()
            .or_raise(|| ErrorKind::Load)
    }
}

/// `config.toml` inside the platform configuration directory.
pub fn default_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "presave").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file_exact(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
        Some("json") => figment.merge(Json::file_exact(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}
