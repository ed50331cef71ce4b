//! Configuration for `presave`.
//!
//! Settings are layered with [figment](https://docs.rs/figment): built-in
//! defaults, then a TOML/YAML/JSON file, then `PRESAVE_*` environment
//! variables (nested keys joined with `__`, e.g. `PRESAVE_MODEL__URL`).
//! Command-line flags are applied on top by the binary.

pub mod error;
mod load;
mod settings;

pub use crate::load::{ENV_PREFIX, ENV_SEPARATOR, default_file};
pub use crate::settings::{
    Config, CorpusConfig, DEFAULT_BATCH_SIZE, DEFAULT_MAX_LENGTH, ModelConfig, OutputConfig,
};
