//! Engine configuration, loaded in layers: defaults, then a TOML config
//! file, then environment variables prefixed `SEARCHSYNC_`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The underlying source could not be read or parsed.
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was readable but out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tuning for sync runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Records per batch. Each batch is one upsert plus one commit.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Issue a backend optimize after this many successful commits.
    /// 0 disables optimize entirely.
    #[serde(default)]
    pub optimize_every: usize,

    /// Additional attempts for a failed batch before its records are
    /// marked dirty and the run moves on.
    #[serde(default = "default_max_batch_retries")]
    pub max_batch_retries: usize,
}

fn default_batch_size() -> usize {
    500
}

fn default_max_batch_retries() -> usize {
    1
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            optimize_every: 0,
            max_batch_retries: default_max_batch_retries(),
        }
    }
}

impl SyncConfig {
    /// Default config file location: `<config dir>/searchsync/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "searchsync").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default file location and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_config_path().as_deref())
    }

    /// Load configuration layering defaults, the given file (if it
    /// exists) and `SEARCHSYNC_`-prefixed environment variables.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            }
        }

        builder = builder.add_source(Environment::with_prefix("SEARCHSYNC"));

        let settings: SyncConfig = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configured values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be > 0".to_string()));
        }
        Ok(())
    }

    /// Override the batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Override the optimize cadence.
    pub fn with_optimize_every(mut self, commits: usize) -> Self {
        self.optimize_every = commits;
        self
    }

    /// Override the per-batch retry budget.
    pub fn with_max_batch_retries(mut self, retries: usize) -> Self {
        self.max_batch_retries = retries;
        self
    }
}
