//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::StoreOptions;

/// Database file used when neither `--db` nor the config file names one.
pub const DEFAULT_DB: &str = "notes.sqlite";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database file
    pub db: Option<PathBuf>,

    /// Largest accepted attachment, in bytes
    pub upload_limit: Option<u64>,

    /// How long a writer waits for the database lock, in milliseconds
    pub busy_timeout_ms: Option<u64>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `config_path`, or defaults if it is missing.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/quire/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quire")
            .join("config.toml")
    }

    /// Resolve the database file, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--db` argument
    /// 2. Config file `db` setting
    /// 3. `notes.sqlite` in the current directory
    pub fn db_path(&self, cli_db: Option<&PathBuf>) -> PathBuf {
        cli_db
            .cloned()
            .or_else(|| self.db.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB))
    }

    /// Store options with config overrides applied to the defaults.
    pub fn store_options(&self) -> StoreOptions {
        let defaults = StoreOptions::default();
        StoreOptions {
            upload_limit: self.upload_limit.unwrap_or(defaults.upload_limit),
            busy_timeout: self
                .busy_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.busy_timeout),
        }
    }
}
