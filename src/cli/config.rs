//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::DEFAULT_TAG_COLOR;

/// Environment variable that points at an alternate config file.
pub const CONFIG_ENV: &str = "NOTEBOX_CONFIG";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database file
    pub database: Option<PathBuf>,

    /// Color for tags created without one
    pub default_color: Option<String>,

    /// Log filter used when neither RUST_LOG nor -v is given
    pub log: Option<String>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// `$NOTEBOX_CONFIG` if set, else `~/.config/notebox/config.toml`.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notebox")
            .join("config.toml")
    }

    /// Resolve the database file, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--db` argument
    /// 2. Config file `database` setting
    /// 3. `notes.db` in the platform data directory
    pub fn database_path(&self, cli_db: Option<&PathBuf>) -> PathBuf {
        cli_db
            .cloned()
            .or_else(|| self.database.clone())
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("notebox")
                    .join("notes.db")
            })
    }

    /// Color for new tags.
    pub fn tag_color(&self) -> &str {
        self.default_color.as_deref().unwrap_or(DEFAULT_TAG_COLOR)
    }

    /// Default log filter for the given `-v` count.
    ///
    /// `RUST_LOG` still overrides whatever this returns.
    pub fn log_filter(&self, verbose: u8) -> String {
        match verbose {
            0 => self.log.clone().unwrap_or_else(|| "warn".to_string()),
            1 => "notebox=info".to_string(),
            2 => "notebox=debug".to_string(),
            _ => "notebox=trace".to_string(),
        }
    }
}
