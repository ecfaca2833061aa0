//! Configuration file handling for fwq

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of pandas assumed when neither the CLI nor the config names one
const DEFAULT_PANDAS: usize = 1;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default firmware database file
    pub database: Option<PathBuf>,
    /// Default number of attached pandas
    pub pandas: Option<usize>,
    /// Disable colored output
    pub no_color: Option<bool>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("fwq");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(&self, database: Option<&Path>, no_color: bool) -> MergedConfig {
        MergedConfig {
            database: database
                .map(Path::to_path_buf)
                .or_else(|| self.database.clone()),
            pandas: self.pandas.unwrap_or(DEFAULT_PANDAS),
            no_color: no_color || self.no_color.unwrap_or(false),
        }
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub database: Option<PathBuf>,
    pub pandas: usize,
    pub no_color: bool,
}

impl MergedConfig {
    /// Database path, failing with a hint when none was configured
    pub fn database(&self) -> Result<&Path> {
        self.database.as_deref().context(
            "No firmware database given; pass --database, set FWQ_DATABASE \
             or add `database` to the config file",
        )
    }
}
