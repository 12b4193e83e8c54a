// In: src/config.rs

//! The single source of truth for all collector configuration.
//!
//! `CollectConfig` is created once at the application boundary (from a JSON
//! file or an embedding service's settings) and then passed down through the
//! system as a shared, read-only `Arc<CollectConfig>`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CollectError;

//==================================================================================
// I. Logging
//==================================================================================

/// Settings consumed by `observability::init_logging`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// When set, log lines are appended to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

//==================================================================================
// II. The Unified CollectConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct CollectConfig {
    /// Destination directory for output files. Never created or cleaned by us.
    #[serde(default = "default_file_depot")]
    pub file_depot: PathBuf,

    /// Replaces every recipe's own chunk size when set.
    #[serde(default)]
    pub chunk_size_override: Option<usize>,

    /// Upper bound on connection attempts while the source keeps reporting
    /// "database name not unique".
    #[serde(default = "default_max_connect_attempts")]
    pub max_connect_attempts: usize,

    /// If true, a request that fails after opening its output file deletes it.
    #[serde(default = "default_true")]
    pub remove_partial_output: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            file_depot: default_file_depot(),
            chunk_size_override: None,
            max_connect_attempts: default_max_connect_attempts(),
            remove_partial_output: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl CollectConfig {
    /// Parses and validates a config from JSON text. Missing keys take defaults.
    pub fn from_json_str(text: &str) -> Result<Self, CollectError> {
        let config: CollectConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CollectError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), CollectError> {
        if self.max_connect_attempts == 0 {
            return Err(CollectError::Config(
                "max_connect_attempts must be at least 1".to_string(),
            ));
        }
        if self.chunk_size_override == Some(0) {
            return Err(CollectError::Config(
                "chunk_size_override must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The chunk size to use for a recipe whose own default is `recipe_default`.
    pub fn effective_chunk_size(&self, recipe_default: usize) -> usize {
        self.chunk_size_override.unwrap_or(recipe_default)
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_file_depot() -> PathBuf {
    std::env::temp_dir()
}

fn default_max_connect_attempts() -> usize {
    5
}
