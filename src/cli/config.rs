//! Configuration file handling
//!
//! ```json
//! {
//!   "data_dir": "./hunt-data",
//!   "catalog_path": "./landmarks.json",
//!   "monitor_handle": "geohunt-landmarks",
//!   "log_level": "info"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

use crate::monitor::PendingHandle;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("invalid config JSON: {0}")]
    Malformed(String),

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid log_level '{0}'; expected one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Hunt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntConfig {
    /// Directory holding `metadata/progress.json`
    pub data_dir: String,

    /// Landmark catalog JSON file
    pub catalog_path: String,

    /// Backend handle under which the active region is registered
    #[serde(default = "default_monitor_handle")]
    pub monitor_handle: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_monitor_handle() -> String {
    "geohunt-landmarks".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl HuntConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: HuntConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("data_dir", &self.data_dir),
            ("catalog_path", &self.catalog_path),
            ("monitor_handle", &self.monitor_handle),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField { field });
            }
        }

        self.level()?;
        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn catalog_path(&self) -> &Path {
        Path::new(&self.catalog_path)
    }

    pub fn handle(&self) -> PendingHandle {
        PendingHandle::new(self.monitor_handle.clone())
    }

    pub fn level(&self) -> ConfigResult<Level> {
        Level::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}
