//! CLI-specific error types
//!
//! Every CLI error is fatal: it is printed to stderr and the process exits 1.

use std::io;

use thiserror::Error;

use super::config::ConfigError;
use crate::catalog::CatalogError;
use crate::hunt::HuntError;
use crate::progress::ProgressError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("progress: {0}")]
    Progress(#[from] ProgressError),

    #[error("hunt: {0}")]
    Hunt(#[from] HuntError),

    #[error("route: {0}")]
    Route(String),

    #[error("runtime: {0}")]
    Runtime(String),

    #[error("I/O: {0}")]
    Io(#[from] io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "GEOHUNT_CLI_CONFIG_ERROR",
            Self::Catalog(_) => "GEOHUNT_CLI_CATALOG_ERROR",
            Self::Progress(_) => "GEOHUNT_CLI_PROGRESS_ERROR",
            Self::Hunt(_) => "GEOHUNT_CLI_HUNT_ERROR",
            Self::Route(_) => "GEOHUNT_CLI_ROUTE_ERROR",
            Self::Runtime(_) => "GEOHUNT_CLI_RUNTIME_ERROR",
            Self::Io(_) | Self::Json(_) => "GEOHUNT_CLI_IO_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
