//! CLI module for geohunt
//!
//! Provides command-line interface for:
//! - status: Show persisted progress and the current target
//! - reset: Restart the hunt from the first landmark
//! - simulate: Walk a route against the simulated backend

mod args;
mod commands;
mod config;
mod errors;
mod io;
mod route;

pub use args::{Cli, Command};
pub use commands::{reset, run, run_command, simulate, status};
pub use config::{ConfigError, ConfigResult, HuntConfig};
pub use errors::{CliError, CliResult};
pub use io::write_response;
pub use route::{Route, RoutePoint};
