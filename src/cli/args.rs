//! CLI argument definitions using clap
//!
//! Commands:
//! - geohunt status --config <path>
//! - geohunt reset --config <path>
//! - geohunt simulate --config <path> --route <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// geohunt - walk a landmark catalog one geofence at a time
#[derive(Parser, Debug)]
#[command(name = "geohunt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show hunt progress and the current target landmark
    Status {
        /// Path to configuration file
        #[arg(long, default_value = "./geohunt.json")]
        config: PathBuf,
    },

    /// Forget all progress and start over from the first landmark
    Reset {
        /// Path to configuration file
        #[arg(long, default_value = "./geohunt.json")]
        config: PathBuf,
    },

    /// Replay a route of positions against the simulated backend
    Simulate {
        /// Path to configuration file
        #[arg(long, default_value = "./geohunt.json")]
        config: PathBuf,

        /// Path to a route file: {"points": [{"latitude": .., "longitude": ..}]}
        #[arg(long)]
        route: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_requires_route() {
        assert!(Cli::try_parse_from(["geohunt", "simulate"]).is_err());

        let cli = Cli::try_parse_from(["geohunt", "simulate", "--route", "walk.json"]).unwrap();
        match cli.command {
            Command::Simulate { config, route } => {
                assert_eq!(config, PathBuf::from("./geohunt.json"));
                assert_eq!(route, PathBuf::from("walk.json"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
