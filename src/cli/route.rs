//! Simulated walking routes

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};

/// One simulated device position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Ordered positions replayed by `simulate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    pub points: Vec<RoutePoint>,
}

impl Route {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::Route(format!("failed to read {}: {}", path.display(), e)))?;
        let route: Route = serde_json::from_str(&content)
            .map_err(|e| CliError::Route(format!("invalid route JSON: {}", e)))?;

        if let Some(i) = route.points.iter().position(|p| {
            !(-90.0..=90.0).contains(&p.latitude) || !(-180.0..=180.0).contains(&p.longitude)
        }) {
            return Err(CliError::Route(format!("point {} is out of range", i)));
        }

        Ok(route)
    }
}
