//! CLI command implementations
//!
//! Each command loads the config, installs logging, recovers durable
//! progress and prints one JSON object. Nothing here decides hunt
//! semantics; that belongs to `hunt::RegionStateMachine`.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::Level;

use crate::catalog::LandmarkCatalog;
use crate::hunt::{
    pump_pending, HuntError, LocationGate, PumpSummary, RegionStateMachine, StaticGate,
};
use crate::monitor::{PendingHandle, RegionMonitorPort, SimulatedMonitor};
use crate::notification::LogNotifier;
use crate::progress::{FileProgressStore, ProgressState, ProgressStore};

use super::args::Command;
use super::config::HuntConfig;
use super::errors::{CliError, CliResult};
use super::io::write_response;
use super::route::Route;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let report = match cmd {
        Command::Status { config } => status(&config)?,
        Command::Reset { config } => reset(&config)?,
        Command::Simulate { config, route } => simulate(&config, &route)?,
    };
    write_response(report)
}

fn init_tracing(level: Level) {
    // A second install (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn boot(config_path: &Path) -> CliResult<HuntConfig> {
    let config = HuntConfig::load(config_path)?;
    init_tracing(config.level()?);
    Ok(config)
}

/// Report persisted progress against the catalog.
pub fn status(config_path: &Path) -> CliResult<Value> {
    let config = boot(config_path)?;
    let catalog = LandmarkCatalog::load(config.catalog_path())?;
    let store = FileProgressStore::new(config.data_path());
    let progress = store.load()?;

    if progress.next_index > catalog.len() {
        return Err(HuntError::InvalidProgress {
            next_index: progress.next_index,
            landmark_count: catalog.len(),
        }
        .into());
    }

    let target = catalog.get(progress.next_index).map(|l| {
        json!({
            "id": l.id,
            "latitude": l.latitude,
            "longitude": l.longitude,
            "radius_meters": l.radius_meters,
        })
    });

    Ok(json!({
        "landmark_count": catalog.len(),
        "next_index": progress.next_index,
        "active_region_id": progress.active_region_id,
        "complete": progress.is_complete(catalog.len()),
        "current_target": target,
    }))
}

/// Durably restart the hunt from the first landmark.
pub fn reset(config_path: &Path) -> CliResult<Value> {
    let config = boot(config_path)?;
    let store = FileProgressStore::new(config.data_path());
    let previous = store.load().ok();

    store.save(&ProgressState::default())?;
    tracing::info!(
        previous_next_index = ?previous.map(|p| p.next_index),
        path = %store.path().display(),
        "progress reset"
    );

    Ok(json!({ "next_index": 0 }))
}

/// Walk `route` against a simulated backend, persisting real progress.
pub fn simulate(config_path: &Path, route_path: &Path) -> CliResult<Value> {
    let config = boot(config_path)?;
    let catalog = LandmarkCatalog::load(config.catalog_path())?;
    let route = Route::load(route_path)?;
    let store = Arc::new(FileProgressStore::new(config.data_path()));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Runtime(format!("failed to create tokio runtime: {}", e)))?;

    rt.block_on(run_simulation(catalog, config.handle(), store, &route))
}

async fn run_simulation(
    catalog: LandmarkCatalog,
    handle: PendingHandle,
    store: Arc<dyn ProgressStore>,
    route: &Route,
) -> CliResult<Value> {
    let monitor = Arc::new(SimulatedMonitor::new());
    let mut events = monitor.subscribe();
    let machine = RegionStateMachine::recover(
        catalog,
        handle,
        monitor.clone(),
        Arc::new(LogNotifier),
        store,
    )?;

    let started_at = machine.progress().next_index;
    let gate = StaticGate::open();
    let mut summary = PumpSummary::default();

    for point in &route.points {
        retry_activation(&machine, &gate).await;
        if machine.is_complete() {
            break;
        }

        monitor.move_to(point.latitude, point.longitude);
        summary.merge(pump_pending(&machine, &mut events).await);
    }
    summary.merge(pump_pending(&machine, &mut events).await);

    if !machine.is_complete() {
        machine.deactivate_all().await?;
    }

    let progress = machine.progress();
    Ok(json!({
        "route_points": route.points.len(),
        "landmark_count": machine.catalog().len(),
        "started_at": started_at,
        "next_index": progress.next_index,
        "found": summary.advanced,
        "discarded": summary.discarded,
        "failed": summary.failed,
        "complete": machine.is_complete(),
    }))
}

/// Activation failures leave the machine Idle; the next position retries.
async fn retry_activation(machine: &RegionStateMachine, gate: &dyn LocationGate) {
    if let Err(e) = machine.ensure_active(gate).await {
        tracing::warn!(error = %e, class = e.class().as_str(), "activation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::super::config::ConfigError;
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir) -> PathBuf {
        let config_path = temp_dir.path().join("geohunt.json");
        let catalog_path = temp_dir.path().join("landmarks.json");
        let data_dir = temp_dir.path().join("data");

        let catalog = json!({
            "landmarks": [
                {"id": "a", "latitude": 10.0, "longitude": 10.0, "radius_meters": 50.0},
                {"id": "b", "latitude": 10.01, "longitude": 10.0, "radius_meters": 50.0},
            ]
        });
        fs::write(&catalog_path, catalog.to_string()).unwrap();

        let config = json!({
            "data_dir": data_dir.to_string_lossy(),
            "catalog_path": catalog_path.to_string_lossy(),
        });
        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    fn write_route(temp_dir: &TempDir, points: Value) -> PathBuf {
        let path = temp_dir.path().join("route.json");
        fs::write(&path, json!({ "points": points }).to_string()).unwrap();
        path
    }

    #[test]
    fn test_status_on_fresh_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let report = status(&config_path).unwrap();

        assert_eq!(report["landmark_count"], 2);
        assert_eq!(report["next_index"], 0);
        assert_eq!(report["complete"], false);
        assert_eq!(report["current_target"]["id"], "a");
    }

    #[test]
    fn test_simulate_completes_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);
        let route = write_route(
            &temp_dir,
            json!([
                {"latitude": 0.0, "longitude": 0.0},
                {"latitude": 10.0, "longitude": 10.0},
                {"latitude": 10.01, "longitude": 10.0},
            ]),
        );

        let report = simulate(&config_path, &route).unwrap();
        assert_eq!(report["found"], 2);
        assert_eq!(report["complete"], true);

        let after = status(&config_path).unwrap();
        assert_eq!(after["next_index"], 2);
        assert_eq!(after["current_target"], Value::Null);
    }

    #[test]
    fn test_simulate_partial_route_resumes_later() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        // Visiting b first finds nothing; only a is watched.
        let first = write_route(
            &temp_dir,
            json!([{"latitude": 10.01, "longitude": 10.0}, {"latitude": 10.0, "longitude": 10.0}]),
        );
        let report = simulate(&config_path, &first).unwrap();
        assert_eq!(report["found"], 1);
        assert_eq!(report["complete"], false);

        let after = status(&config_path).unwrap();
        assert_eq!(after["next_index"], 1);
        assert_eq!(after["active_region_id"], Value::Null);

        let second = write_route(&temp_dir, json!([{"latitude": 10.01, "longitude": 10.0}]));
        let report = simulate(&config_path, &second).unwrap();
        assert_eq!(report["started_at"], 1);
        assert_eq!(report["complete"], true);
    }

    #[test]
    fn test_reset_restarts_hunt() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);
        let route = write_route(&temp_dir, json!([{"latitude": 10.0, "longitude": 10.0}]));
        simulate(&config_path, &route).unwrap();

        reset(&config_path).unwrap();

        let after = status(&config_path).unwrap();
        assert_eq!(after["next_index"], 0);
        assert_eq!(after["current_target"]["id"], "a");
    }

    #[test]
    fn test_missing_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();

        let err = status(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::Read { .. })));
        assert_eq!(err.code(), "GEOHUNT_CLI_CONFIG_ERROR");
    }
}
