//! CLI command implementations
//!
//! `serve` follows a fixed boot order: configuration, logging, store and
//! seed data, runtime, then the listener.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::auth::TokenManager;
use crate::config::AppConfig;
use crate::http_server::{AppState, HttpServer};
use crate::observability::init_logging;
use crate::store::{load_seed_file, InMemoryStore, InventoryResponder};

use super::args::Command;
use super::errors::{CliError, CliResult};

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
    match cmd {
        Command::Serve { config, port, seed } => {
            let mut config = AppConfig::load(config.as_deref())?;
            apply_overrides(&mut config, port, seed);
            serve(config)
        }
        Command::PrintConfig { config } => {
            let config = AppConfig::load(config.as_deref())?;
            print_config(&config)
        }
    }
}

fn apply_overrides(config: &mut AppConfig, port: Option<u16>, seed: Option<PathBuf>) {
    if let Some(port) = port {
        config.http.port = port;
    }
    if seed.is_some() {
        config.store.seed_path = seed;
    }
}

/// Build the in-memory store and load its seed file, if any
pub fn build_store(config: &AppConfig) -> CliResult<InMemoryStore> {
    let store = InMemoryStore::new()
        .with_latency(config.store.latency())
        .with_responder(InventoryResponder);

    if let Some(path) = &config.store.seed_path {
        let loaded = load_seed_file(&store, path)?;
        info!(path = %path.display(), documents = loaded, "seed data loaded");
    }

    Ok(store)
}

/// Wire the store into the state shared by every route
pub fn build_state(config: &AppConfig, store: InMemoryStore) -> AppState {
    let state = AppState::new(Arc::new(store), TokenManager::new(config.auth.token_config()))
        .with_fan_out(config.orchestration.fan_out)
        .with_pretty(config.http.pretty_responses);

    match config.orchestration.op_timeout() {
        Some(timeout) => state.with_op_timeout(timeout),
        None => state,
    }
}

/// Serve the HTTP API until the listener fails
pub fn serve(config: AppConfig) -> CliResult<()> {
    init_logging(&config.logging)?;

    let store = build_store(&config)?;
    let state = build_state(&config, store);
    let server = HttpServer::new(config.http.clone(), state);

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(workers) = config.http.workers {
        builder.worker_threads(workers);
    }
    let rt = builder
        .build()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    info!(
        fan_out = ?config.orchestration.fan_out,
        op_timeout_ms = config.orchestration.op_timeout_ms,
        "starting travel gateway"
    );

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the effective configuration
pub fn print_config(config: &AppConfig) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use std::fs;
    use std::time::Duration;

    use serde_json::json;
    use tempfile::TempDir;

    use crate::orchestrator::FanOutMode;
    use crate::store::DocLocation;

    fn write_seed(temp_dir: &TempDir) -> PathBuf {
        let path = temp_dir.path().join("seed.json");
        let seed = json!({
            "inventory": {
                "airport": {
                    "airport_3484": {"faa": "LAX", "icao": "KLAX", "airportname": "Los Angeles Intl"}
                }
            }
        });
        fs::write(&path, seed.to_string()).unwrap();
        path
    }

    #[test]
    fn test_overrides_win() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, Some(9191), Some(PathBuf::from("seed.json")));
        assert_eq!(config.http.port, 9191);
        assert_eq!(config.store.seed_path, Some(PathBuf::from("seed.json")));

        apply_overrides(&mut config, None, None);
        assert_eq!(config.store.seed_path, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn test_build_store_loads_seed() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.store.seed_path = Some(write_seed(&temp_dir));

        let store = build_store(&config).unwrap();
        let doc = store
            .document(&DocLocation::new("inventory", "airport", "airport_3484"))
            .unwrap();
        assert_eq!(doc["faa"], "LAX");
    }

    #[test]
    fn test_missing_seed_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.store.seed_path = Some(temp_dir.path().join("absent.json"));

        let Err(err) = build_store(&config) else {
            panic!("expected a seed error");
        };
        assert_eq!(err.code(), &CliErrorCode::SeedError);
    }

    #[test]
    fn test_build_state_carries_orchestration() {
        let mut config = AppConfig::default();
        config.orchestration.fan_out = FanOutMode::Parallel;
        config.orchestration.op_timeout_ms = 250;

        let state = build_state(&config, InMemoryStore::new());
        assert_eq!(state.fan_out(), FanOutMode::Parallel);
        assert_eq!(state.op_timeout(), Some(Duration::from_millis(250)));
    }
}
