//! Station registry configuration loader - parses stations.toml
//!
//! Separates the monitored-station list from code, making it easy to add
//! stations or adjust the poll cadence without recompiling the service.
//! Station metadata (labels, rivers, measures, typical ranges) is NOT
//! configured here — it all comes from the API at poll time, so a station
//! reference is the only required field.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;

use crate::ingest::eafm::EAFM_BASE_URL;

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

/// One monitored station from stations.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    /// EA station reference, e.g. "3400TH".
    pub reference: String,
    /// Free-text operator note; not used by the service itself.
    #[serde(default)]
    pub description: Option<String>,
}

/// Service-wide settings from the `[service]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// How often to poll the API. EA gauges report every 15 minutes, so
    /// polling faster than that only re-reads the same values.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_minutes: u64,
    /// Maximum reading age before a station is flagged stale.
    #[serde(default = "default_staleness_threshold")]
    pub staleness_threshold_minutes: u64,
}

fn default_poll_interval() -> u64 {
    15
}

fn default_staleness_threshold() -> u64 {
    60
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            poll_interval_minutes: default_poll_interval(),
            staleness_threshold_minutes: default_staleness_threshold(),
        }
    }
}

/// Root configuration structure for TOML parsing.
#[derive(Debug, Deserialize)]
struct StationRegistry {
    #[serde(default)]
    service: Option<ServiceConfig>,
    station: Vec<StationConfig>,
}

/// Parsed stations.toml.
#[derive(Debug, Clone)]
pub struct Registry {
    pub service: ServiceConfig,
    pub stations: Vec<StationConfig>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads the station registry from the stations.toml configuration file.
///
/// # Panics
/// Panics if the configuration file is missing, malformed, or contains
/// invalid data. This is intentional — the service cannot operate without
/// a valid station registry.
///
/// # File Location
/// Expects `stations.toml` in the current working directory (project root
/// when running via `cargo run`).
pub fn load_config() -> Registry {
    let config_path = "stations.toml";

    let contents = fs::read_to_string(config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path, e));

    let registry: StationRegistry = toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", config_path, e));

    Registry {
        service: registry.service.unwrap_or_default(),
        stations: registry.station,
    }
}

/// Loads the registry and builds a lookup map keyed by station reference.
pub fn load_config_map() -> HashMap<String, StationConfig> {
    load_config()
        .stations
        .into_iter()
        .map(|s| (s.reference.clone(), s))
        .collect()
}

/// API base URL: the `EAFM_BASE_URL` environment variable when set
/// (typically via .env, pointing tests at a stub server), the production
/// endpoint otherwise.
pub fn base_url() -> String {
    env::var("EAFM_BASE_URL").unwrap_or_else(|_| EAFM_BASE_URL.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
