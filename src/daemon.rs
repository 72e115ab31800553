//! Core daemon implementation for the EA flood monitoring service
//!
//! This module implements the main daemon loop that:
//! 1. Loads the station registry on startup
//! 2. Polls the EA API for every configured station, in parallel
//! 3. Projects each fresh station snapshot into the monitoring cache
//! 4. Flags stale readings and repeated poll failures
//!
//! A failed poll is logged and recorded, never fatal: the previous
//! snapshot stays on display and the next scheduled poll supersedes it.
//! There is no retry inside a sweep.

use chrono::Utc;
use std::collections::HashMap;
use std::error::Error;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use threadpool::ThreadPool;

use crate::config::{self, StationConfig};
use crate::ingest::eafm;
use crate::logging::{self, DataSource};
use crate::model::{EafmError, Station};
use crate::monitor::MonitoringCache;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Daemon configuration
pub struct DaemonConfig {
    /// How often to poll the EA API (default: 15 minutes to match the
    /// gauges' reporting frequency)
    pub poll_interval_minutes: u64,

    /// Maximum age of a reading before the station is flagged stale
    /// (default: 60 minutes, four missed gauge updates)
    pub staleness_threshold_minutes: u64,

    /// Worker threads for parallel polling. Each station has at most one
    /// outstanding request at a time regardless of this setting.
    pub max_parallel_polls: usize,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            poll_interval_minutes: 15,
            staleness_threshold_minutes: 60,
            max_parallel_polls: 4,
        }
    }
}

/// Outcome of one poll sweep across all configured stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    pub stations_updated: usize,
    pub stations_failed: usize,
    /// Total sensor readouts refreshed across updated stations.
    pub sensors_updated: usize,
}

// ---------------------------------------------------------------------------
// Daemon State
// ---------------------------------------------------------------------------

/// Main daemon state
pub struct Daemon {
    config: DaemonConfig,
    stations: Vec<StationConfig>,
    base_url: String,
    http: Option<reqwest::blocking::Client>,
    cache: Arc<Mutex<MonitoringCache>>,
}

impl Daemon {
    /// Create a new daemon instance with default configuration
    pub fn new() -> Self {
        Self::with_config(DaemonConfig::default())
    }

    /// Create daemon with custom configuration
    pub fn with_config(config: DaemonConfig) -> Self {
        Self {
            config,
            stations: Vec::new(),
            base_url: eafm::EAFM_BASE_URL.to_string(),
            http: None,
            cache: Arc::new(Mutex::new(MonitoringCache::new())),
        }
    }

    /// Initialize daemon: load the station registry and build the HTTP
    /// client. The `[service]` settings in stations.toml override the
    /// in-code defaults; `EAFM_BASE_URL` (via .env) overrides the API root.
    pub fn initialize(&mut self) -> Result<(), Box<dyn Error>> {
        dotenv::dotenv().ok();

        let registry = config::load_config();
        self.config.poll_interval_minutes = registry.service.poll_interval_minutes;
        self.config.staleness_threshold_minutes = registry.service.staleness_threshold_minutes;
        self.stations = registry.stations;

        if self.stations.is_empty() {
            return Err("No stations configured in stations.toml".into());
        }

        self.base_url = config::base_url();

        // Timeouts live at the HTTP client; the poll loop never waits on a
        // request beyond this.
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        self.http = Some(http);

        Ok(())
    }

    pub fn get_stations(&self) -> &[StationConfig] {
        &self.stations
    }

    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    /// Handle to the monitoring cache, shared with the HTTP endpoint.
    pub fn cache(&self) -> Arc<Mutex<MonitoringCache>> {
        Arc::clone(&self.cache)
    }

    /// Poll a single station for a fresh snapshot.
    pub fn poll_station(&self, reference: &str) -> Result<Station, Box<dyn Error>> {
        let http = self.http.as_ref().ok_or("Daemon not initialized")?;

        match eafm::fetch_station(http, &self.base_url, reference)? {
            Some(station) => Ok(station),
            None => Err(Box::new(EafmError::StationNotFound(reference.to_string()))),
        }
    }

    /// Run one sweep: fetch every configured station in parallel and fold
    /// the results into the monitoring cache. Returns per-station sensor
    /// counts (zero for failed stations).
    pub fn poll_all_stations(&self) -> Result<HashMap<String, usize>, Box<dyn Error>> {
        let http = self.http.as_ref().ok_or("Daemon not initialized")?.clone();

        let pool = ThreadPool::new(self.config.max_parallel_polls.max(1));
        let (tx, rx) = mpsc::channel();

        for station in &self.stations {
            let tx = tx.clone();
            let http = http.clone();
            let base_url = self.base_url.clone();
            let reference = station.reference.clone();
            pool.execute(move || {
                let result = eafm::fetch_station(&http, &base_url, &reference);
                // The receiver only hangs up when the daemon is going away.
                let _ = tx.send((reference, result));
            });
        }
        drop(tx);

        let mut results = HashMap::new();

        for (reference, result) in rx {
            let now = Utc::now();
            match result {
                Ok(Some(station)) => {
                    let count = self.cache.lock().unwrap().record_success(&station, now);
                    results.insert(reference, count);
                }
                Ok(None) => {
                    let err = EafmError::StationNotFound(reference.clone());
                    logging::log_poll_failure(&reference, "Station poll", &err);
                    self.cache.lock().unwrap().record_failure(&reference, now);
                    results.insert(reference, 0);
                }
                Err(err) => {
                    logging::log_poll_failure(&reference, "Station poll", &err);
                    self.cache.lock().unwrap().record_failure(&reference, now);
                    results.insert(reference, 0);
                }
            }
        }

        Ok(results)
    }

    /// Summarize a sweep's per-station counts.
    fn summarize(&self, results: &HashMap<String, usize>) -> SweepSummary {
        let cache = self.cache.lock().unwrap();
        let mut summary = SweepSummary {
            stations_updated: 0,
            stations_failed: 0,
            sensors_updated: 0,
        };

        for (reference, count) in results {
            // A station counts as updated when this sweep reset its
            // failure counter, not merely when it produced sensors — a
            // station can legitimately have zero identifiable measures.
            let failed = cache
                .get(reference)
                .map(|s| s.consecutive_failures > 0)
                .unwrap_or(true);
            if failed {
                summary.stations_failed += 1;
            } else {
                summary.stations_updated += 1;
                summary.sensors_updated += count;
            }
        }

        summary
    }

    /// Main daemon loop (runs indefinitely)
    pub fn run(&self) -> Result<(), Box<dyn Error>> {
        logging::info(
            DataSource::System,
            None,
            &format!(
                "Polling {} stations every {} minutes",
                self.stations.len(),
                self.config.poll_interval_minutes
            ),
        );

        loop {
            let start = Utc::now();

            match self.poll_all_stations() {
                Ok(results) => {
                    let summary = self.summarize(&results);
                    logging::log_poll_summary(
                        results.len(),
                        summary.stations_updated,
                        summary.stations_failed,
                    );

                    let stale = self
                        .cache
                        .lock()
                        .unwrap()
                        .stale_stations(self.config.staleness_threshold_minutes, Utc::now());
                    for (reference, age_minutes) in stale {
                        logging::warn(
                            DataSource::Eafm,
                            Some(&reference),
                            &format!("latest reading is {} minutes old", age_minutes),
                        );
                    }
                }
                Err(e) => {
                    logging::error(DataSource::System, None, &format!("Poll sweep error: {}", e));
                }
            }

            // Sleep until the next poll interval
            let elapsed = (Utc::now() - start).num_seconds();
            let sleep_seconds = (self.config.poll_interval_minutes * 60) as i64 - elapsed;

            if sleep_seconds > 0 {
                std::thread::sleep(Duration::from_secs(sleep_seconds as u64));
            }
        }
    }
}

impl Default for Daemon {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
