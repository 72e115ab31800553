//! eafm_service: UK Environment Agency river gauge monitoring service.
//!
//! # Module structure
//!
//! ```text
//! eafm_service
//! ├── model       — shared data types (Station, Measure, LevelStatus, EafmError, …)
//! ├── config      — station registry configuration loader (stations.toml)
//! ├── logging     — structured logging with failure classification
//! ├── daemon      — main daemon loop (startup, parallel polling, staleness checks)
//! ├── endpoint    — read-only HTTP API over the monitoring cache
//! ├── ingest
//! │   └── eafm    — EA Flood Monitoring API: URL construction + defensive JSON parsing
//! │       fixtures (test only) — representative API response payloads
//! ├── monitor     — in-memory snapshot cache (current state per station)
//! ├── sensors     — projects a station snapshot into sensor/status readouts
//! └── alert
//!     ├── status    — High/Normal/Low classification + trend detection
//!     └── staleness — reading freshness checking
//! ```

pub mod alert;
pub mod config;
pub mod daemon;
pub mod endpoint;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod sensors;
