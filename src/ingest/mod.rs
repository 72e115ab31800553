//! Data ingestion from the EA Flood Monitoring API.
//!
//! Submodules:
//! - `eafm` — URL construction, defensive JSON parsing, and fetch functions.
//! - `fixtures` (test only) — representative API response payloads.

pub mod eafm;
pub(crate) mod fixtures;
