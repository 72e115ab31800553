//! Sensor projection: turns a fetched `Station` snapshot into the readouts
//! the service displays and serves.
//!
//! Every measure at a station becomes one `SensorReadout` (river level,
//! flow, ...). A station with a stage scale additionally gets a
//! `StatusReadout` carrying the High/Normal/Low classification and the
//! trend arrow; a station without one gets no status readout at all.
//!
//! Readouts are rebuilt from scratch on every poll — they are projections
//! of one immutable snapshot, never updated in place.

use crate::alert::status::{current_level, station_status, trend};
use crate::model::{LevelStatus, Station, Trend};

/// Public page for a station on the check-for-flooding service, linked as
/// a sensor attribute.
pub const STATION_URL_BASE: &str = "https://check-for-flooding.service.gov.uk/station";

// ---------------------------------------------------------------------------
// Readout types
// ---------------------------------------------------------------------------

/// One displayed value: a single measure's latest reading plus identity
/// and context attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReadout {
    /// Stable identity across polls: `{station_reference}_{measure @id}`.
    pub unique_id: String,
    /// Display name: `"{station label} {measure label}"`.
    pub name: String,
    /// Latest value, absent when the measure currently has no reading.
    pub value: Option<f64>,
    /// Reading timestamp (ISO 8601), where published.
    pub reading_time: Option<String>,
    pub unit: Option<String>,
    pub river: Option<String>,
    pub catchment: String,
    /// Public check-for-flooding page for the station.
    pub station_url: String,
}

/// The station-level High/Normal/Low readout. Only produced for stations
/// with a stage scale.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReadout {
    /// Stable identity across polls: `{station_reference}_status`.
    pub unique_id: String,
    /// Display name: `"{station label} River Status"`.
    pub name: String,
    pub status: LevelStatus,
    /// Direction of change since the previous poll, once two polls have
    /// seen a level.
    pub trend: Option<Trend>,
    pub typical_range_high: Option<f64>,
    pub typical_range_low: Option<f64>,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Builds one readout per measure, in measure order. Measures without an
/// `@id` are skipped: they cannot be identified across fetches, so they
/// cannot back a stable sensor.
pub fn project_sensors(station: &Station) -> Vec<SensorReadout> {
    let station_url = format!("{}/{}", STATION_URL_BASE, station.station_reference);

    station
        .measures
        .iter()
        .filter_map(|measure| {
            let measure_id = measure.id.as_deref()?;
            Some(SensorReadout {
                unique_id: format!("{}_{}", station.station_reference, measure_id),
                name: format!("{} {}", station.display_label(), measure.label()),
                value: measure.latest_reading.as_ref().map(|r| r.value),
                reading_time: measure
                    .latest_reading
                    .as_ref()
                    .and_then(|r| r.date_time.clone()),
                unit: measure.unit_name.clone(),
                river: station.river_name.clone(),
                catchment: station.display_catchment().to_string(),
                station_url: station_url.clone(),
            })
        })
        .collect()
}

/// Builds the status readout, classifying the current level against the
/// station's stage scale and comparing it with `previous_level` from the
/// prior poll for the trend arrow. Returns `None` for stations without a
/// stage scale.
pub fn project_status(station: &Station, previous_level: Option<f64>) -> Option<StatusReadout> {
    let scale = station.stage_scale.as_ref()?;
    let status = station_status(station)?;
    let level_trend = current_level(station).and_then(|level| trend(previous_level, level));

    Some(StatusReadout {
        unique_id: format!("{}_status", station.station_reference),
        name: format!("{} River Status", station.display_label()),
        status,
        trend: level_trend,
        typical_range_high: scale.typical_range_high,
        typical_range_low: scale.typical_range_low,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
