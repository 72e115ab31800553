//! EA Flood Monitoring API client.
//!
//! Handles URL construction and JSON response parsing for the Environment
//! Agency's public flood monitoring endpoints:
//!   https://environment.data.gov.uk/flood-monitoring/id/stations
//!
//! The API wraps payloads in an `items` envelope whose shape is not stable:
//! the station list returns an array, while the single-station endpoint
//! returns a bare object or a one-element array depending on server version,
//! and a station's `measures` field is an array, a single object, or absent.
//! The parsers in this module normalize all of those shapes. Valid JSON of
//! an unexpected shape never raises — it degrades to an empty station list,
//! an absent station, or empty measures. See `fixtures.rs` for annotated
//! examples of the observed payloads.

use crate::model::{EafmError, Measure, Reading, StageScale, Station};
use serde_json::Value;

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Production API root. Override with the `EAFM_BASE_URL` environment
/// variable to point the service at a stub server.
pub const EAFM_BASE_URL: &str = "https://environment.data.gov.uk/flood-monitoring";

/// Station lifecycle filter accepted by the stations list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationStatusFilter {
    Active,
    Closed,
    Suspended,
}

impl StationStatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationStatusFilter::Active => "Active",
            StationStatusFilter::Closed => "Closed",
            StationStatusFilter::Suspended => "Suspended",
        }
    }
}

/// Optional query filters for the stations list endpoint.
///
/// `Default` sets `status: Some(Active)` and everything else to `None`,
/// matching the service's default of only listing stations that are
/// currently reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct StationFilters {
    pub parameter_name: Option<String>,
    pub parameter: Option<String>,
    pub qualifier: Option<String>,
    pub label: Option<String>,
    pub town: Option<String>,
    pub river_name: Option<String>,
    pub station_reference: Option<String>,
    pub status: Option<StationStatusFilter>,
}

impl Default for StationFilters {
    fn default() -> Self {
        Self {
            parameter_name: None,
            parameter: None,
            qualifier: None,
            label: None,
            town: None,
            river_name: None,
            station_reference: None,
            status: Some(StationStatusFilter::Active),
        }
    }
}

impl StationFilters {
    /// A filter set with no constraints at all, including no status filter.
    pub fn none() -> Self {
        Self {
            status: None,
            ..Self::default()
        }
    }
}

/// Builds the stations list URL with the given filters. Filter values are
/// percent-encoded, so labels and town names containing spaces are safe.
pub fn build_stations_url(base_url: &str, filters: &StationFilters) -> String {
    let mut params: Vec<(&str, String)> = Vec::new();

    if let Some(v) = &filters.parameter_name {
        params.push(("parameterName", v.clone()));
    }
    if let Some(v) = &filters.parameter {
        params.push(("parameter", v.clone()));
    }
    if let Some(v) = &filters.qualifier {
        params.push(("qualifier", v.clone()));
    }
    if let Some(v) = &filters.label {
        params.push(("label", v.clone()));
    }
    if let Some(v) = &filters.town {
        params.push(("town", v.clone()));
    }
    if let Some(v) = &filters.river_name {
        params.push(("riverName", v.clone()));
    }
    if let Some(v) = &filters.station_reference {
        params.push(("stationReference", v.clone()));
    }
    if let Some(status) = filters.status {
        params.push(("status", status.as_str().to_string()));
    }

    if params.is_empty() {
        return format!("{}/id/stations", base_url);
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}/id/stations?{}", base_url, query)
}

/// Builds the single-station URL for the given station reference.
pub fn build_station_url(base_url: &str, station_reference: &str) -> String {
    format!("{}/id/stations/{}", base_url, station_reference)
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a stations list response body into stations, order preserved.
///
/// `items` absent, null, or not an array yields an empty list. Elements
/// that are not objects or carry no `stationReference` are skipped — a
/// station without a reference cannot be identified, configured, or
/// re-fetched.
///
/// # Errors
/// - `EafmError::ParseError` — the body is not valid JSON.
pub fn parse_stations_response(json: &str) -> Result<Vec<Station>, EafmError> {
    let root: Value = serde_json::from_str(json)
        .map_err(|e| EafmError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let stations = match root.get("items") {
        Some(Value::Array(items)) => items.iter().filter_map(station_from_value).collect(),
        _ => Vec::new(),
    };

    Ok(stations)
}

/// Parses a single-station response body.
///
/// Resolution order, first match wins:
/// 1. `items` is a non-empty array → its first element
/// 2. `items` is an object → that object
/// 3. the response root itself carries a `stationReference` → the root
/// 4. otherwise the station is unresolvable → `Ok(None)`
///
/// # Errors
/// - `EafmError::ParseError` — the body is not valid JSON.
pub fn parse_station_response(json: &str) -> Result<Option<Station>, EafmError> {
    let root: Value = serde_json::from_str(json)
        .map_err(|e| EafmError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let station = match root.get("items") {
        Some(Value::Array(items)) if !items.is_empty() => station_from_value(&items[0]),
        Some(items @ Value::Object(_)) => station_from_value(items),
        _ => {
            if root.get("stationReference").is_some() {
                station_from_value(&root)
            } else {
                None
            }
        }
    };

    Ok(station)
}

/// Builds a `Station` from a JSON value. Returns `None` for anything that
/// is not an object with a non-empty `stationReference`.
fn station_from_value(value: &Value) -> Option<Station> {
    if !value.is_object() {
        return None;
    }

    let station_reference = field_str(value, "stationReference").filter(|s| !s.is_empty())?;

    Some(Station {
        station_reference,
        label: field_str(value, "label"),
        catchment_name: field_str(value, "catchmentName"),
        river_name: field_str(value, "riverName"),
        rloi_id: field_str(value, "RLOIid"),
        stage_scale: stage_scale_from_value(value.get("stageScale")),
        measures: measures_from_value(value.get("measures")),
    })
}

/// Normalizes the `measures` field: an array yields one `Measure` per
/// object element, a single object yields a one-element vec, anything else
/// yields an empty vec.
fn measures_from_value(value: Option<&Value>) -> Vec<Measure> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(measure_from_value).collect(),
        Some(single @ Value::Object(_)) => measure_from_value(single).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn measure_from_value(value: &Value) -> Option<Measure> {
    if !value.is_object() {
        return None;
    }

    Some(Measure {
        id: field_str(value, "@id"),
        parameter: field_str(value, "parameter"),
        qualifier: field_str(value, "qualifier"),
        parameter_name: field_str(value, "parameterName"),
        unit_name: field_str(value, "unitName"),
        latest_reading: reading_from_value(value.get("latestReading")),
    })
}

fn stage_scale_from_value(value: Option<&Value>) -> Option<StageScale> {
    let scale = value?;
    if !scale.is_object() {
        return None;
    }

    Some(StageScale {
        typical_range_high: field_f64(scale, "typicalRangeHigh"),
        typical_range_low: field_f64(scale, "typicalRangeLow"),
        highest_recent: reading_from_value(scale.get("highestRecent")),
    })
}

/// A reading requires a numeric `value`; `dateTime` is optional. A reading
/// object without a numeric value is treated as no reading at all.
fn reading_from_value(value: Option<&Value>) -> Option<Reading> {
    let reading = value?;
    let measurement = field_f64(reading, "value")?;

    Some(Reading {
        value: measurement,
        date_time: field_str(reading, "dateTime"),
    })
}

/// String field access: absent, null, and non-string all yield `None`.
/// Numbers are stringified — `RLOIid` arrives as a JSON number on some
/// stations and as a string on others.
fn field_str(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric field access: absent, null, and non-numeric all yield `None`.
fn field_f64(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Fetches the filtered stations list.
///
/// # Errors
/// - `EafmError::RequestError` — connection-level failure.
/// - `EafmError::HttpError` — non-2xx response.
/// - `EafmError::ParseError` — body is not valid JSON.
pub fn fetch_stations(
    client: &reqwest::blocking::Client,
    base_url: &str,
    filters: &StationFilters,
) -> Result<Vec<Station>, EafmError> {
    let url = build_stations_url(base_url, filters);
    let body = fetch_body(client, &url)?;
    parse_stations_response(&body)
}

/// Fetches a single station by reference. `Ok(None)` means the response was
/// well-formed but did not resolve to a station.
pub fn fetch_station(
    client: &reqwest::blocking::Client,
    base_url: &str,
    station_reference: &str,
) -> Result<Option<Station>, EafmError> {
    let url = build_station_url(base_url, station_reference);
    let body = fetch_body(client, &url)?;
    parse_station_response(&body)
}

fn fetch_body(client: &reqwest::blocking::Client, url: &str) -> Result<String, EafmError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| EafmError::RequestError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(EafmError::HttpError(status.as_u16()));
    }

    response
        .text()
        .map_err(|e| EafmError::RequestError(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
