//! HTTP endpoint for querying current monitoring state
//!
//! Provides a small read-only REST API over the in-memory monitoring
//! cache, for dashboards and external tooling.
//!
//! Endpoints:
//! - GET /health - Service health check
//! - GET /stations - Summary of every monitored station
//! - GET /station/{reference} - Full snapshot for one station

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::logging::{self, DataSource};
use crate::monitor::{MonitoringCache, StationSnapshot};

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// One row of the /stations listing.
#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub reference: String,
    pub label: String,
    /// "High" / "Normal" / "Low" / "Unknown", or null for stations that do
    /// not offer classification.
    pub status: Option<String>,
    pub level: Option<f64>,
    pub staleness_minutes: Option<i64>,
    pub consecutive_failures: u32,
}

/// Full station snapshot for /station/{reference}.
#[derive(Debug, Serialize)]
pub struct StationDetail {
    pub reference: String,
    pub label: String,
    pub sensors: Vec<SensorData>,
    pub status: Option<StatusData>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub latest_reading_time: Option<DateTime<Utc>>,
    pub staleness_minutes: Option<i64>,
    pub consecutive_failures: u32,
}

#[derive(Debug, Serialize)]
pub struct SensorData {
    pub unique_id: String,
    pub name: String,
    pub value: Option<f64>,
    pub reading_time: Option<String>,
    pub unit: Option<String>,
    pub river: Option<String>,
    pub catchment: String,
    pub station_url: String,
}

#[derive(Debug, Serialize)]
pub struct StatusData {
    pub unique_id: String,
    pub name: String,
    pub status: String,
    pub trend: Option<String>,
    pub typical_range_high: Option<f64>,
    pub typical_range_low: Option<f64>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn snapshot_to_summary(snapshot: &StationSnapshot, now: DateTime<Utc>) -> StationSummary {
    StationSummary {
        reference: snapshot.reference.clone(),
        label: snapshot.label.clone(),
        status: snapshot.status.as_ref().map(|s| s.status.to_string()),
        level: snapshot.current_level,
        staleness_minutes: snapshot.staleness_minutes(now),
        consecutive_failures: snapshot.consecutive_failures,
    }
}

fn snapshot_to_detail(snapshot: &StationSnapshot, now: DateTime<Utc>) -> StationDetail {
    StationDetail {
        reference: snapshot.reference.clone(),
        label: snapshot.label.clone(),
        sensors: snapshot
            .sensors
            .iter()
            .map(|s| SensorData {
                unique_id: s.unique_id.clone(),
                name: s.name.clone(),
                value: s.value,
                reading_time: s.reading_time.clone(),
                unit: s.unit.clone(),
                river: s.river.clone(),
                catchment: s.catchment.clone(),
                station_url: s.station_url.clone(),
            })
            .collect(),
        status: snapshot.status.as_ref().map(|s| StatusData {
            unique_id: s.unique_id.clone(),
            name: s.name.clone(),
            status: s.status.to_string(),
            trend: s.trend.map(|t| t.to_string()),
            typical_range_high: s.typical_range_high,
            typical_range_low: s.typical_range_low,
        }),
        fetched_at: snapshot.fetched_at,
        latest_reading_time: snapshot.latest_reading_time,
        staleness_minutes: snapshot.staleness_minutes(now),
        consecutive_failures: snapshot.consecutive_failures,
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port. Blocks the calling
/// thread; the daemon spawns this in the background.
pub fn start_endpoint_server(
    port: u16,
    cache: Arc<Mutex<MonitoringCache>>,
) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    logging::info(
        DataSource::Endpoint,
        None,
        &format!("endpoint listening on http://0.0.0.0:{}", port),
    );

    for request in server.incoming_requests() {
        let url = request.url().to_string();

        let response = if url == "/health" {
            handle_health()
        } else if url == "/stations" {
            handle_stations(&cache)
        } else if let Some(reference) = url.strip_prefix("/station/") {
            handle_station_query(&cache, reference)
        } else {
            create_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": ["/health", "/stations", "/station/{reference}"]
                }),
            )
        };

        if let Err(e) = request.respond(response) {
            logging::warn(
                DataSource::Endpoint,
                None,
                &format!("Failed to send response: {}", e),
            );
        }
    }

    Ok(())
}

/// Handle /health endpoint
fn handle_health() -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    create_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": "eafm_service",
            "version": env!("CARGO_PKG_VERSION")
        }),
    )
}

/// Handle /stations endpoint
fn handle_stations(
    cache: &Arc<Mutex<MonitoringCache>>,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let now = Utc::now();
    let cache = cache.lock().unwrap();
    let summaries: Vec<StationSummary> = cache
        .snapshots()
        .into_iter()
        .map(|s| snapshot_to_summary(s, now))
        .collect();

    match serde_json::to_value(&summaries) {
        Ok(json) => create_response(200, json),
        Err(e) => create_response(
            500,
            serde_json::json!({ "error": format!("Serialization failed: {}", e) }),
        ),
    }
}

/// Handle /station/{reference} endpoint
fn handle_station_query(
    cache: &Arc<Mutex<MonitoringCache>>,
    reference: &str,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let now = Utc::now();
    let cache = cache.lock().unwrap();

    match cache.get(reference) {
        Some(snapshot) => match serde_json::to_value(snapshot_to_detail(snapshot, now)) {
            Ok(json) => create_response(200, json),
            Err(e) => create_response(
                500,
                serde_json::json!({ "error": format!("Serialization failed: {}", e) }),
            ),
        },
        None => create_response(
            404,
            serde_json::json!({
                "error": "Station is not monitored",
                "reference": reference
            }),
        ),
    }
}

/// Create HTTP response with JSON body
fn create_response(
    status_code: u16,
    json: serde_json::Value,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string());
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Measure, Reading, StageScale, Station};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap()
    }

    fn populated_cache() -> MonitoringCache {
        let station = Station {
            station_reference: "3400TH".to_string(),
            label: Some("Kingston".to_string()),
            catchment_name: Some("Thames from Hurley to Teddington".to_string()),
            river_name: Some("River Thames".to_string()),
            rloi_id: Some("7267".to_string()),
            stage_scale: Some(StageScale {
                typical_range_high: Some(4.48),
                typical_range_low: Some(3.41),
                highest_recent: None,
            }),
            measures: vec![Measure {
                id: Some("measures/3400TH-level-stage".to_string()),
                parameter: Some("level".to_string()),
                qualifier: Some("Stage".to_string()),
                parameter_name: Some("Water Level".to_string()),
                unit_name: Some("mASD".to_string()),
                latest_reading: Some(Reading {
                    value: 3.96,
                    date_time: Some("2024-05-01T12:45:00Z".to_string()),
                }),
            }],
        };

        let mut cache = MonitoringCache::new();
        cache.record_success(&station, fixed_now());
        cache
    }

    #[test]
    fn test_snapshot_to_summary() {
        let cache = populated_cache();
        let summary = snapshot_to_summary(cache.get("3400TH").unwrap(), fixed_now());

        assert_eq!(summary.reference, "3400TH");
        assert_eq!(summary.label, "Kingston");
        assert_eq!(summary.status.as_deref(), Some("Normal"));
        assert_eq!(summary.level, Some(3.96));
        assert_eq!(summary.staleness_minutes, Some(15));
        assert_eq!(summary.consecutive_failures, 0);
    }

    #[test]
    fn test_snapshot_to_detail_serializes() {
        let cache = populated_cache();
        let detail = snapshot_to_detail(cache.get("3400TH").unwrap(), fixed_now());
        let json = serde_json::to_value(&detail).expect("detail should serialize");

        assert_eq!(json["reference"], "3400TH");
        assert_eq!(json["sensors"][0]["name"], "Kingston Stage");
        assert_eq!(json["sensors"][0]["value"], 3.96);
        assert_eq!(json["status"]["status"], "Normal");
        assert_eq!(json["status"]["typical_range_high"], 4.48);
    }
}
