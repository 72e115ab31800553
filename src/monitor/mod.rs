//! In-memory monitoring state for the poll loop.
//!
//! One `StationSnapshot` per configured station, replaced wholesale on
//! every successful poll. A failed poll never clobbers displayed values:
//! it only bumps the failure counter and stamps the attempt time, leaving
//! the previous snapshot's readouts in place until the next successful
//! poll supersedes them.
//!
//! The cache is the single shared structure in the service — the daemon
//! writes it after each sweep and the HTTP endpoint reads it — so callers
//! hold it behind a `Mutex`. All methods take `now` explicitly to keep
//! tests deterministic.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::alert::staleness;
use crate::alert::status::current_level;
use crate::model::Station;
use crate::sensors::{self, SensorReadout, StatusReadout};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Current displayed state for one station.
#[derive(Debug, Clone)]
pub struct StationSnapshot {
    pub reference: String,
    pub label: String,
    pub sensors: Vec<SensorReadout>,
    /// Absent for stations without a stage scale.
    pub status: Option<StatusReadout>,
    /// Level value backing the trend comparison on the next poll.
    pub current_level: Option<f64>,
    /// When the last successful poll happened. `None` until a station has
    /// been fetched at least once.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Newest reading timestamp across the station's measures.
    pub latest_reading_time: Option<DateTime<Utc>>,
    pub last_poll_attempted: DateTime<Utc>,
    /// Reset to zero on every successful poll.
    pub consecutive_failures: u32,
}

impl StationSnapshot {
    /// Age of the newest reading in whole minutes, where one exists.
    pub fn staleness_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        self.latest_reading_time.map(|t| (now - t).num_minutes())
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// In-memory cache of station snapshots, keyed by station reference.
pub struct MonitoringCache {
    cache: HashMap<String, StationSnapshot>,
}

impl MonitoringCache {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Level value from the existing snapshot, used as the trend baseline
    /// when the next fetch for the same station lands.
    pub fn previous_level(&self, reference: &str) -> Option<f64> {
        self.cache.get(reference).and_then(|s| s.current_level)
    }

    /// Replaces the station's snapshot with one projected from a fresh
    /// fetch. Returns the number of sensor readouts in the new snapshot.
    pub fn record_success(&mut self, station: &Station, now: DateTime<Utc>) -> usize {
        let previous_level = self.previous_level(&station.station_reference);

        let readouts = sensors::project_sensors(station);
        let status = sensors::project_status(station, previous_level);
        let sensor_count = readouts.len();

        let latest_reading_time = station
            .measures
            .iter()
            .filter_map(|m| m.latest_reading.as_ref())
            .filter_map(|r| staleness::reading_time(r).ok())
            .max();

        let snapshot = StationSnapshot {
            reference: station.station_reference.clone(),
            label: station.display_label().to_string(),
            sensors: readouts,
            status,
            current_level: current_level(station),
            fetched_at: Some(now),
            latest_reading_time,
            last_poll_attempted: now,
            consecutive_failures: 0,
        };

        self.cache.insert(station.station_reference.clone(), snapshot);
        sensor_count
    }

    /// Records a failed poll. The previous snapshot's readouts stay in
    /// place; only the attempt time and failure counter change. A station
    /// that has never been fetched gets a placeholder snapshot with no
    /// readouts, which displays as Unknown.
    pub fn record_failure(&mut self, reference: &str, now: DateTime<Utc>) {
        self.cache
            .entry(reference.to_string())
            .and_modify(|snapshot| {
                snapshot.last_poll_attempted = now;
                snapshot.consecutive_failures += 1;
            })
            .or_insert_with(|| StationSnapshot {
                reference: reference.to_string(),
                label: reference.to_string(),
                sensors: Vec::new(),
                status: None,
                current_level: None,
                fetched_at: None,
                latest_reading_time: None,
                last_poll_attempted: now,
                consecutive_failures: 1,
            });
    }

    pub fn get(&self, reference: &str) -> Option<&StationSnapshot> {
        self.cache.get(reference)
    }

    /// All snapshots sorted by station reference for stable output.
    pub fn snapshots(&self) -> Vec<&StationSnapshot> {
        let mut all: Vec<&StationSnapshot> = self.cache.values().collect();
        all.sort_by(|a, b| a.reference.cmp(&b.reference));
        all
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Stations whose newest reading is older than `max_age_minutes`,
    /// with the reading age. Stations with no reading at all are not
    /// reported here — they show up through their failure counters.
    pub fn stale_stations(
        &self,
        max_age_minutes: u64,
        now: DateTime<Utc>,
    ) -> Vec<(String, i64)> {
        let mut stale: Vec<(String, i64)> = self
            .cache
            .values()
            .filter_map(|snapshot| {
                let age = snapshot.staleness_minutes(now)?;
                (age > max_age_minutes as i64).then(|| (snapshot.reference.clone(), age))
            })
            .collect();
        stale.sort();
        stale
    }
}

impl Default for MonitoringCache {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LevelStatus, Measure, Reading, StageScale, Trend};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap()
    }

    fn kingston(level: f64, reading_time: &str) -> Station {
        Station {
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
                    value: level,
                    date_time: Some(reading_time.to_string()),
                }),
            }],
        }
    }

    #[test]
    fn test_record_success_builds_snapshot() {
        let mut cache = MonitoringCache::new();
        let count = cache.record_success(&kingston(3.96, "2024-05-01T12:45:00Z"), fixed_now());

        assert_eq!(count, 1);
        let snapshot = cache.get("3400TH").expect("snapshot stored");
        assert_eq!(snapshot.label, "Kingston");
        assert_eq!(snapshot.current_level, Some(3.96));
        assert_eq!(snapshot.consecutive_failures, 0);
        assert_eq!(snapshot.staleness_minutes(fixed_now()), Some(15));
        let status = snapshot.status.as_ref().expect("Kingston has a stage scale");
        assert_eq!(status.status, LevelStatus::Normal);
        assert_eq!(status.trend, None, "first poll has no baseline");
    }

    #[test]
    fn test_second_poll_computes_trend_from_previous_snapshot() {
        let mut cache = MonitoringCache::new();
        cache.record_success(&kingston(3.96, "2024-05-01T12:00:00Z"), fixed_now());
        cache.record_success(&kingston(4.10, "2024-05-01T12:15:00Z"), fixed_now());

        let status = cache.get("3400TH").unwrap().status.as_ref().unwrap();
        assert_eq!(status.trend, Some(Trend::Rising));
    }

    #[test]
    fn test_record_failure_preserves_displayed_values() {
        let mut cache = MonitoringCache::new();
        cache.record_success(&kingston(3.96, "2024-05-01T12:00:00Z"), fixed_now());
        cache.record_failure("3400TH", fixed_now());
        cache.record_failure("3400TH", fixed_now());

        let snapshot = cache.get("3400TH").unwrap();
        assert_eq!(snapshot.consecutive_failures, 2);
        assert_eq!(
            snapshot.current_level,
            Some(3.96),
            "failed polls must not clobber the previous reading"
        );
        assert_eq!(snapshot.sensors.len(), 1);
    }

    #[test]
    fn test_success_resets_failure_counter() {
        let mut cache = MonitoringCache::new();
        cache.record_failure("3400TH", fixed_now());
        cache.record_failure("3400TH", fixed_now());
        cache.record_success(&kingston(3.96, "2024-05-01T12:45:00Z"), fixed_now());

        assert_eq!(cache.get("3400TH").unwrap().consecutive_failures, 0);
    }

    #[test]
    fn test_failure_before_any_success_yields_placeholder() {
        let mut cache = MonitoringCache::new();
        cache.record_failure("L3103", fixed_now());

        let snapshot = cache.get("L3103").expect("placeholder stored");
        assert!(snapshot.sensors.is_empty());
        assert!(snapshot.status.is_none());
        assert!(snapshot.fetched_at.is_none());
        assert_eq!(snapshot.consecutive_failures, 1);
    }

    #[test]
    fn test_stale_stations_reports_only_old_readings() {
        let mut cache = MonitoringCache::new();
        // 90 minutes old at fixed_now
        cache.record_success(&kingston(3.96, "2024-05-01T11:30:00Z"), fixed_now());

        let stale = cache.stale_stations(60, fixed_now());
        assert_eq!(stale, vec![("3400TH".to_string(), 90)]);

        let not_stale = cache.stale_stations(120, fixed_now());
        assert!(not_stale.is_empty());
    }

    #[test]
    fn test_snapshots_sorted_by_reference() {
        let mut cache = MonitoringCache::new();
        cache.record_failure("L3103", fixed_now());
        cache.record_failure("2200TH", fixed_now());
        cache.record_failure("3400TH", fixed_now());

        let references: Vec<&str> = cache
            .snapshots()
            .iter()
            .map(|s| s.reference.as_str())
            .collect();
        assert_eq!(references, vec!["2200TH", "3400TH", "L3103"]);
    }
}
