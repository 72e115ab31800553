//! Reading staleness detection.
//!
//! EA gauges report every 15 minutes under normal conditions. A sensor
//! outage is not obvious from the displayed value alone — the old reading
//! just sits there — so the poll loop flags stations whose latest reading
//! has fallen behind a configured age threshold.
//!
//! # Clock injection
//! All functions accept a `now: DateTime<Utc>` parameter rather than
//! calling `Utc::now()` internally, keeping staleness deterministic in
//! tests.

use chrono::{DateTime, Utc};

use crate::model::Reading;

// ---------------------------------------------------------------------------
// Staleness check
// ---------------------------------------------------------------------------

/// Parses a reading's timestamp into UTC. EA timestamps are RFC 3339
/// (`2024-05-01T12:00:00Z`). Returns an error for a missing or
/// unparseable timestamp; callers treat that as stale (fail-safe).
pub fn reading_time(reading: &Reading) -> Result<DateTime<Utc>, String> {
    let raw = reading
        .date_time
        .as_deref()
        .ok_or_else(|| "reading has no dateTime".to_string())?;

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("unparseable dateTime '{}': {}", raw, e))
}

/// Age of a reading in whole minutes relative to `now`.
pub fn reading_age_minutes(reading: &Reading, now: DateTime<Utc>) -> Result<i64, String> {
    Ok((now - reading_time(reading)?).num_minutes())
}

/// Returns `true` if the reading is older than `max_age_minutes` relative
/// to `now`. Staleness is strictly greater than the threshold:
///
///   age >  max_age_minutes  →  stale
///   age == max_age_minutes  →  not stale
pub fn is_stale_at(
    reading: &Reading,
    max_age_minutes: u64,
    now: DateTime<Utc>,
) -> Result<bool, String> {
    Ok(reading_age_minutes(reading, now)? > max_age_minutes as i64)
}

/// Convenience wrapper that uses the real current time.
/// Use `is_stale_at` in tests to keep them deterministic.
pub fn is_stale(reading: &Reading, max_age_minutes: u64) -> Result<bool, String> {
    is_stale_at(reading, max_age_minutes, Utc::now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
