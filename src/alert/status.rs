//! River level status classification.
//!
//! A station's stage scale publishes its typical range as two bounds,
//! `typicalRangeHigh` and `typicalRangeLow`. Classification compares the
//! current level reading against those bounds:
//!
//!   level > high            →  High
//!   level < low (if known)  →  Low
//!   otherwise               →  Normal
//!   no level or no high     →  Unknown
//!
//! The rule is asymmetric on purpose: many stations publish only a high
//! bound, and those still classify High/Normal. Only a missing HIGH bound
//! (or a missing reading) makes the status Unknown.
//!
//! Each poll recomputes the classification from a fresh reading — there is
//! no hysteresis and no persisted state. The only cross-poll input is the
//! previous level value, used for the cosmetic trend arrow.

use crate::model::{LevelStatus, Station, Trend};

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifies a level reading against typical-range bounds.
pub fn classify(current_level: Option<f64>, high: Option<f64>, low: Option<f64>) -> LevelStatus {
    let level = match current_level {
        Some(v) => v,
        None => return LevelStatus::Unknown,
    };
    let high = match high {
        Some(v) => v,
        None => return LevelStatus::Unknown,
    };

    if level > high {
        return LevelStatus::High;
    }
    if let Some(low) = low {
        if level < low {
            return LevelStatus::Low;
        }
    }
    LevelStatus::Normal
}

/// The station's current level: the latest reading of its first measure
/// with `parameter == "level"`. First match wins — a level measure without
/// a reading is NOT skipped in favor of a later one, so a station whose
/// primary level channel is down reports no level rather than silently
/// switching channels.
pub fn current_level(station: &Station) -> Option<f64> {
    station
        .measures
        .iter()
        .find(|m| m.is_level())
        .and_then(|m| m.latest_reading.as_ref())
        .map(|r| r.value)
}

/// Classifies a station against its own stage scale. Returns `None` for
/// stations without a stage scale — classification is not offered there,
/// which is different from offering `Unknown`.
pub fn station_status(station: &Station) -> Option<LevelStatus> {
    let scale = station.stage_scale.as_ref()?;
    Some(classify(
        current_level(station),
        scale.typical_range_high,
        scale.typical_range_low,
    ))
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// Direction of change between the previous poll's level and the current
/// one. Ties are `Steady`; with no previous value there is no trend.
pub fn trend(previous: Option<f64>, current: f64) -> Option<Trend> {
    let previous = previous?;
    Some(if current > previous {
        Trend::Rising
    } else if current < previous {
        Trend::Falling
    } else {
        Trend::Steady
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Measure, Reading, StageScale};

    // --- classify -----------------------------------------------------------

    #[test]
    fn test_classify_above_high_is_high() {
        assert_eq!(classify(Some(12.0), Some(10.0), Some(5.0)), LevelStatus::High);
    }

    #[test]
    fn test_classify_within_range_is_normal() {
        assert_eq!(classify(Some(7.0), Some(10.0), Some(5.0)), LevelStatus::Normal);
    }

    #[test]
    fn test_classify_below_low_is_low() {
        assert_eq!(classify(Some(3.0), Some(10.0), Some(5.0)), LevelStatus::Low);
    }

    #[test]
    fn test_classify_no_level_is_unknown() {
        assert_eq!(classify(None, Some(10.0), Some(5.0)), LevelStatus::Unknown);
    }

    #[test]
    fn test_classify_no_high_bound_is_unknown() {
        assert_eq!(classify(Some(7.0), None, Some(5.0)), LevelStatus::Unknown);
    }

    #[test]
    fn test_classify_no_low_bound_is_normal_not_unknown() {
        // The asymmetric rule: a missing low bound does not degrade the
        // classification, even for a level that would otherwise be Low.
        assert_eq!(classify(Some(3.0), Some(10.0), None), LevelStatus::Normal);
    }

    #[test]
    fn test_classify_exactly_at_bounds_is_normal() {
        // Both comparisons are strict: sitting on a bound is still Normal.
        assert_eq!(classify(Some(10.0), Some(10.0), Some(5.0)), LevelStatus::Normal);
        assert_eq!(classify(Some(5.0), Some(10.0), Some(5.0)), LevelStatus::Normal);
    }

    #[test]
    fn test_classify_zero_low_bound_is_a_real_bound() {
        // A low bound of 0.0 participates in classification like any other
        // value — negative tidal levels below it classify as Low.
        assert_eq!(classify(Some(-0.5), Some(4.0), Some(0.0)), LevelStatus::Low);
        assert_eq!(classify(Some(0.5), Some(4.0), Some(0.0)), LevelStatus::Normal);
    }

    // --- trend --------------------------------------------------------------

    #[test]
    fn test_trend_rising_falling_steady() {
        assert_eq!(trend(Some(3.0), 4.0), Some(Trend::Rising));
        assert_eq!(trend(Some(4.0), 3.0), Some(Trend::Falling));
        assert_eq!(trend(Some(3.0), 3.0), Some(Trend::Steady));
    }

    #[test]
    fn test_trend_without_previous_value_is_none() {
        assert_eq!(trend(None, 3.0), None);
    }

    // --- station helpers ----------------------------------------------------

    fn measure(parameter: &str, reading: Option<f64>) -> Measure {
        Measure {
            id: Some(format!("measure-{}", parameter)),
            parameter: Some(parameter.to_string()),
            qualifier: None,
            parameter_name: None,
            unit_name: None,
            latest_reading: reading.map(|value| Reading {
                value,
                date_time: Some("2024-05-01T12:00:00Z".to_string()),
            }),
        }
    }

    fn station_with(measures: Vec<Measure>, scale: Option<StageScale>) -> Station {
        Station {
            station_reference: "3400TH".to_string(),
            label: Some("Kingston".to_string()),
            catchment_name: None,
            river_name: None,
            rloi_id: None,
            stage_scale: scale,
            measures,
        }
    }

    fn scale(high: Option<f64>, low: Option<f64>) -> StageScale {
        StageScale {
            typical_range_high: high,
            typical_range_low: low,
            highest_recent: None,
        }
    }

    #[test]
    fn test_current_level_picks_first_level_measure() {
        let station = station_with(
            vec![
                measure("flow", Some(80.0)),
                measure("level", Some(3.9)),
                measure("level", Some(99.0)),
            ],
            None,
        );
        assert_eq!(current_level(&station), Some(3.9));
    }

    #[test]
    fn test_current_level_does_not_fall_through_to_later_level_measure() {
        // The first level measure has no reading; a later one does. The
        // first match still wins, so there is no current level.
        let station = station_with(
            vec![measure("level", None), measure("level", Some(2.0))],
            None,
        );
        assert_eq!(current_level(&station), None);
    }

    #[test]
    fn test_station_status_requires_stage_scale() {
        let station = station_with(vec![measure("level", Some(3.9))], None);
        assert_eq!(station_status(&station), None);
    }

    #[test]
    fn test_station_status_classifies_against_own_scale() {
        let station = station_with(
            vec![measure("level", Some(4.9))],
            Some(scale(Some(4.48), Some(3.41))),
        );
        assert_eq!(station_status(&station), Some(LevelStatus::High));
    }

    #[test]
    fn test_station_status_unknown_when_high_bound_missing() {
        let station = station_with(
            vec![measure("level", Some(3.9))],
            Some(scale(None, Some(3.41))),
        );
        assert_eq!(station_status(&station), Some(LevelStatus::Unknown));
    }
}
