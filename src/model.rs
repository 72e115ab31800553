//! Core data types for the EA flood monitoring service.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no I/O — only types and small accessor methods.
//!
//! Everything produced by a fetch is an immutable, fetch-scoped snapshot:
//! each poll cycle builds fresh `Station`/`Measure` values from the latest
//! JSON and swaps them in wholesale. Nothing is mutated across cycles.

// ---------------------------------------------------------------------------
// Parameter names
// ---------------------------------------------------------------------------

/// EA parameter value for water level measures.
pub const PARAM_LEVEL: &str = "level";

/// EA parameter value for flow measures.
pub const PARAM_FLOW: &str = "flow";

// ---------------------------------------------------------------------------
// Station types
// ---------------------------------------------------------------------------

/// A single monitoring station as returned by the EA Flood Monitoring API.
///
/// `station_reference` uniquely identifies a station and is the only field
/// required to exist; everything else is optional because the API omits
/// fields freely. "Field absent" and "field present but null" both map to
/// `None` — there is no third state.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// EA station reference, e.g. "3400TH".
    pub station_reference: String,
    /// Display label, e.g. "Kingston".
    pub label: Option<String>,
    /// Catchment the station belongs to, e.g. "Thames from Hurley to Teddington".
    pub catchment_name: Option<String>,
    /// River name, where the station is on a named river.
    pub river_name: Option<String>,
    /// Alternate identifier used by the public check-for-flooding service.
    pub rloi_id: Option<String>,
    /// Typical-range bounds. A station without a stage scale does not offer
    /// status classification.
    pub stage_scale: Option<StageScale>,
    /// Measures in API order. May be empty.
    pub measures: Vec<Measure>,
}

impl Station {
    /// Display label with the API's documented fallback.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("Unknown Station")
    }

    /// Catchment name with the API's documented fallback.
    pub fn display_catchment(&self) -> &str {
        self.catchment_name.as_deref().unwrap_or("Unknown Catchment")
    }
}

/// A station's configured typical high/low level bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct StageScale {
    pub typical_range_high: Option<f64>,
    pub typical_range_low: Option<f64>,
    /// Highest level recorded in the recent record, where published.
    pub highest_recent: Option<Reading>,
}

// ---------------------------------------------------------------------------
// Measure types
// ---------------------------------------------------------------------------

/// One sensor channel at a station (stage level, flow, ...) with its most
/// recent reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    /// Measure URI from the API's `@id` field. Stable across fetches and
    /// used to pair fresh readings with existing sensors.
    pub id: Option<String>,
    /// Machine parameter name, e.g. "level" or "flow".
    pub parameter: Option<String>,
    /// Qualifier distinguishing measures with the same parameter,
    /// e.g. "Stage" vs "Downstream Stage".
    pub qualifier: Option<String>,
    /// Human-readable parameter name, e.g. "Water Level".
    pub parameter_name: Option<String>,
    /// Unit name, e.g. "mASD" or "m3/s".
    pub unit_name: Option<String>,
    /// Latest reading, where the API published one.
    pub latest_reading: Option<Reading>,
}

impl Measure {
    /// Semantic label for this measure: `qualifier`, else `parameterName`,
    /// else the literal `"Measure"`. First non-empty wins.
    pub fn label(&self) -> &str {
        if let Some(q) = self.qualifier.as_deref() {
            if !q.is_empty() {
                return q;
            }
        }
        if let Some(p) = self.parameter_name.as_deref() {
            if !p.is_empty() {
                return p;
            }
        }
        "Measure"
    }

    /// True if this measure reports the parameter used for status
    /// classification.
    pub fn is_level(&self) -> bool {
        self.parameter.as_deref() == Some(PARAM_LEVEL)
    }
}

/// A timestamped measurement value.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub value: f64,
    /// ISO 8601, e.g. "2024-05-01T12:00:00Z". Optional defensively — a value
    /// can arrive without its timestamp.
    pub date_time: Option<String>,
}

// ---------------------------------------------------------------------------
// Status types
// ---------------------------------------------------------------------------

/// Classification of a station's current level against its typical range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    High,
    Normal,
    Low,
    Unknown,
}

impl std::fmt::Display for LevelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelStatus::High => write!(f, "High"),
            LevelStatus::Normal => write!(f, "Normal"),
            LevelStatus::Low => write!(f, "Low"),
            LevelStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Direction of change between two consecutive polls. Ties are `Steady`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Rising => write!(f, "rising"),
            Trend::Falling => write!(f, "falling"),
            Trend::Steady => write!(f, "steady"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or processing EA flood monitoring
/// data. None of these are fatal to the service: a failed poll is logged
/// and superseded by the next scheduled poll.
#[derive(Debug, PartialEq)]
pub enum EafmError {
    /// Connection-level failure before an HTTP status was received.
    RequestError(String),
    /// Non-2xx HTTP response from the EA API.
    HttpError(u16),
    /// The response body could not be parsed as JSON at all. Valid JSON of
    /// an unexpected shape is NOT an error — the parser degrades to empty
    /// or absent values instead.
    ParseError(String),
    /// The single-station response did not resolve to a station.
    StationNotFound(String),
}

impl std::fmt::Display for EafmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EafmError::RequestError(msg) => write!(f, "Request error: {}", msg),
            EafmError::HttpError(code) => write!(f, "HTTP error: {}", code),
            EafmError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            EafmError::StationNotFound(reference) => {
                write!(f, "Station not found: {}", reference)
            }
        }
    }
}

impl std::error::Error for EafmError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_measure() -> Measure {
        Measure {
            id: None,
            parameter: None,
            qualifier: None,
            parameter_name: None,
            unit_name: None,
            latest_reading: None,
        }
    }

    #[test]
    fn test_measure_label_prefers_qualifier() {
        let measure = Measure {
            qualifier: Some("Stage".to_string()),
            parameter_name: Some("Water Level".to_string()),
            ..bare_measure()
        };
        assert_eq!(measure.label(), "Stage");
    }

    #[test]
    fn test_measure_label_falls_back_to_parameter_name() {
        let measure = Measure {
            parameter_name: Some("Flow".to_string()),
            ..bare_measure()
        };
        assert_eq!(measure.label(), "Flow");
    }

    #[test]
    fn test_measure_label_defaults_to_literal_measure() {
        assert_eq!(bare_measure().label(), "Measure");
    }

    #[test]
    fn test_measure_label_skips_empty_strings() {
        // An empty qualifier must lose to a populated parameterName —
        // resolution is first NON-EMPTY wins, not first present.
        let measure = Measure {
            qualifier: Some(String::new()),
            parameter_name: Some("Water Level".to_string()),
            ..bare_measure()
        };
        assert_eq!(measure.label(), "Water Level");
    }

    #[test]
    fn test_station_display_fallbacks() {
        let station = Station {
            station_reference: "3400TH".to_string(),
            label: None,
            catchment_name: None,
            river_name: None,
            rloi_id: None,
            stage_scale: None,
            measures: Vec::new(),
        };
        assert_eq!(station.display_label(), "Unknown Station");
        assert_eq!(station.display_catchment(), "Unknown Catchment");
    }

    #[test]
    fn test_level_status_display() {
        assert_eq!(LevelStatus::High.to_string(), "High");
        assert_eq!(LevelStatus::Normal.to_string(), "Normal");
        assert_eq!(LevelStatus::Low.to_string(), "Low");
        assert_eq!(LevelStatus::Unknown.to_string(), "Unknown");
    }
}
