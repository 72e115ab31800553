//! Test fixtures: representative JSON payloads from the EA Flood Monitoring
//! API.
//!
//! These fixtures are structurally complete but truncated to the minimum
//! needed to exercise the parser. They reflect the real envelope returned by:
//!   https://environment.data.gov.uk/flood-monitoring/id/stations
//!
//! Response shapes to be aware of:
//!   - stations list: `{"items": [<station>, ...]}`
//!   - single station: `{"items": <station>}` on current servers, but
//!     `{"items": [<station>]}` and even the bare station object have been
//!     observed — parsers must accept all three.
//!   - `measures` on a station: array OR single object OR absent.
//!   - `RLOIid`: string on some stations, number on others.
//!   - `latestReading`: usually an object with `value`/`dateTime`, but can
//!     be a bare reading URI string on freshly registered measures.

/// Stations list with two stations, in API order: Kingston (Thames) then
/// Armley (Aire). Kingston carries a full stage scale; Armley carries none.
#[cfg(test)]
pub(crate) fn fixture_station_list_json() -> &'static str {
    r#"{
      "@context": "http://environment.data.gov.uk/flood-monitoring/meta/context.jsonld",
      "meta": {
        "publisher": "Environment Agency",
        "licence": "http://www.nationalarchives.gov.uk/doc/open-government-licence/version/3/"
      },
      "items": [
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/3400TH",
          "stationReference": "3400TH",
          "label": "Kingston",
          "catchmentName": "Thames from Hurley to Teddington",
          "riverName": "River Thames",
          "town": "Kingston upon Thames",
          "RLOIid": "7267",
          "status": "http://environment.data.gov.uk/flood-monitoring/def/core/statusActive",
          "stageScale": {
            "typicalRangeHigh": 4.48,
            "typicalRangeLow": 3.41,
            "highestRecent": {
              "dateTime": "2014-02-02T09:00:00Z",
              "value": 5.707
            }
          },
          "measures": [
            {
              "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD",
              "parameter": "level",
              "parameterName": "Water Level",
              "qualifier": "Stage",
              "unitName": "mASD",
              "latestReading": {
                "dateTime": "2024-05-01T12:00:00Z",
                "value": 3.96
              }
            }
          ]
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/L3103",
          "stationReference": "L3103",
          "label": "Armley",
          "catchmentName": "Aire and Calder",
          "riverName": "River Aire",
          "town": "Leeds",
          "RLOIid": 8208,
          "measures": [
            {
              "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/L3103-level-stage-i-15_min-m",
              "parameter": "level",
              "parameterName": "Water Level",
              "qualifier": "Stage",
              "unitName": "m",
              "latestReading": {
                "dateTime": "2024-05-01T11:45:00Z",
                "value": 0.744
              }
            }
          ]
        }
      ]
    }"#
}

/// Kingston as the single-station endpoint returns it today: `items` is a
/// bare object. Two measures (level + flow) and a full stage scale.
#[cfg(test)]
pub(crate) fn fixture_single_station_items_object_json() -> &'static str {
    r#"{
      "@context": "http://environment.data.gov.uk/flood-monitoring/meta/context.jsonld",
      "meta": { "publisher": "Environment Agency" },
      "items": {
        "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/3400TH",
        "stationReference": "3400TH",
        "label": "Kingston",
        "catchmentName": "Thames from Hurley to Teddington",
        "riverName": "River Thames",
        "town": "Kingston upon Thames",
        "RLOIid": "7267",
        "stageScale": {
          "typicalRangeHigh": 4.48,
          "typicalRangeLow": 3.41,
          "highestRecent": {
            "dateTime": "2014-02-02T09:00:00Z",
            "value": 5.707
          }
        },
        "measures": [
          {
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD",
            "parameter": "level",
            "parameterName": "Water Level",
            "qualifier": "Stage",
            "unitName": "mASD",
            "latestReading": {
              "dateTime": "2024-05-01T12:00:00Z",
              "value": 3.96
            }
          },
          {
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-flow--i-15_min-m3_s",
            "parameter": "flow",
            "parameterName": "Flow",
            "unitName": "m3/s",
            "latestReading": {
              "dateTime": "2024-05-01T12:00:00Z",
              "value": 87.3
            }
          }
        ]
      }
    }"#
}

/// The same Kingston payload with `items` wrapped in a one-element array,
/// as older servers return it. Must parse to the same station as the
/// object form.
#[cfg(test)]
pub(crate) fn fixture_single_station_items_array_json() -> &'static str {
    r#"{
      "meta": { "publisher": "Environment Agency" },
      "items": [
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/3400TH",
          "stationReference": "3400TH",
          "label": "Kingston",
          "catchmentName": "Thames from Hurley to Teddington",
          "riverName": "River Thames",
          "town": "Kingston upon Thames",
          "RLOIid": "7267",
          "stageScale": {
            "typicalRangeHigh": 4.48,
            "typicalRangeLow": 3.41,
            "highestRecent": {
              "dateTime": "2014-02-02T09:00:00Z",
              "value": 5.707
            }
          },
          "measures": [
            {
              "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD",
              "parameter": "level",
              "parameterName": "Water Level",
              "qualifier": "Stage",
              "unitName": "mASD",
              "latestReading": {
                "dateTime": "2024-05-01T12:00:00Z",
                "value": 3.96
              }
            },
            {
              "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-flow--i-15_min-m3_s",
              "parameter": "flow",
              "parameterName": "Flow",
              "unitName": "m3/s",
              "latestReading": {
                "dateTime": "2024-05-01T12:00:00Z",
                "value": 87.3
              }
            }
          ]
        }
      ]
    }"#
}

/// Degenerate shape: the station fields sit directly at the response root
/// with no `items` envelope at all. Must parse to the same station as the
/// enveloped forms.
#[cfg(test)]
pub(crate) fn fixture_single_station_bare_root_json() -> &'static str {
    r#"{
      "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/3400TH",
      "stationReference": "3400TH",
      "label": "Kingston",
      "catchmentName": "Thames from Hurley to Teddington",
      "riverName": "River Thames",
      "town": "Kingston upon Thames",
      "RLOIid": "7267",
      "stageScale": {
        "typicalRangeHigh": 4.48,
        "typicalRangeLow": 3.41,
        "highestRecent": {
          "dateTime": "2014-02-02T09:00:00Z",
          "value": 5.707
        }
      },
      "measures": [
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD",
          "parameter": "level",
          "parameterName": "Water Level",
          "qualifier": "Stage",
          "unitName": "mASD",
          "latestReading": {
            "dateTime": "2024-05-01T12:00:00Z",
            "value": 3.96
          }
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-flow--i-15_min-m3_s",
          "parameter": "flow",
          "parameterName": "Flow",
          "unitName": "m3/s",
          "latestReading": {
            "dateTime": "2024-05-01T12:00:00Z",
            "value": 87.3
          }
        }
      ]
    }"#
}

/// Station whose `measures` field is a single object rather than an array —
/// observed on stations with exactly one measure.
#[cfg(test)]
pub(crate) fn fixture_station_measures_single_object_json() -> &'static str {
    r#"{
      "items": {
        "stationReference": "2200TH",
        "label": "Reading",
        "catchmentName": "Thames and Kennet",
        "riverName": "River Thames",
        "measures": {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/2200TH-level-stage-i-15_min-mASD",
          "parameter": "level",
          "parameterName": "Water Level",
          "qualifier": "Stage",
          "unitName": "mASD",
          "latestReading": {
            "dateTime": "2024-05-01T12:00:00Z",
            "value": 2.18
          }
        }
      }
    }"#
}

/// Tidal station with no `stageScale` — status classification is not
/// offered for such stations, but its measures still become sensors.
#[cfg(test)]
pub(crate) fn fixture_station_no_stage_scale_json() -> &'static str {
    r#"{
      "items": {
        "stationReference": "E2043",
        "label": "Southend Pier",
        "catchmentName": "Thames Estuary",
        "measures": [
          {
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/E2043-level-tidal_level-i-15_min-mAOD",
            "parameter": "level",
            "parameterName": "Tidal Level",
            "qualifier": "Tidal Level",
            "unitName": "mAOD",
            "latestReading": {
              "dateTime": "2024-05-01T12:00:00Z",
              "value": 1.52
            }
          }
        ]
      }
    }"#
}
