//! GraphHopper response model.
//!
//! Only the fields the composer consumes are modeled; unknown engine fields
//! are dropped on deserialization. Most fields are optional because the two
//! endpoints (`/route`, `/route-pt`) populate different subsets.

use serde::{Deserialize, Serialize};

use crate::domain::Geometry;

/// Top-level routing response from either endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteResponse {
    /// Path alternatives, best first. Missing in some engine error bodies,
    /// which counts the same as empty.
    #[serde(default)]
    pub paths: Vec<RoutePath>,
}

/// One path alternative.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoutePath {
    /// Total distance in meters.
    pub distance: f64,

    /// Total travel time in milliseconds.
    pub time: i64,

    /// Number of transfers; only populated by the PT endpoint.
    #[serde(default)]
    pub transfers: i64,

    /// Per-mode legs; only populated by the PT endpoint.
    #[serde(default)]
    pub legs: Vec<RouteLeg>,

    /// Combined path geometry when `points_encoded=false`.
    pub points: Option<Geometry>,

    /// Path-level turn instructions.
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

/// One leg of a public-transport path.
///
/// The enrichment fields at the bottom are stamped on by the composer and
/// never sent by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Leg mode, "walk" or "pt".
    #[serde(rename = "type", default = "unknown_leg_type")]
    pub leg_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_headsign: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<Instruction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_short_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_long_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_line: Option<String>,
}

fn unknown_leg_type() -> String {
    "unknown".to_string()
}

/// A turn-by-turn instruction.
///
/// `legIndex`/`legType` are stamped on by the composer when instructions from
/// multiple legs are merged into one sequence; the engine never sends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,

    /// Index range into the path geometry this instruction covers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<[i64; 2]>,

    #[serde(rename = "legIndex", skip_serializing_if = "Option::is_none")]
    pub leg_index: Option<usize>,

    #[serde(rename = "legType", skip_serializing_if = "Option::is_none")]
    pub leg_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PT_RESPONSE: &str = r#"{
        "paths": [
            {
                "distance": 5120.4,
                "time": 780000,
                "transfers": 1,
                "legs": [
                    {
                        "type": "walk",
                        "distance": 312.0,
                        "geometry": {"type": "LineString", "coordinates": [[13.40, 52.52], [13.401, 52.521]]},
                        "instructions": [{"text": "Walk to stop", "distance": 312.0, "time": 240000, "sign": 0}]
                    },
                    {
                        "type": "pt",
                        "route_id": "u6-route",
                        "trip_headsign": "Alt-Mariendorf",
                        "departure_time": "2026-08-23T10:01:00Z",
                        "arrival_time": "2026-08-23T10:10:00Z",
                        "geometry": {"type": "LineString", "coordinates": [[13.401, 52.521], [13.41, 52.53]]},
                        "instructions": [{"text": "Ride U6"}]
                    }
                ],
                "points": {"type": "LineString", "coordinates": [[13.40, 52.52], [13.41, 52.53]]}
            }
        ]
    }"#;

    const PROFILE_RESPONSE: &str = r#"{
        "paths": [
            {
                "distance": 1480.0,
                "time": 1065000,
                "points": {"type": "LineString", "coordinates": [[13.40, 52.52], [13.41, 52.53]]},
                "instructions": [
                    {"text": "Continue", "distance": 1480.0, "time": 1065000, "sign": 0, "street_name": "Friedrichstr.", "interval": [0, 1]}
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_pt_response() {
        let response: RouteResponse = serde_json::from_str(PT_RESPONSE).unwrap();
        let path = &response.paths[0];

        assert_eq!(path.transfers, 1);
        assert_eq!(path.legs.len(), 2);
        assert_eq!(path.legs[0].leg_type, "walk");
        assert_eq!(path.legs[1].route_id.as_deref(), Some("u6-route"));
        assert_eq!(path.legs[1].instructions[0].text.as_deref(), Some("Ride U6"));
    }

    #[test]
    fn parses_profile_response() {
        let response: RouteResponse = serde_json::from_str(PROFILE_RESPONSE).unwrap();
        let path = &response.paths[0];

        assert_eq!(path.transfers, 0);
        assert!(path.legs.is_empty());
        assert_eq!(path.instructions.len(), 1);
        assert_eq!(path.instructions[0].interval, Some([0, 1]));
    }

    #[test]
    fn missing_paths_key_is_empty() {
        let response: RouteResponse = serde_json::from_str("{}").unwrap();
        assert!(response.paths.is_empty());
    }

    #[test]
    fn extra_engine_fields_are_ignored() {
        let raw = r#"{
            "hints": {"visited_nodes.sum": 42},
            "info": {"took": 7},
            "paths": [
                {"distance": 10.0, "time": 1000, "points_encoded": false,
                 "bbox": [13.4, 52.5, 13.41, 52.53],
                 "points": {"type": "LineString", "coordinates": [[13.4, 52.5]]}}
            ]
        }"#;

        let response: RouteResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.paths[0].distance, 10.0);
    }

    #[test]
    fn leg_without_type_defaults_to_unknown() {
        let leg: RouteLeg = serde_json::from_str(r#"{"distance": 5.0}"#).unwrap();
        assert_eq!(leg.leg_type, "unknown");
    }

    #[test]
    fn enrichment_fields_serialize_only_when_set() {
        let mut leg: RouteLeg =
            serde_json::from_str(r#"{"type": "pt", "route_id": "u6-route"}"#).unwrap();
        leg.display_line = Some("U6".to_string());

        let value = serde_json::to_value(&leg).unwrap();
        assert_eq!(value["display_line"], "U6");
        assert!(value.get("route_short_name").is_none());
    }

    #[test]
    fn tagged_instruction_serializes_camel_case_tags() {
        let instruction = Instruction {
            text: Some("Ride U6".to_string()),
            distance: None,
            time: None,
            sign: None,
            street_name: None,
            interval: None,
            leg_index: Some(1),
            leg_type: Some("pt".to_string()),
        };

        let value = serde_json::to_value(&instruction).unwrap();
        assert_eq!(value["legIndex"], 1);
        assert_eq!(value["legType"], "pt");
        assert!(value.get("leg_index").is_none());
    }
}
