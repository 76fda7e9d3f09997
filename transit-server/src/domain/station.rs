//! Station records from the transit schedule.

use serde::Serialize;

/// A stop row resolved from the schedule store, used for route calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Coordinate pair in the `{lat, lng}` encoding used by search results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Classification of a stop record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Station,
    Stop,
}

impl StopKind {
    /// GTFS `location_type` 1 marks a parent station; everything else,
    /// including a missing value, is a plain stop.
    pub fn from_location_type(location_type: Option<i32>) -> Self {
        match location_type {
            Some(1) => StopKind::Station,
            _ => StopKind::Stop,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StopKind::Station => "station",
            StopKind::Stop => "stop",
        }
    }
}

/// A fuzzy-search hit, ranked by trigram similarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationHit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StopKind,
    pub coordinates: LatLng,
    pub similarity: f32,
}

/// Display names for a GTFS route, resolved during leg enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNames {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn location_type_one_is_station() {
        assert_eq!(StopKind::from_location_type(Some(1)), StopKind::Station);
    }

    #[test]
    fn other_location_types_are_stops() {
        assert_eq!(StopKind::from_location_type(Some(0)), StopKind::Stop);
        assert_eq!(StopKind::from_location_type(Some(2)), StopKind::Stop);
        assert_eq!(StopKind::from_location_type(None), StopKind::Stop);
    }

    #[test]
    fn station_hit_wire_shape() {
        let hit = StationHit {
            id: "de:11000:90023201".to_string(),
            name: "S Zoologischer Garten".to_string(),
            kind: StopKind::Station,
            coordinates: LatLng {
                lat: 52.5067,
                lng: 13.3322,
            },
            similarity: 0.45,
        };

        let value = serde_json::to_value(&hit).unwrap();
        assert_eq!(value["type"], json!("station"));
        assert_eq!(value["coordinates"]["lng"], json!(13.3322));
        assert_eq!(value["similarity"], json!(0.45_f32));
    }
}
