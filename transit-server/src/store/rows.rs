//! Source row shapes and their projection into canonical types.
//!
//! The two backing databases return different column sets for the same
//! logical thing. Each shape gets its own row struct, and `FeatureRow` tags
//! which source a row came from, so a single adapter decides how every shape
//! maps onto the canonical `Feature` instead of field-by-field fallback
//! chains scattered through the handlers.

use sqlx::FromRow;
use tracing::warn;

use crate::domain::{
    Feature, FeatureId, FeatureProperties, Geometry, LatLng, StationHit, StopKind, StopRecord,
};

/// Fallback display name for unnamed stop rows.
const UNNAMED_STOP: &str = "Unnamed Stop";

/// Fallback display name for unnamed line rows.
const UNNAMED_ROUTE: &str = "Unnamed Route";

/// Line row from the OSM map database.
#[derive(Debug, Clone, FromRow)]
pub struct OsmLineRow {
    pub osm_id: i64,
    pub name: Option<String>,
    pub route: Option<String>,
    pub public_transport: Option<String>,
    pub railway: Option<String>,
    pub highway: Option<String>,
    /// GeoJSON text produced by `ST_AsGeoJSON`.
    pub geometry: Option<String>,
}

/// Point row from the OSM map database.
#[derive(Debug, Clone, FromRow)]
pub struct OsmPointRow {
    pub osm_id: i64,
    pub name: Option<String>,
    pub railway: Option<String>,
    pub lon: f64,
    pub lat: f64,
}

/// Stop row from the GTFS schedule database.
#[derive(Debug, Clone, FromRow)]
pub struct GtfsStopRow {
    pub stop_id: String,
    pub stop_name: Option<String>,
    pub stop_lat: f64,
    pub stop_lon: f64,
    pub location_type: Option<i32>,
}

/// A row tagged with its source, before projection into a `Feature`.
#[derive(Debug, Clone)]
pub enum FeatureRow {
    OsmLine(OsmLineRow),
    OsmPoint(OsmPointRow),
    GtfsStop(GtfsStopRow),
}

impl FeatureRow {
    /// Project into the canonical feature shape.
    ///
    /// Returns `None` for line rows whose geometry column is missing or fails
    /// to parse; those rows are skipped with a warning rather than failing
    /// the whole query.
    pub fn into_feature(self) -> Option<Feature> {
        match self {
            FeatureRow::OsmLine(row) => {
                let geometry = match row.geometry.as_deref().map(serde_json::from_str) {
                    Some(Ok(geometry)) => geometry,
                    Some(Err(error)) => {
                        warn!(osm_id = row.osm_id, %error, "skipping line with unparseable geometry");
                        return None;
                    }
                    None => {
                        warn!(osm_id = row.osm_id, "skipping line without geometry");
                        return None;
                    }
                };

                let kind = row
                    .public_transport
                    .or(row.railway)
                    .or(row.highway)
                    .or_else(|| row.route.clone())
                    .unwrap_or_else(|| "unknown".to_string());

                Some(Feature::new(
                    FeatureId::Osm(row.osm_id),
                    FeatureProperties {
                        name: row.name.unwrap_or_else(|| UNNAMED_ROUTE.to_string()),
                        kind,
                        route: row.route,
                    },
                    geometry,
                ))
            }

            FeatureRow::OsmPoint(row) => {
                let kind = match row.railway.as_deref() {
                    Some("station") => StopKind::Station,
                    _ => StopKind::Stop,
                };

                Some(Feature::new(
                    FeatureId::Osm(row.osm_id),
                    FeatureProperties {
                        name: row.name.unwrap_or_else(|| UNNAMED_STOP.to_string()),
                        kind: kind.as_str().to_string(),
                        route: None,
                    },
                    Geometry::Point {
                        coordinates: [row.lon, row.lat],
                    },
                ))
            }

            FeatureRow::GtfsStop(row) => {
                let kind = StopKind::from_location_type(row.location_type);

                Some(Feature::new(
                    FeatureId::Gtfs(row.stop_id),
                    FeatureProperties {
                        name: row.stop_name.unwrap_or_else(|| UNNAMED_STOP.to_string()),
                        kind: kind.as_str().to_string(),
                        route: None,
                    },
                    Geometry::Point {
                        coordinates: [row.stop_lon, row.stop_lat],
                    },
                ))
            }
        }
    }
}

/// Search row from the GTFS schedule database, with its similarity score.
///
/// The search query excludes NULL and empty names, so `stop_name` is not
/// optional here.
#[derive(Debug, Clone, FromRow)]
pub struct StationSearchRow {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
    pub location_type: Option<i32>,
    pub similarity_score: f32,
}

impl StationSearchRow {
    pub fn into_hit(self) -> StationHit {
        StationHit {
            id: self.stop_id,
            name: self.stop_name,
            kind: StopKind::from_location_type(self.location_type),
            coordinates: LatLng {
                lat: self.stop_lat,
                lng: self.stop_lon,
            },
            similarity: self.similarity_score,
        }
    }
}

/// Minimal stop row used when resolving route-calculation endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct StopPairRow {
    pub stop_id: String,
    pub stop_name: Option<String>,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

impl StopPairRow {
    pub fn into_record(self) -> StopRecord {
        StopRecord {
            id: self.stop_id,
            name: self.stop_name.unwrap_or_else(|| UNNAMED_STOP.to_string()),
            lat: self.stop_lat,
            lon: self.stop_lon,
        }
    }
}
