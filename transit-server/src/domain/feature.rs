//! GeoJSON feature model shared by both data sources.
//!
//! Map rows (OSM) and schedule rows (GTFS) are projected into this one shape
//! so clients never see which table a feature came from. The `id` encoding is
//! the only visible difference: OSM rows keep their signed numeric id, GTFS
//! rows their string stop id.

use serde::{Deserialize, Serialize};

/// Feature identifier, numeric for OSM rows and textual for GTFS rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureId {
    Osm(i64),
    Gtfs(String),
}

/// GeoJSON geometry, restricted to the variants the two sources produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
}

/// Properties attached to a map feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    pub name: String,
    /// Feature classification ("station", "stop", or a raw OSM tag value).
    #[serde(rename = "type")]
    pub kind: String,
    /// OSM route tag, present on line features only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

/// A single map feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    tag: &'static str,
    pub id: FeatureId,
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(id: FeatureId, properties: FeatureProperties, geometry: Geometry) -> Self {
        Self {
            tag: "Feature",
            id,
            properties,
            geometry,
        }
    }
}

/// A set of features in GeoJSON envelope form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    tag: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            tag: "FeatureCollection",
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
