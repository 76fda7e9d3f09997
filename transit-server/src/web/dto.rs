//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::composer::ComposedRoute;
use crate::domain::{BboxParseError, BoundingBox, Geometry, StopRecord};
use crate::routing::{Instruction, RouteLeg};

/// Viewport parameters accepted by the stops and routes endpoints.
#[derive(Debug, Deserialize)]
pub struct BboxQuery {
    /// Western longitude bound
    pub west: Option<f64>,

    /// Southern latitude bound
    pub south: Option<f64>,

    /// Eastern longitude bound
    pub east: Option<f64>,

    /// Northern latitude bound
    pub north: Option<f64>,

    /// Alternative single-parameter form: "west,south,east,north"
    pub bbox: Option<String>,
}

impl BboxQuery {
    /// Resolve the viewport. All four explicit corners win over the `bbox`
    /// string; with neither present the query is unbounded.
    pub fn resolve(&self) -> Result<Option<BoundingBox>, BboxParseError> {
        if let (Some(west), Some(south), Some(east), Some(north)) =
            (self.west, self.south, self.east, self.north)
        {
            return Ok(Some(BoundingBox::new(west, south, east, north)));
        }
        match &self.bbox {
            Some(raw) => BoundingBox::parse(raw).map(Some),
            None => Ok(None),
        }
    }
}

/// Request to search stations by name.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text query
    pub q: Option<String>,
}

/// Request to calculate a route between two stops.
#[derive(Debug, Deserialize)]
pub struct CalcQuery {
    /// Origin stop id
    pub from: Option<String>,

    /// Destination stop id
    pub to: Option<String>,
}

/// Health check body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Body returned by `DELETE /cache`.
#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub message: String,
    pub old_size: usize,
    pub new_size: usize,
}

/// Error body for every non-success response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    /// Underlying failure, included in development only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// One endpoint of a calculated route.
#[derive(Debug, Serialize)]
pub struct RouteEndpoint {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// [longitude, latitude]
    pub coordinates: [f64; 2],
}

impl RouteEndpoint {
    fn from_stop(stop: &StopRecord) -> Self {
        Self {
            id: stop.id.clone(),
            name: stop.name.clone(),
            kind: "stop",
            coordinates: [stop.lon, stop.lat],
        }
    }
}

/// Properties of the calculated-route feature.
#[derive(Debug, Serialize)]
pub struct RouteProperties {
    pub from: RouteEndpoint,
    pub to: RouteEndpoint,
    /// Kilometres
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfers: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legs: Option<Vec<RouteLeg>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GeoJSON feature wrapping a calculated route.
#[derive(Debug, Serialize)]
pub struct RouteFeature {
    #[serde(rename = "type")]
    tag: &'static str,
    pub properties: RouteProperties,
    pub geometry: Geometry,
}

/// Body returned by `GET /api/routes/calculate`.
#[derive(Debug, Serialize)]
pub struct RouteCalcResponse {
    pub route: RouteFeature,
    pub instructions: Vec<Instruction>,
    /// Always empty; kept for wire compatibility.
    #[serde(rename = "nearbyRoutes")]
    pub nearby_routes: Vec<serde_json::Value>,
}

impl RouteCalcResponse {
    pub fn from_route(route: ComposedRoute) -> Self {
        let ComposedRoute {
            from,
            to,
            distance_km,
            duration_secs,
            kind,
            profile,
            source,
            geometry,
            instructions,
            transfers,
            legs,
            error,
        } = route;

        Self {
            route: RouteFeature {
                tag: "Feature",
                properties: RouteProperties {
                    from: RouteEndpoint::from_stop(&from),
                    to: RouteEndpoint::from_stop(&to),
                    distance: distance_km,
                    duration: duration_secs,
                    kind,
                    source: source.as_str(),
                    profile,
                    transfers,
                    legs,
                    error,
                },
                geometry,
            },
            instructions,
            nearby_routes: Vec::new(),
        }
    }
}
