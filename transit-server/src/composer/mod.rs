//! Route composition between two transit stops.
//!
//! The composer resolves both endpoint stops from the schedule, asks the
//! routing engine for a path, and shapes the result into a single route
//! with one geometry, flattened instructions and (for public transport)
//! enriched legs. Engine failures of any kind degrade to a straight-line
//! fallback; an engine that answers but finds no path is a hard miss.

mod enrich;
mod fallback;

pub use fallback::haversine_km;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::{Geometry, LatLng, RouteNames, StopRecord};
use crate::routing::{GraphHopperClient, Instruction, RouteLeg, RoutePath, RoutingMode};
use crate::store::StoreError;

/// Schedule lookups the composer depends on.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Fetch both endpoint stops by id in one round trip. Returns only the
    /// rows that exist; callers decide what an incomplete pair means.
    async fn stop_pair(&self, from_id: &str, to_id: &str) -> Result<Vec<StopRecord>, StoreError>;

    /// Resolve a route id to its display names, if the route is known.
    async fn route_names(&self, route_id: &str) -> Result<Option<RouteNames>, StoreError>;
}

/// Where a composed route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSource {
    Engine,
    Fallback,
}

impl RouteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteSource::Engine => "graphhopper",
            RouteSource::Fallback => "fallback",
        }
    }
}

/// A fully shaped route between two stops.
#[derive(Debug, Clone)]
pub struct ComposedRoute {
    pub from: StopRecord,
    pub to: StopRecord,
    /// Path length in kilometres.
    pub distance_km: f64,
    /// Travel time in seconds. Zero on fallback routes.
    pub duration_secs: f64,
    /// "public_transport", "graphhopper_route" or "direct_connection".
    pub kind: String,
    /// Engine profile used ("pt" or the profile name), engine routes only.
    pub profile: Option<String>,
    pub source: RouteSource,
    pub geometry: Geometry,
    pub instructions: Vec<Instruction>,
    /// Transfer count, engine routes only.
    pub transfers: Option<i64>,
    /// Engine legs, enriched in public-transport mode and empty otherwise;
    /// absent on fallback routes.
    pub legs: Option<Vec<RouteLeg>>,
    /// Degradation note, fallback routes only.
    pub error: Option<String>,
}

/// Why a route could not be composed.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("one or both stops not found: {from_id}, {to_id}")]
    StationsNotFound { from_id: String, to_id: String },

    #[error("no route found between the requested stops")]
    NoRouteFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("routing engine returned a path without geometry")]
    MissingGeometry,
}

/// Builds routes between stops using an engine and a schedule.
pub struct RouteComposer<'a, S> {
    client: &'a GraphHopperClient,
    schedule: &'a S,
}

impl<'a, S: ScheduleSource> RouteComposer<'a, S> {
    pub fn new(client: &'a GraphHopperClient, schedule: &'a S) -> Self {
        Self { client, schedule }
    }

    /// Compose a route between two stop ids, departing now.
    pub async fn compose(&self, from_id: &str, to_id: &str) -> Result<ComposedRoute, ComposeError> {
        debug!(from_id, to_id, "composing route");

        let stops = self.schedule.stop_pair(from_id, to_id).await?;
        if stops.len() < 2 {
            return Err(ComposeError::StationsNotFound {
                from_id: from_id.to_string(),
                to_id: to_id.to_string(),
            });
        }
        let from = stops.iter().find(|stop| stop.id == from_id).cloned();
        let to = stops.iter().find(|stop| stop.id == to_id).cloned();
        let (Some(from), Some(to)) = (from, to) else {
            return Err(ComposeError::StationsNotFound {
                from_id: from_id.to_string(),
                to_id: to_id.to_string(),
            });
        };

        let origin = LatLng {
            lat: from.lat,
            lng: from.lon,
        };
        let destination = LatLng {
            lat: to.lat,
            lng: to.lon,
        };

        let response = match self.client.plan(origin, destination, Utc::now()).await {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "routing engine unavailable, substituting direct connection");
                return Ok(fallback::direct_connection(from, to));
            }
        };

        let Some(path) = response.paths.into_iter().next() else {
            return Err(ComposeError::NoRouteFound);
        };

        self.shape(from, to, path).await
    }

    async fn shape(
        &self,
        from: StopRecord,
        to: StopRecord,
        path: RoutePath,
    ) -> Result<ComposedRoute, ComposeError> {
        let RoutePath {
            distance,
            time,
            transfers,
            legs,
            points,
            instructions,
        } = path;

        let distance_km = distance / 1000.0;
        let duration_secs = time as f64 / 1000.0;
        let is_pt = *self.client.mode() == RoutingMode::PublicTransport;
        let profile = Some(self.client.mode().profile_label().to_string());

        if is_pt && !legs.is_empty() {
            let legs = enrich::enrich_legs(self.schedule, legs).await;
            let geometry = combine_leg_geometry(&legs)
                .or(points)
                .unwrap_or_else(|| fallback::straight_line(&from, &to));
            let instructions = tag_leg_instructions(&legs);

            return Ok(ComposedRoute {
                from,
                to,
                distance_km,
                duration_secs,
                kind: "public_transport".to_string(),
                profile,
                source: RouteSource::Engine,
                geometry,
                instructions,
                transfers: Some(transfers),
                legs: Some(legs),
                error: None,
            });
        }

        // A public-transport answer is drawable no matter what the engine
        // sent back; a profile answer without geometry is malformed.
        let geometry = if is_pt {
            points.unwrap_or_else(|| fallback::straight_line(&from, &to))
        } else {
            points.ok_or(ComposeError::MissingGeometry)?
        };

        Ok(ComposedRoute {
            from,
            to,
            distance_km,
            duration_secs,
            kind: "graphhopper_route".to_string(),
            profile,
            source: RouteSource::Engine,
            geometry,
            instructions,
            transfers: Some(transfers),
            legs: Some(legs),
            error: None,
        })
    }
}

/// Concatenate leg geometries into one line, in leg order. Legs without a
/// line geometry contribute nothing; `None` means no leg had one.
fn combine_leg_geometry(legs: &[RouteLeg]) -> Option<Geometry> {
    let mut coordinates = Vec::new();
    for leg in legs {
        if let Some(Geometry::LineString { coordinates: line }) = &leg.geometry {
            coordinates.extend(line.iter().cloned());
        }
    }

    if coordinates.is_empty() {
        None
    } else {
        Some(Geometry::LineString { coordinates })
    }
}

/// Flatten per-leg instructions, tagging each with its leg index and kind.
fn tag_leg_instructions(legs: &[RouteLeg]) -> Vec<Instruction> {
    let mut tagged = Vec::new();
    for (index, leg) in legs.iter().enumerate() {
        for instruction in &leg.instructions {
            let mut instruction = instruction.clone();
            instruction.leg_index = Some(index);
            instruction.leg_type = Some(leg.leg_type.clone());
            tagged.push(instruction);
        }
    }
    tagged
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::routing::RoutingConfig;

    use super::*;

    struct StubSchedule {
        stops: Vec<StopRecord>,
        names: HashMap<String, RouteNames>,
    }

    impl StubSchedule {
        fn with_stops(stops: Vec<StopRecord>) -> Self {
            Self {
                stops,
                names: HashMap::new(),
            }
        }

        fn and_name(mut self, route_id: &str, short: &str) -> Self {
            self.names.insert(
                route_id.to_string(),
                RouteNames {
                    short_name: Some(short.to_string()),
                    long_name: None,
                },
            );
            self
        }
    }

    #[async_trait]
    impl ScheduleSource for StubSchedule {
        async fn stop_pair(
            &self,
            from_id: &str,
            to_id: &str,
        ) -> Result<Vec<StopRecord>, StoreError> {
            Ok(self
                .stops
                .iter()
                .filter(|stop| stop.id == from_id || stop.id == to_id)
                .cloned()
                .collect())
        }

        async fn route_names(&self, route_id: &str) -> Result<Option<RouteNames>, StoreError> {
            Ok(self.names.get(route_id).cloned())
        }
    }

    fn alexanderplatz() -> StopRecord {
        StopRecord {
            id: "900100003".to_string(),
            name: "S+U Alexanderplatz".to_string(),
            lat: 52.5219,
            lon: 13.4132,
        }
    }

    fn hauptbahnhof() -> StopRecord {
        StopRecord {
            id: "900003201".to_string(),
            name: "S+U Berlin Hauptbahnhof".to_string(),
            lat: 52.5259,
            lon: 13.3694,
        }
    }

    fn both_stops() -> StubSchedule {
        StubSchedule::with_stops(vec![alexanderplatz(), hauptbahnhof()])
    }

    fn pt_body() -> serde_json::Value {
        json!({
            "paths": [{
                "distance": 4321.0,
                "time": 900_000,
                "transfers": 1,
                "legs": [
                    {
                        "type": "walk",
                        "distance": 200.0,
                        "geometry": {
                            "type": "LineString",
                            "coordinates": [[13.4132, 52.5219], [13.4100, 52.5230]]
                        },
                        "instructions": [
                            {"text": "Walk to the platform", "distance": 200.0, "time": 150_000, "sign": 0}
                        ]
                    },
                    {
                        "type": "pt",
                        "route_id": "bus_100",
                        "trip_headsign": "Hauptbahnhof",
                        "geometry": {
                            "type": "LineString",
                            "coordinates": [[13.4100, 52.5230], [13.3694, 52.5259]]
                        },
                        "instructions": [
                            {"text": "Ride towards Hauptbahnhof", "sign": 0}
                        ]
                    }
                ]
            }]
        })
    }

    async fn engine_returning(endpoint: &str, body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    fn pt_client(base_url: &str) -> GraphHopperClient {
        GraphHopperClient::new(RoutingConfig::new().with_base_url(base_url)).unwrap()
    }

    fn foot_client(base_url: &str) -> GraphHopperClient {
        let config = RoutingConfig::new()
            .with_base_url(base_url)
            .with_mode(RoutingMode::Profile("foot".to_string()));
        GraphHopperClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn composes_a_public_transport_route() {
        let server = engine_returning("/route-pt", pt_body()).await;
        let client = pt_client(&server.uri());
        let schedule = both_stops().and_name("bus_100", "100");
        let composer = RouteComposer::new(&client, &schedule);

        let route = composer.compose("900100003", "900003201").await.unwrap();

        assert_eq!(route.kind, "public_transport");
        assert_eq!(route.profile.as_deref(), Some("pt"));
        assert_eq!(route.source, RouteSource::Engine);
        assert!((route.distance_km - 4.321).abs() < 1e-9);
        assert!((route.duration_secs - 900.0).abs() < 1e-9);
        assert_eq!(route.transfers, Some(1));
        assert!(route.error.is_none());
        assert_eq!(route.from.name, "S+U Alexanderplatz");
        assert_eq!(route.to.name, "S+U Berlin Hauptbahnhof");

        let legs = route.legs.as_deref().unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[1].display_line.as_deref(), Some("100"));

        match &route.geometry {
            Geometry::LineString { coordinates } => {
                assert_eq!(coordinates.len(), 4);
                assert_eq!(coordinates[0], vec![13.4132, 52.5219]);
                assert_eq!(coordinates[3], vec![13.3694, 52.5259]);
            }
            other => panic!("expected a line, got {other:?}"),
        }

        assert_eq!(route.instructions.len(), 2);
        assert_eq!(route.instructions[0].leg_index, Some(0));
        assert_eq!(route.instructions[0].leg_type.as_deref(), Some("walk"));
        assert_eq!(route.instructions[1].leg_index, Some(1));
        assert_eq!(route.instructions[1].leg_type.as_deref(), Some("pt"));
    }

    #[tokio::test]
    async fn composes_a_profile_route() {
        let body = json!({
            "paths": [{
                "distance": 1500.0,
                "time": 1_080_000,
                "points": {
                    "type": "LineString",
                    "coordinates": [[13.4132, 52.5219], [13.39, 52.524], [13.3694, 52.5259]]
                },
                "instructions": [
                    {"text": "Head west", "distance": 700.0, "time": 500_000, "sign": 0,
                     "street_name": "Unter den Linden"}
                ]
            }]
        });
        let server = engine_returning("/route", body).await;
        let client = foot_client(&server.uri());
        let schedule = both_stops();
        let composer = RouteComposer::new(&client, &schedule);

        let route = composer.compose("900100003", "900003201").await.unwrap();

        assert_eq!(route.kind, "graphhopper_route");
        assert_eq!(route.profile.as_deref(), Some("foot"));
        assert_eq!(route.source, RouteSource::Engine);
        assert!((route.distance_km - 1.5).abs() < 1e-9);
        assert!((route.duration_secs - 1080.0).abs() < 1e-9);
        assert_eq!(route.transfers, Some(0));
        assert_eq!(route.legs.as_deref(), Some(&[][..]));
        assert_eq!(route.instructions.len(), 1);
        assert!(route.instructions[0].leg_index.is_none());
        match &route.geometry {
            Geometry::LineString { coordinates } => assert_eq!(coordinates.len(), 3),
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pt_path_without_legs_uses_path_geometry() {
        let body = json!({
            "paths": [{
                "distance": 2000.0,
                "time": 600_000,
                "transfers": 2,
                "points": {
                    "type": "LineString",
                    "coordinates": [[13.4132, 52.5219], [13.3694, 52.5259]]
                },
                "instructions": []
            }]
        });
        let server = engine_returning("/route-pt", body).await;
        let client = pt_client(&server.uri());
        let schedule = both_stops();
        let composer = RouteComposer::new(&client, &schedule);

        let route = composer.compose("900100003", "900003201").await.unwrap();

        assert_eq!(route.kind, "graphhopper_route");
        assert_eq!(route.profile.as_deref(), Some("pt"));
        assert_eq!(route.transfers, Some(2));
        assert_eq!(route.legs.as_deref(), Some(&[][..]));
        match &route.geometry {
            Geometry::LineString { coordinates } => assert_eq!(coordinates.len(), 2),
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pt_path_without_any_geometry_gets_a_straight_line() {
        let body = json!({
            "paths": [{"distance": 2000.0, "time": 600_000, "instructions": []}]
        });
        let server = engine_returning("/route-pt", body).await;
        let client = pt_client(&server.uri());
        let schedule = both_stops();
        let composer = RouteComposer::new(&client, &schedule);

        let route = composer.compose("900100003", "900003201").await.unwrap();

        // Still an engine answer, not the unavailability fallback.
        assert_eq!(route.kind, "graphhopper_route");
        assert_eq!(route.source, RouteSource::Engine);
        assert!(route.error.is_none());
        assert_eq!(
            route.geometry,
            Geometry::LineString {
                coordinates: vec![vec![13.4132, 52.5219], vec![13.3694, 52.5259]],
            }
        );
    }

    #[tokio::test]
    async fn engine_timeout_degrades_to_direct_connection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/route-pt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(pt_body())
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;
        let config = RoutingConfig::new()
            .with_base_url(server.uri())
            .with_timeout_secs(1);
        let client = GraphHopperClient::new(config).unwrap();
        let schedule = both_stops();
        let composer = RouteComposer::new(&client, &schedule);

        let route = composer.compose("900100003", "900003201").await.unwrap();

        assert_eq!(route.kind, "direct_connection");
        assert!(route.profile.is_none());
        assert_eq!(route.source, RouteSource::Fallback);
        assert_eq!(route.error.as_deref(), Some("GraphHopper not available"));
        assert_eq!(route.duration_secs, 0.0);
        let expected = haversine_km(
            LatLng {
                lat: 52.5219,
                lng: 13.4132,
            },
            LatLng {
                lat: 52.5259,
                lng: 13.3694,
            },
        );
        assert!((route.distance_km - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn engine_error_status_degrades_to_direct_connection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/route-pt"))
            .respond_with(ResponseTemplate::new(500).set_body_string("engine on fire"))
            .mount(&server)
            .await;
        let client = pt_client(&server.uri());
        let schedule = both_stops();
        let composer = RouteComposer::new(&client, &schedule);

        let route = composer.compose("900100003", "900003201").await.unwrap();

        assert_eq!(route.source, RouteSource::Fallback);
        assert_eq!(route.kind, "direct_connection");
    }

    #[tokio::test]
    async fn unreachable_engine_degrades_to_direct_connection() {
        let server = MockServer::start().await;
        let dead_uri = server.uri();
        drop(server);

        let client = pt_client(&dead_uri);
        let schedule = both_stops();
        let composer = RouteComposer::new(&client, &schedule);

        let route = composer.compose("900100003", "900003201").await.unwrap();

        assert_eq!(route.source, RouteSource::Fallback);
        assert_eq!(route.error.as_deref(), Some("GraphHopper not available"));
    }

    #[tokio::test]
    async fn empty_path_list_is_a_hard_miss() {
        let server = engine_returning("/route-pt", json!({"paths": []})).await;
        let client = pt_client(&server.uri());
        let schedule = both_stops();
        let composer = RouteComposer::new(&client, &schedule);

        let error = composer
            .compose("900100003", "900003201")
            .await
            .unwrap_err();
        assert!(matches!(error, ComposeError::NoRouteFound));
    }

    #[tokio::test]
    async fn missing_stop_is_reported() {
        let server = engine_returning("/route-pt", pt_body()).await;
        let client = pt_client(&server.uri());
        let schedule = StubSchedule::with_stops(vec![alexanderplatz()]);
        let composer = RouteComposer::new(&client, &schedule);

        let error = composer.compose("900100003", "nope").await.unwrap_err();
        assert!(matches!(error, ComposeError::StationsNotFound { .. }));
    }

    #[tokio::test]
    async fn identical_endpoints_are_reported_as_missing() {
        let server = engine_returning("/route-pt", pt_body()).await;
        let client = pt_client(&server.uri());
        let schedule = both_stops();
        let composer = RouteComposer::new(&client, &schedule);

        let error = composer
            .compose("900100003", "900100003")
            .await
            .unwrap_err();
        assert!(matches!(error, ComposeError::StationsNotFound { .. }));
    }

    #[tokio::test]
    async fn profile_path_without_geometry_is_an_error() {
        let body = json!({
            "paths": [{"distance": 100.0, "time": 60_000, "instructions": []}]
        });
        let server = engine_returning("/route", body).await;
        let client = foot_client(&server.uri());
        let schedule = both_stops();
        let composer = RouteComposer::new(&client, &schedule);

        let error = composer
            .compose("900100003", "900003201")
            .await
            .unwrap_err();
        assert!(matches!(error, ComposeError::MissingGeometry));
    }
}
