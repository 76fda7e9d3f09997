//! Straight-line fallback for when the routing engine is unreachable.

use crate::domain::{Geometry, LatLng, StopRecord};

use super::{ComposedRoute, RouteSource};

/// Error note attached to substituted routes.
pub(super) const ENGINE_UNAVAILABLE: &str = "GraphHopper not available";

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates, in kilometres.
pub fn haversine_km(from: LatLng, to: LatLng) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Two-point line between two stops, `[lon, lat]` order.
pub(super) fn straight_line(from: &StopRecord, to: &StopRecord) -> Geometry {
    Geometry::LineString {
        coordinates: vec![vec![from.lon, from.lat], vec![to.lon, to.lat]],
    }
}

/// Build a straight-line connection between two stops.
///
/// The caller still gets a drawable two-point geometry and a haversine
/// distance estimate; duration is unknowable without an engine and is
/// reported as zero, with an `error` note explaining the degradation.
pub(super) fn direct_connection(from: StopRecord, to: StopRecord) -> ComposedRoute {
    let origin = LatLng {
        lat: from.lat,
        lng: from.lon,
    };
    let destination = LatLng {
        lat: to.lat,
        lng: to.lon,
    };

    let geometry = straight_line(&from, &to);

    ComposedRoute {
        distance_km: haversine_km(origin, destination),
        duration_secs: 0.0,
        kind: "direct_connection".to_string(),
        profile: None,
        source: RouteSource::Fallback,
        geometry,
        instructions: Vec::new(),
        transfers: None,
        legs: None,
        error: Some(ENGINE_UNAVAILABLE.to_string()),
        from,
        to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lng: f64) -> LatLng {
        LatLng { lat, lng }
    }

    #[test]
    fn zero_distance_for_identical_points() {
        let p = at(52.52, 13.40);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn known_distance_across_central_berlin() {
        let d = haversine_km(at(52.52, 13.40), at(52.53, 13.41));
        assert!((d - 1.302).abs() < 0.005, "got {d}");
    }

    #[test]
    fn direct_connection_shape() {
        let from = StopRecord {
            id: "a".to_string(),
            name: "A".to_string(),
            lat: 52.52,
            lon: 13.40,
        };
        let to = StopRecord {
            id: "b".to_string(),
            name: "B".to_string(),
            lat: 52.53,
            lon: 13.41,
        };

        let route = direct_connection(from, to);

        assert_eq!(route.kind, "direct_connection");
        assert!(route.profile.is_none());
        assert_eq!(route.source, RouteSource::Fallback);
        assert_eq!(route.duration_secs, 0.0);
        assert_eq!(route.error.as_deref(), Some("GraphHopper not available"));
        assert!(route.instructions.is_empty());
        assert!(route.transfers.is_none());
        assert!(route.legs.is_none());
        assert_eq!(
            route.geometry,
            Geometry::LineString {
                coordinates: vec![vec![13.40, 52.52], vec![13.41, 52.53]],
            }
        );
        assert!((route.distance_km - haversine_km(at(52.52, 13.40), at(52.53, 13.41))).abs() < 1e-12);
    }
}
