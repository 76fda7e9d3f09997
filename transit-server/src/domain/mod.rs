//! Core domain types shared across the service.

mod bbox;
mod feature;
mod station;

pub use bbox::{BboxParseError, BoundingBox};
pub use feature::{Feature, FeatureCollection, FeatureId, FeatureProperties, Geometry};
pub use station::{LatLng, RouteNames, StationHit, StopKind, StopRecord};
