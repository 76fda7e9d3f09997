//! Database-backed stores for the two logical datasets.
//!
//! The map store reads the OSM/PostGIS database, the transit store the GTFS
//! schedule database. Both project their rows through the adapters in
//! [`rows`] so the rest of the service only sees canonical domain types.

mod error;
mod map;
mod rows;
mod transit;

pub use error::StoreError;
pub use map::MapStore;
pub use rows::{
    FeatureRow, GtfsStopRow, OsmLineRow, OsmPointRow, StationSearchRow, StopPairRow,
};
pub use transit::TransitStore;
