//! Application state for the web layer.

use std::sync::Arc;

use crate::geo::GeoQueries;
use crate::routing::GraphHopperClient;
use crate::store::TransitStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached map-layer queries
    pub geo: Arc<GeoQueries>,

    /// GTFS schedule store (search, stop pairs, route names)
    pub schedule: Arc<TransitStore>,

    /// Routing engine client
    pub routing: Arc<GraphHopperClient>,

    /// Include failure details in error bodies (development only)
    pub expose_errors: bool,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        geo: GeoQueries,
        schedule: TransitStore,
        routing: GraphHopperClient,
        expose_errors: bool,
    ) -> Self {
        Self {
            geo: Arc::new(geo),
            schedule: Arc::new(schedule),
            routing: Arc::new(routing),
            expose_errors,
        }
    }
}
