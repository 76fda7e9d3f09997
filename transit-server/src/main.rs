use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use transit_server::cache::{CacheConfig, TileCache};
use transit_server::config::AppConfig;
use transit_server::geo::GeoQueries;
use transit_server::routing::GraphHopperClient;
use transit_server::store::{MapStore, TransitStore};
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transit_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Lazy pools: the server starts and serves fallbacks even when a
    // database is down.
    let osm_pool = PgPool::connect_lazy(&config.osm_db.url()).expect("invalid OSM database URL");
    let gtfs_pool = PgPool::connect_lazy(&config.gtfs_db.url()).expect("invalid GTFS database URL");

    ping(&osm_pool, &config.osm_db.name).await;
    ping(&gtfs_pool, &config.gtfs_db.name).await;

    ensure_trgm(&osm_pool, &config.osm_db.name).await;
    ensure_trgm(&gtfs_pool, &config.gtfs_db.name).await;

    let map_store = MapStore::new(osm_pool);
    let transit_store = TransitStore::new(gtfs_pool);

    let geo = GeoQueries::new(
        Arc::new(map_store),
        Arc::new(transit_store.clone()),
        TileCache::new(&CacheConfig::new()),
        config.stops_source,
    );

    let routing =
        GraphHopperClient::new(config.routing.clone()).expect("failed to create routing client");
    info!(
        mode = config.routing.mode.profile_label(),
        url = config.routing.base_url,
        stops = config.stops_source.as_str(),
        "configured"
    );

    let state = AppState::new(geo, transit_store, routing, config.expose_errors);
    let app = create_router(state);

    let port = config.port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("Transit map server listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET    http://localhost:{port}/api/stops            - Stop features (bbox optional)");
    println!("  GET    http://localhost:{port}/api/routes           - Subway line features");
    println!("  GET    http://localhost:{port}/api/stations/search  - Fuzzy station search");
    println!("  GET    http://localhost:{port}/api/routes/calculate - Route between two stops");
    println!("  GET    http://localhost:{port}/health               - Health check");
    println!("  GET    http://localhost:{port}/cache/stats          - Cache summary");
    println!("  DELETE http://localhost:{port}/cache                - Clear cache");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Fire a ping at a lazily connected pool so a down database shows up at
/// startup instead of on the first request.
async fn ping(pool: &PgPool, name: &str) {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => info!(db = name, "database reachable"),
        Err(error) => warn!(db = name, %error, "database not reachable, continuing anyway"),
    }
}

/// Fuzzy search needs pg_trgm; without it similarity queries fail and the
/// search endpoint degrades to errors, so try to install it up front.
async fn ensure_trgm(pool: &PgPool, name: &str) {
    if let Err(error) = sqlx::query("CREATE EXTENSION IF NOT EXISTS pg_trgm")
        .execute(pool)
        .await
    {
        warn!(db = name, %error, "could not install pg_trgm extension");
    }
}
