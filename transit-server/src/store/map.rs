//! Map store over the OSM PostGIS database.
//!
//! Reads the `planet_osm_line` and `planet_osm_point` tables produced by
//! osm2pgsql. Geometries live in web mercator and are transformed to WGS84
//! in the query; bounding-box filters use an envelope intersection so the
//! planner index is still usable.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::domain::{BoundingBox, Feature};
use crate::geo::MapFeatures;

use super::error::StoreError;
use super::rows::{FeatureRow, OsmLineRow, OsmPointRow};

/// Line payloads get big fast; cap them regardless of filtering.
const LINE_LIMIT: &str = "LIMIT 1000";

const SUBWAY_LINES: &str = r#"
SELECT osm_id, name, route, public_transport, railway, highway,
       ST_AsGeoJSON(ST_Transform(way, 4326)) AS geometry
FROM planet_osm_line
WHERE (route = 'subway' OR railway = 'subway')
LIMIT 1000
"#;

const SUBWAY_LINES_IN_BBOX: &str = r#"
SELECT osm_id, name, route, public_transport, railway, highway,
       ST_AsGeoJSON(ST_Transform(way, 4326)) AS geometry
FROM planet_osm_line
WHERE (route = 'subway' OR railway = 'subway')
  AND ST_Transform(way, 4326) && ST_MakeEnvelope($1, $2, $3, $4, 4326)
LIMIT 1000
"#;

const STOP_POINTS: &str = r#"
SELECT osm_id, name, railway,
       ST_X(ST_Transform(way, 4326)) AS lon,
       ST_Y(ST_Transform(way, 4326)) AS lat
FROM planet_osm_point
WHERE (public_transport IS NOT NULL
       OR railway IN ('station', 'halt', 'tram_stop')
       OR highway = 'bus_stop')
"#;

const STOP_POINTS_IN_BBOX: &str = r#"
SELECT osm_id, name, railway,
       ST_X(ST_Transform(way, 4326)) AS lon,
       ST_Y(ST_Transform(way, 4326)) AS lat
FROM planet_osm_point
WHERE (public_transport IS NOT NULL
       OR railway IN ('station', 'halt', 'tram_stop')
       OR highway = 'bus_stop')
  AND ST_Transform(way, 4326) && ST_MakeEnvelope($1, $2, $3, $4, 4326)
"#;

/// Queries against the OSM map database.
#[derive(Clone)]
pub struct MapStore {
    pool: PgPool,
}

impl MapStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_lines(&self, bbox: Option<&BoundingBox>) -> Result<Vec<OsmLineRow>, StoreError> {
        let rows = match bbox {
            Some(b) => {
                sqlx::query_as(SUBWAY_LINES_IN_BBOX)
                    .bind(b.west)
                    .bind(b.south)
                    .bind(b.east)
                    .bind(b.north)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => sqlx::query_as(SUBWAY_LINES).fetch_all(&self.pool).await?,
        };
        Ok(rows)
    }

    async fn fetch_points(
        &self,
        bbox: Option<&BoundingBox>,
    ) -> Result<Vec<OsmPointRow>, StoreError> {
        let rows = match bbox {
            Some(b) => {
                sqlx::query_as(STOP_POINTS_IN_BBOX)
                    .bind(b.west)
                    .bind(b.south)
                    .bind(b.east)
                    .bind(b.north)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => sqlx::query_as(STOP_POINTS).fetch_all(&self.pool).await?,
        };
        Ok(rows)
    }
}

#[async_trait]
impl MapFeatures for MapStore {
    async fn subway_lines(&self, bbox: Option<&BoundingBox>) -> Result<Vec<Feature>, StoreError> {
        let rows = self.fetch_lines(bbox).await?;
        debug!(rows = rows.len(), "loaded subway lines");

        Ok(rows
            .into_iter()
            .filter_map(|row| FeatureRow::OsmLine(row).into_feature())
            .collect())
    }

    async fn stop_points(&self, bbox: Option<&BoundingBox>) -> Result<Vec<Feature>, StoreError> {
        let rows = self.fetch_points(bbox).await?;
        debug!(rows = rows.len(), "loaded OSM stop points");

        Ok(rows
            .into_iter()
            .filter_map(|row| FeatureRow::OsmPoint(row).into_feature())
            .collect())
    }
}
