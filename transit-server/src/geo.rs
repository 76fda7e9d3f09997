//! Cached read path for map-layer queries.
//!
//! [`GeoQueries`] sits between the HTTP handlers and the stores: it picks
//! the configured stops dataset, answers repeated viewport queries from the
//! tile cache, and always hands back a ready-to-serialize collection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{CacheKey, CacheStats, QueryKind, TileCache};
use crate::domain::{BoundingBox, Feature, FeatureCollection};
use crate::store::StoreError;

/// Read access to OSM-derived map features.
#[async_trait]
pub trait MapFeatures: Send + Sync {
    /// Subway lines, optionally restricted to a bounding box.
    async fn subway_lines(&self, bbox: Option<&BoundingBox>) -> Result<Vec<Feature>, StoreError>;

    /// Public-transport stop points, optionally restricted to a bounding box.
    async fn stop_points(&self, bbox: Option<&BoundingBox>) -> Result<Vec<Feature>, StoreError>;
}

/// Read access to schedule-derived map features.
#[async_trait]
pub trait ScheduleFeatures: Send + Sync {
    /// Stops from the timetable, optionally restricted to a bounding box.
    async fn stops(&self, bbox: Option<&BoundingBox>) -> Result<Vec<Feature>, StoreError>;
}

/// Which dataset backs the stops layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopsSource {
    #[default]
    Gtfs,
    Osm,
}

impl StopsSource {
    /// Lenient parse: anything other than "osm" selects the GTFS dataset.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("osm") {
            StopsSource::Osm
        } else {
            StopsSource::Gtfs
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StopsSource::Gtfs => "gtfs",
            StopsSource::Osm => "osm",
        }
    }
}

/// Map-layer queries with a shared tile cache in front.
pub struct GeoQueries {
    map: Arc<dyn MapFeatures>,
    schedule: Arc<dyn ScheduleFeatures>,
    cache: TileCache,
    source: StopsSource,
}

impl GeoQueries {
    pub fn new(
        map: Arc<dyn MapFeatures>,
        schedule: Arc<dyn ScheduleFeatures>,
        cache: TileCache,
        source: StopsSource,
    ) -> Self {
        Self {
            map,
            schedule,
            cache,
            source,
        }
    }

    /// Stop features for the viewport, from whichever dataset is configured.
    ///
    /// Bounded queries are cached per quantized bounding box; unbounded
    /// queries always go to the store.
    pub async fn stops(
        &self,
        bbox: Option<&BoundingBox>,
    ) -> Result<Arc<FeatureCollection>, StoreError> {
        let key = bbox.map(|bbox| CacheKey::new(QueryKind::Stops, bbox));
        if let Some(key) = &key {
            if let Some(hit) = self.cache.get(key) {
                debug!(key = %key, "tile cache hit");
                return Ok(hit);
            }
        }

        let features = match self.source {
            StopsSource::Gtfs => self.schedule.stops(bbox).await?,
            StopsSource::Osm => self.map.stop_points(bbox).await?,
        };
        debug!(
            source = self.source.as_str(),
            count = features.len(),
            "fetched stops"
        );

        Ok(self.store(key, features))
    }

    /// Subway line features for the viewport.
    pub async fn lines(
        &self,
        bbox: Option<&BoundingBox>,
    ) -> Result<Arc<FeatureCollection>, StoreError> {
        let key = bbox.map(|bbox| CacheKey::new(QueryKind::Routes, bbox));
        if let Some(key) = &key {
            if let Some(hit) = self.cache.get(key) {
                debug!(key = %key, "tile cache hit");
                return Ok(hit);
            }
        }

        let features = self.map.subway_lines(bbox).await?;
        debug!(count = features.len(), "fetched subway lines");

        Ok(self.store(key, features))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached tile, returning how many were held.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    fn store(&self, key: Option<CacheKey>, features: Vec<Feature>) -> Arc<FeatureCollection> {
        let collection = Arc::new(FeatureCollection::new(features));
        if let Some(key) = key {
            self.cache.insert(key, Arc::clone(&collection));
        }
        collection
    }
}
