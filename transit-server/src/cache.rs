//! In-memory TTL cache for bounded-area feature queries.
//!
//! Keys quantize the bounding box to two decimal places, so nearby viewports
//! collide onto one entry on purpose: at city zoom levels the lost precision
//! is invisible and the hit rate is much better. Expired entries are evicted
//! lazily on the next `get` that touches them; there is no background sweep
//! and no capacity bound. `clear` (and process exit) are the only other ways
//! entries leave the map.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

use crate::domain::{BoundingBox, FeatureCollection};

/// Default cache TTL: 5 minutes.
const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Which feature query a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Stops,
    Routes,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Stops => "stops",
            QueryKind::Routes => "routes",
        }
    }
}

/// Cache key: query kind plus the bounding box quantized to 2 decimal places.
///
/// The rendered form (`stops:13.38,52.51,13.43,52.53`) is visible through
/// `/cache/stats`, so it stays human-readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(kind: QueryKind, bbox: &BoundingBox) -> Self {
        Self(format!(
            "{}:{:.2},{:.2},{:.2},{:.2}",
            kind.as_str(),
            bbox.west,
            bbox.south,
            bbox.east,
            bbox.north
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for the tile cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry remains valid.
    pub ttl: Duration,
}

impl CacheConfig {
    /// Create a config with the default TTL (5 minutes).
    pub fn new() -> Self {
        Self { ttl: DEFAULT_TTL }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the cache state, served by `/cache/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
    pub ttl_minutes: u64,
}

struct CacheEntry {
    payload: Arc<FeatureCollection>,
    created_at: Instant,
}

/// Process-wide feature cache keyed by quantized bounding box and query kind.
///
/// Handlers share one instance through the application state; the store-wide
/// mutex is held only for map operations, never across an await point.
pub struct TileCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl TileCache {
    /// Create an empty cache with the given config.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: config.ttl,
        }
    }

    /// Look up a payload, evicting it first if it has expired.
    ///
    /// An entry whose age equals the TTL exactly counts as expired.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<FeatureCollection>> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &CacheKey, now: Instant) -> Option<Arc<FeatureCollection>> {
        let mut entries = self.entries.lock();
        let entry = entries.get(key)?;

        let age = now.saturating_duration_since(entry.created_at);
        if age >= self.ttl {
            entries.remove(key);
            return None;
        }

        Some(Arc::clone(&entry.payload))
    }

    /// Store a payload under the given key, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, payload: Arc<FeatureCollection>) {
        self.insert_at(key, payload, Instant::now());
    }

    fn insert_at(&self, key: CacheKey, payload: Arc<FeatureCollection>, now: Instant) {
        let mut entries = self.entries.lock();
        entries.insert(
            key,
            CacheEntry {
                payload,
                created_at: now,
            },
        );
    }

    /// Drop every entry, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock();
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// Number of stored entries. Expired entries still count until an access
    /// evicts them.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of size, keys, and TTL for the stats endpoint.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        let mut keys: Vec<String> = entries.keys().map(|k| k.to_string()).collect();
        keys.sort();

        CacheStats {
            size: entries.len(),
            keys,
            ttl_minutes: self.ttl.as_secs() / 60,
        }
    }
}
