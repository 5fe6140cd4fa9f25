use parking_lot::Mutex;
use serde_json::Value;
use std::{collections::HashMap, time::Duration};
use tokio::time::Instant;

/// Cache key: the coordinate strings exactly as configured.
pub type CoordinateKey = (String, String);

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    fetched_at: Instant,
}

/// Raw upstream payloads per coordinate pair.
///
/// Entries are overwritten in place on refresh and never evicted; the set of
/// keys is bounded by the configured locations. Whoever constructs the cache
/// decides how widely it is shared, typically one `Arc<WeatherCache>` per
/// process.
#[derive(Debug, Default)]
pub struct WeatherCache {
    entries: Mutex<HashMap<CoordinateKey, CacheEntry>>,
}

impl WeatherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached payload for `(lat, lon)` if it is younger than `max_age`.
    pub fn get_fresh(&self, lat: &str, lon: &str, max_age: Duration) -> Option<Value> {
        let entries = self.entries.lock();
        let entry = entries.get(&(lat.to_string(), lon.to_string()))?;

        (entry.fetched_at.elapsed() < max_age).then(|| entry.payload.clone())
    }

    /// Store `payload` for `(lat, lon)`, stamped with the current time.
    pub fn insert(&self, lat: &str, lon: &str, payload: Value) {
        self.entries.lock().insert(
            (lat.to_string(), lon.to_string()),
            CacheEntry {
                payload,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Number of distinct coordinate pairs ever stored.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
