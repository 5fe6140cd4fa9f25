use std::{collections::HashMap, time::Duration};

use crate::location::SingleLocation;

pub const API_KEY: &str = "API_KEY";
pub const LOCATIONS: &str = "LOCATIONS";
pub const LATITUDE: &str = "LATITUDE";
pub const LONGITUDE: &str = "LONGITUDE";
pub const LOCATION_NAME: &str = "LOCATION_NAME";
pub const UNITS: &str = "UNITS";
pub const REFRESH_INTERVAL_SECONDS: &str = "REFRESH_INTERVAL_SECONDS";
pub const WEBCAM_ID: &str = "WEBCAM_ID";
pub const RADAR_IFRAME: &str = "RADAR_IFRAME";

pub const DEFAULT_UNITS: &str = "metric";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Somewhere configuration values can be looked up by name.
///
/// Values are read on every call rather than captured at startup, so a
/// source backed by the process environment picks up changes immediately.
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads configuration from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory configuration, handy for tests and for embedding the core
/// behind something other than environment variables.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }
}

impl<K, V> FromIterator<(K, V)> for MapSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Typed accessors over a [`ConfigSource`].
///
/// Blank values are treated the same as missing ones.
pub struct Config;

impl Config {
    fn value(source: &dyn ConfigSource, key: &str) -> Option<String> {
        source
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn api_key(source: &dyn ConfigSource) -> Option<String> {
        Self::value(source, API_KEY)
    }

    pub fn units(source: &dyn ConfigSource) -> String {
        Self::value(source, UNITS).unwrap_or_else(|| DEFAULT_UNITS.to_string())
    }

    /// Raw multi-location string, e.g. `Home:47.0,10.0;Office:47.1,10.2`.
    pub fn locations(source: &dyn ConfigSource) -> Option<String> {
        Self::value(source, LOCATIONS)
    }

    /// Single-location fallback used when `LOCATIONS` is not set.
    pub fn single_location(source: &dyn ConfigSource) -> SingleLocation {
        SingleLocation {
            lat: Self::value(source, LATITUDE),
            lon: Self::value(source, LONGITUDE),
            name: Self::value(source, LOCATION_NAME),
        }
    }

    /// Cache TTL per location. Falls back to 600 seconds when the value is
    /// missing, and logs a warning when it is present but not a non-negative
    /// whole number of seconds (so `-5` and `1.5` are rejected).
    pub fn refresh_interval(source: &dyn ConfigSource) -> Duration {
        let Some(raw) = Self::value(source, REFRESH_INTERVAL_SECONDS) else {
            return DEFAULT_REFRESH_INTERVAL;
        };

        match raw.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(err) => {
                tracing::warn!(
                    value = %raw,
                    error = %err,
                    "invalid {REFRESH_INTERVAL_SECONDS}, using default of {}s",
                    DEFAULT_REFRESH_INTERVAL.as_secs()
                );
                DEFAULT_REFRESH_INTERVAL
            }
        }
    }

    pub fn webcam_id(source: &dyn ConfigSource) -> Option<String> {
        Self::value(source, WEBCAM_ID)
    }

    pub fn radar_iframe(source: &dyn ConfigSource) -> Option<String> {
        Self::value(source, RADAR_IFRAME)
    }
}
