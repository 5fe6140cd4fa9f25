use serde_json::Value;
use std::{sync::Arc, time::Duration};

use crate::{
    cache::WeatherCache,
    config::{Config, ConfigSource},
    error::ServiceError,
    location::{self, Location},
    model::{Dashboard, LocationWeather},
    normalize::normalize,
    provider::{OneCallRequest, WeatherProvider, empty_payload},
};

/// Cached access to upstream weather data for the configured locations.
///
/// The cache is passed in rather than created here, so callers choose whether
/// several services share one.
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    cache: Arc<WeatherCache>,
    config: Arc<dyn ConfigSource>,
}

impl WeatherService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        cache: Arc<WeatherCache>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Locations from `LOCATIONS`, or from the `LATITUDE`/`LONGITUDE`
    /// fallback. Empty when nothing usable is configured.
    pub fn locations(&self) -> Vec<Location> {
        let source = self.config.as_ref();
        location::resolve(
            Config::locations(source).as_deref(),
            &Config::single_location(source),
        )
    }

    /// Raw payload for `(lat, lon)`, from cache while younger than
    /// `refresh_interval`, otherwise fetched and cached.
    ///
    /// Failed fetches are cached as an empty payload too, so a broken
    /// upstream is retried at most once per interval.
    pub async fn get_weather(&self, lat: &str, lon: &str, refresh_interval: Duration) -> Value {
        if let Some(payload) = self.cache.get_fresh(lat, lon, refresh_interval) {
            tracing::debug!(lat, lon, "weather cache hit");
            return payload;
        }

        // The lock is not held across the fetch; concurrent misses may both
        // go upstream.
        let payload = self.fetch_upstream(lat, lon).await;
        self.cache.insert(lat, lon, payload.clone());
        payload
    }

    /// [`get_weather`](Self::get_weather) with the interval read from
    /// configuration.
    pub async fn get_weather_for(&self, lat: &str, lon: &str) -> Value {
        let refresh_interval = Config::refresh_interval(self.config.as_ref());
        self.get_weather(lat, lon, refresh_interval).await
    }

    /// One upstream request. Never fails: configuration problems and
    /// upstream errors are logged and yield an empty payload.
    pub async fn fetch_upstream(&self, lat: &str, lon: &str) -> Value {
        let source = self.config.as_ref();

        let Some(api_key) = Config::api_key(source) else {
            tracing::error!(lat, lon, "API_KEY is not configured, skipping fetch");
            return empty_payload();
        };

        if !is_coordinate(lat) || !is_coordinate(lon) {
            tracing::error!(lat, lon, "invalid coordinates, skipping fetch");
            return empty_payload();
        }

        let request = OneCallRequest {
            lat: lat.to_string(),
            lon: lon.to_string(),
            units: Config::units(source),
            api_key,
        };

        tracing::info!(lat, lon, units = %request.units, "fetching weather");

        match self.provider.fetch_one_call(&request).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(lat, lon, error = %err, "weather fetch failed");
                empty_payload()
            }
        }
    }

    /// Normalized weather for every configured location, in configuration
    /// order, plus the display passthrough values.
    pub async fn dashboard(&self) -> Result<Dashboard, ServiceError> {
        let locations = self.locations();
        if locations.is_empty() {
            return Err(ServiceError::NoLocations);
        }

        let mut entries = Vec::with_capacity(locations.len());
        for location in &locations {
            let raw = self.get_weather_for(&location.lat, &location.lon).await;
            entries.push(LocationWeather::new(location, normalize(&raw)));
        }

        let source = self.config.as_ref();
        Ok(Dashboard {
            locations: entries,
            webcam_id: Config::webcam_id(source),
            radar_iframe: Config::radar_iframe(source),
        })
    }
}

fn is_coordinate(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{API_KEY, LATITUDE, LOCATIONS, LONGITUDE, MapSource, REFRESH_INTERVAL_SECONDS, WEBCAM_ID},
        error::FetchError,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed payload and counts calls.
    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        async fn fetch_one_call(&self, request: &OneCallRequest) -> Result<Value, FetchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(FetchError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    body: "boom".into(),
                });
            }
            Ok(json!({
                "lat": request.lat,
                "current": { "temp": n as f64, "dt": 0 }
            }))
        }
    }

    fn service(provider: Arc<CountingProvider>, config: MapSource) -> WeatherService {
        WeatherService::new(provider, Arc::new(WeatherCache::new()), Arc::new(config))
    }

    fn keyed() -> MapSource {
        MapSource::new().with(API_KEY, "KEY")
    }

    #[tokio::test(start_paused = true)]
    async fn second_call_within_interval_is_served_from_cache() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), keyed());
        let ttl = Duration::from_secs(600);

        let first = svc.get_weather("47.0", "10.0", ttl).await;
        let second = svc.get_weather("47.0", "10.0", ttl).await;

        assert_eq!(provider.calls(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn call_after_interval_fetches_again() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), keyed());
        let ttl = Duration::from_secs(600);

        svc.get_weather("47.0", "10.0", ttl).await;
        tokio::time::advance(Duration::from_secs(601)).await;
        let refreshed = svc.get_weather("47.0", "10.0", ttl).await;

        assert_eq!(provider.calls(), 2);
        assert_eq!(refreshed["current"]["temp"], json!(2.0));
        assert_eq!(svc.cache().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_coordinates_are_cached_separately() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), keyed());
        let ttl = Duration::from_secs(600);

        svc.get_weather("47.0", "10.0", ttl).await;
        svc.get_weather("47.1", "10.2", ttl).await;
        svc.get_weather("47.0", "10.0", ttl).await;

        assert_eq!(provider.calls(), 2);
        assert_eq!(svc.cache().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_cached_as_empty() {
        let provider = Arc::new(CountingProvider::failing());
        let svc = service(provider.clone(), keyed());
        let ttl = Duration::from_secs(600);

        let first = svc.get_weather("47.0", "10.0", ttl).await;
        let second = svc.get_weather("47.0", "10.0", ttl).await;

        assert_eq!(first, json!({}));
        assert_eq!(second, json!({}));
        assert_eq!(provider.calls(), 1);
        assert!(normalize(&first).is_empty());
    }

    #[tokio::test]
    async fn missing_api_key_skips_upstream() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), MapSource::new());

        let payload = svc.get_weather("47.0", "10.0", Duration::from_secs(600)).await;

        assert_eq!(payload, json!({}));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_coordinates_skip_upstream() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), keyed());

        for (lat, lon) in [("", "10.0"), ("north", "10.0"), ("47.0", "inf")] {
            assert_eq!(svc.fetch_upstream(lat, lon).await, json!({}));
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_interval_is_read_from_config_per_call() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), keyed().with(REFRESH_INTERVAL_SECONDS, "60"));

        svc.get_weather_for("47.0", "10.0").await;
        tokio::time::advance(Duration::from_secs(30)).await;
        svc.get_weather_for("47.0", "10.0").await;
        assert_eq!(provider.calls(), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        svc.get_weather_for("47.0", "10.0").await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dashboard_keeps_configuration_order() {
        let provider = Arc::new(CountingProvider::default());
        let config = keyed()
            .with(LOCATIONS, "Home:47.0,10.0;;Office:47.1,10.2")
            .with(WEBCAM_ID, "cam-7");
        let svc = service(provider.clone(), config);

        let dashboard = svc.dashboard().await.expect("dashboard");

        let ids: Vec<&str> = dashboard.locations.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["location-1", "location-3"]);
        assert_eq!(dashboard.locations[1].name, "Office");
        assert!(dashboard.locations.iter().all(|l| l.weather.current.is_some()));
        assert_eq!(dashboard.webcam_id.as_deref(), Some("cam-7"));
        assert_eq!(dashboard.radar_iframe, None);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn dashboard_uses_single_location_fallback() {
        let provider = Arc::new(CountingProvider::default());
        let config = keyed().with(LATITUDE, "47.0").with(LONGITUDE, "10.0");
        let svc = service(provider, config);

        let dashboard = svc.dashboard().await.expect("dashboard");
        assert_eq!(dashboard.locations.len(), 1);
        assert_eq!(dashboard.locations[0].id, "location-1");
    }

    #[tokio::test]
    async fn dashboard_without_locations_is_a_config_error() {
        let provider = Arc::new(CountingProvider::default());
        let svc = service(provider.clone(), keyed().with(LOCATIONS, "bad;;worse"));

        let err = svc.dashboard().await.unwrap_err();
        assert!(matches!(err, ServiceError::NoLocations));
        assert_eq!(provider.calls(), 0);
    }
}
