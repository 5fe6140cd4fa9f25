use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::FetchError;

use super::{OneCallRequest, WeatherProvider, empty_payload};

pub const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("weatherboard/", env!("CARGO_PKG_VERSION"));
// Minutely data and alerts are never displayed.
const EXCLUDE: &str = "minutely,alerts";

/// OpenWeatherMap One Call 3.0 client.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    http: Client,
    base_url: String,
}

impl OpenWeatherProvider {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(OPENWEATHER_API_BASE)
    }

    /// Point the client somewhere other than the public API, e.g. a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_one_call(&self, request: &OneCallRequest) -> Result<Value, FetchError> {
        let url = format!("{}/data/3.0/onecall", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", request.lat.as_str()),
                ("lon", request.lon.as_str()),
                ("exclude", EXCLUDE),
                ("units", request.units.as_str()),
                ("appid", request.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::from_transport)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: Value = serde_json::from_str(&body)?;

        Ok(match parsed {
            Value::Object(_) => parsed,
            _ => empty_payload(),
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
