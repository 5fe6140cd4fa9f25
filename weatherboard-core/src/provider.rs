use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt::{self, Debug};

use crate::error::FetchError;

pub mod openweather;

/// Parameters of a single "current + hourly + daily" request.
#[derive(Clone, PartialEq, Eq)]
pub struct OneCallRequest {
    pub lat: String,
    pub lon: String,
    pub units: String,
    pub api_key: String,
}

impl Debug for OneCallRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneCallRequest")
            .field("lat", &self.lat)
            .field("lon", &self.lon)
            .field("units", &self.units)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Upstream source of raw weather payloads.
///
/// Implementations report failures as [`FetchError`]; turning those into an
/// empty payload is the caller's job.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_one_call(&self, request: &OneCallRequest) -> Result<Value, FetchError>;
}

/// The payload handed out whenever there is nothing to show.
pub fn empty_payload() -> Value {
    Value::Object(Map::new())
}
