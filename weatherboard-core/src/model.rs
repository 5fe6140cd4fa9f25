use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Current conditions. Every field is independently optional; `None` means
/// the upstream payload did not carry a usable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub uvi: Option<f64>,
    pub wind_speed: Option<f64>,
    /// Weather category, e.g. `Clouds`.
    pub weather: Option<String>,
    /// Provider icon code, e.g. `04d`. Empty when unknown.
    pub icon: String,
    /// `HH:MM DD.MM.YYYY` in local time.
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// `HH:MM` in local time.
    pub time: String,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub weather: Option<String>,
    pub icon: String,
    /// Precipitation probability, 0..=100.
    pub pop: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Abbreviated weekday and `DD.MM`, e.g. `Mon 03.06`.
    pub time: String,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub weather: Option<String>,
    pub icon: String,
    /// Precipitation probability, 0..=100.
    pub pop: u8,
}

/// Normalized weather for one location, always fully shaped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// `None` only when the upstream payload was empty.
    pub current: Option<CurrentConditions>,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
}

impl WeatherRecord {
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.hourly.is_empty() && self.daily.is_empty()
    }
}

/// One entry of the dashboard handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWeather {
    pub id: String,
    pub name: String,
    pub weather: WeatherRecord,
}

impl LocationWeather {
    pub fn new(location: &Location, weather: WeatherRecord) -> Self {
        Self {
            id: location.id.clone(),
            name: location.name.clone(),
            weather,
        }
    }
}

/// Everything the presentation layer needs to render a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub locations: Vec<LocationWeather>,
    /// Opaque passthrough values, no core logic attached.
    pub webcam_id: Option<String>,
    pub radar_iframe: Option<String>,
}
