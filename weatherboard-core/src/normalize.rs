//! Turns a raw One Call payload into a [`WeatherRecord`].
//!
//! Every lookup falls back independently, so a partial or oddly typed
//! payload still produces a complete record. Nothing here logs on bad
//! fields; missing data is routine.

use chrono::{DateTime, Local, TimeZone};
use serde_json::{Map, Value};

use crate::model::{CurrentConditions, DailyPoint, HourlyPoint, WeatherRecord};

pub const MAX_HOURLY: usize = 36;
pub const MAX_DAILY: usize = 10;

const CURRENT_FORMAT: &str = "%H:%M %d.%m.%Y";
const HOURLY_FORMAT: &str = "%H:%M";
const DAILY_FORMAT: &str = "%a %d.%m";

/// Normalize using the local time zone for timestamps.
pub fn normalize(payload: &Value) -> WeatherRecord {
    normalize_in(payload, &Local)
}

/// Normalize, formatting timestamps in `tz`.
pub fn normalize_in<Tz>(payload: &Value, tz: &Tz) -> WeatherRecord
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(data) = payload.as_object().filter(|m| !m.is_empty()) else {
        return WeatherRecord::default();
    };

    let empty = Map::new();

    let current = data.get("current").and_then(Value::as_object).unwrap_or(&empty);
    let current = current_conditions(current, tz);

    let hourly: Vec<HourlyPoint> = entries(data, "hourly")
        .take(MAX_HOURLY)
        .map(|hour| hourly_point(hour.as_object().unwrap_or(&empty), tz))
        .collect();

    let daily: Vec<DailyPoint> = entries(data, "daily")
        .take(MAX_DAILY)
        .map(|day| daily_point(day.as_object().unwrap_or(&empty), tz))
        .collect();

    if !hourly.is_empty() {
        let sample: Vec<u8> = hourly.iter().take(3).map(|h| h.pop).collect();
        tracing::debug!(?sample, "sample pop values");
    }

    WeatherRecord {
        current: Some(current),
        hourly,
        daily,
    }
}

/// Precipitation probability as a whole percentage.
///
/// The upstream fraction is clamped to `[0, 1]` and truncated toward zero
/// after scaling, so `0.734` becomes `73`. Anything that isn't a finite
/// number counts as `0`.
pub fn pop_percent(value: Option<&Value>) -> u8 {
    let fraction = value
        .and_then(number)
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);

    (fraction * 100.0).trunc().clamp(0.0, 100.0) as u8
}

fn current_conditions<Tz>(current: &Map<String, Value>, tz: &Tz) -> CurrentConditions
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let (weather, icon) = descriptor(current);

    CurrentConditions {
        temp: field(current, "temp"),
        feels_like: field(current, "feels_like"),
        humidity: field(current, "humidity"),
        pressure: field(current, "pressure"),
        uvi: field(current, "uvi"),
        wind_speed: field(current, "wind_speed"),
        weather,
        icon,
        time: format_timestamp(current, tz, CURRENT_FORMAT),
    }
}

fn hourly_point<Tz>(hour: &Map<String, Value>, tz: &Tz) -> HourlyPoint
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let (weather, icon) = descriptor(hour);

    HourlyPoint {
        time: format_timestamp(hour, tz, HOURLY_FORMAT),
        temp: field(hour, "temp"),
        humidity: field(hour, "humidity"),
        wind_speed: field(hour, "wind_speed"),
        weather,
        icon,
        pop: pop_percent(hour.get("pop")),
    }
}

fn daily_point<Tz>(day: &Map<String, Value>, tz: &Tz) -> DailyPoint
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let (weather, icon) = descriptor(day);
    let temp = day.get("temp").and_then(Value::as_object);

    DailyPoint {
        time: format_timestamp(day, tz, DAILY_FORMAT),
        temp_min: temp.and_then(|t| field(t, "min")),
        temp_max: temp.and_then(|t| field(t, "max")),
        humidity: field(day, "humidity"),
        wind_speed: field(day, "wind_speed"),
        weather,
        icon,
        pop: pop_percent(day.get("pop")),
    }
}

fn entries<'a>(data: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Value> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|a| a.as_slice())
        .unwrap_or_default()
        .iter()
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(number)
}

/// Category label and icon from the first `weather` descriptor.
fn descriptor(map: &Map<String, Value>) -> (Option<String>, String) {
    let first = map
        .get("weather")
        .and_then(Value::as_array)
        .and_then(|w| w.first())
        .and_then(Value::as_object);

    let text = |key: &str| {
        first
            .and_then(|w| w.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    (text("main"), text("icon").unwrap_or_default())
}

// A missing or unusable `dt` formats as the epoch instant, not a placeholder.
fn format_timestamp<Tz>(map: &Map<String, Value>, tz: &Tz, fmt: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let secs = map
        .get("dt")
        .and_then(number)
        .filter(|s| s.is_finite())
        .map_or(0, |s| s.trunc() as i64);

    let instant = DateTime::from_timestamp(secs, 0)
        .unwrap_or_default()
        .with_timezone(tz);

    instant.format(fmt).to_string()
}
