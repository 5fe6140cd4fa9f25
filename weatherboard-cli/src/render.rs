use std::fmt::Write;

use weatherboard_core::{Dashboard, Location, LocationWeather, WeatherRecord};

/// Shown wherever a value is unavailable.
const MISSING: &str = "-";

fn num(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.1}"))
}

fn text(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

/// One line per location: id, name and coordinates.
pub fn render_locations(locations: &[Location]) -> String {
    let mut output = String::new();
    for loc in locations {
        let _ = writeln!(output, "{}  {}  ({},{})", loc.id, loc.name, loc.lat, loc.lon);
    }
    output
}

/// Formats the whole dashboard into a human-readable string.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    for entry in &dashboard.locations {
        output.push_str(&render_location(entry));
        output.push('\n');
    }

    if let Some(webcam) = &dashboard.webcam_id {
        let _ = writeln!(output, "Webcam: {webcam}");
    }
    if let Some(radar) = &dashboard.radar_iframe {
        let _ = writeln!(output, "Radar: {radar}");
    }

    output
}

fn render_location(entry: &LocationWeather) -> String {
    let mut output = format!("== {} [{}]\n", entry.name, entry.id);
    render_record(&mut output, &entry.weather);
    output
}

fn render_record(output: &mut String, record: &WeatherRecord) {
    if record.is_empty() {
        output.push_str("  No weather data available.\n");
        return;
    }

    if let Some(c) = &record.current {
        let _ = writeln!(
            output,
            "  Now ({}): {} {}\n    Temperature: {} (feels like {})\n    Humidity: {}  Pressure: {}  UV index: {}  Wind: {}",
            c.time,
            text(c.weather.as_deref()),
            c.icon,
            num(c.temp),
            num(c.feels_like),
            num(c.humidity),
            num(c.pressure),
            num(c.uvi),
            num(c.wind_speed),
        );
    }

    if !record.hourly.is_empty() {
        output.push_str("  Hourly:\n");
        for h in &record.hourly {
            let _ = writeln!(
                output,
                "    {}  {:>6}  {:>3}%  hum {}  wind {}  {}",
                h.time,
                num(h.temp),
                h.pop,
                num(h.humidity),
                num(h.wind_speed),
                text(h.weather.as_deref()),
            );
        }
    }

    if !record.daily.is_empty() {
        output.push_str("  Daily:\n");
        for d in &record.daily {
            let _ = writeln!(
                output,
                "    {}  {} / {}  {:>3}%  hum {}  wind {}  {}",
                d.time,
                num(d.temp_min),
                num(d.temp_max),
                d.pop,
                num(d.humidity),
                num(d.wind_speed),
                text(d.weather.as_deref()),
            );
        }
    }
}
