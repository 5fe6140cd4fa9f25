use serde::Serialize;

/// Display name used by the single-location fallback when none is configured.
pub const DEFAULT_LOCATION_NAME: &str = "Your Location";

/// A named coordinate pair from configuration.
///
/// Coordinates are kept as the exact strings the operator wrote; they double
/// as the cache key, so `47.0` and `47.00` are different locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub lat: String,
    pub lon: String,
}

/// Separate latitude/longitude/name values used when no multi-location
/// string is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleLocation {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
enum ClauseError {
    #[error("expected `lat,lon`, got {0:?}")]
    Coordinates(String),
}

/// Resolve the configured locations, in configuration order.
///
/// `raw` has the form `name:lat,lon;name:lat,lon;...` where the name is
/// optional. Empty clauses are skipped silently, malformed ones are logged
/// and skipped. Ids and generated names use the 1-based clause position, so
/// a skipped clause leaves a gap rather than shifting later ids.
///
/// An empty result means nothing usable is configured.
pub fn resolve(raw: Option<&str>, fallback: &SingleLocation) -> Vec<Location> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => resolve_many(raw),
        None => resolve_single(fallback).into_iter().collect(),
    }
}

fn resolve_single(fallback: &SingleLocation) -> Option<Location> {
    let lat = non_blank(fallback.lat.as_deref());
    let lon = non_blank(fallback.lon.as_deref());

    let (Some(lat), Some(lon)) = (lat, lon) else {
        tracing::error!(
            lat = ?fallback.lat,
            lon = ?fallback.lon,
            "no LOCATIONS configured and LATITUDE/LONGITUDE incomplete"
        );
        return None;
    };

    let name = non_blank(fallback.name.as_deref()).unwrap_or(DEFAULT_LOCATION_NAME);

    Some(Location {
        id: location_id(1),
        name: name.to_string(),
        lat: lat.to_string(),
        lon: lon.to_string(),
    })
}

fn resolve_many(raw: &str) -> Vec<Location> {
    let mut locations = Vec::new();

    for (idx, clause) in raw.split(';').enumerate() {
        let position = idx + 1;
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }

        match parse_clause(clause, position) {
            Ok(location) => locations.push(location),
            Err(err) => {
                tracing::warn!(clause, position, "skipping location clause: {err}");
            }
        }
    }

    locations
}

fn parse_clause(clause: &str, position: usize) -> Result<Location, ClauseError> {
    let (name, coords) = match clause.split_once(':') {
        Some((name, coords)) => (non_blank(Some(name)), coords),
        None => (None, clause),
    };

    let tokens: Vec<&str> = coords.split(',').map(str::trim).collect();
    let [lat, lon] = tokens.as_slice() else {
        return Err(ClauseError::Coordinates(coords.to_string()));
    };
    if lat.is_empty() || lon.is_empty() {
        return Err(ClauseError::Coordinates(coords.to_string()));
    }

    Ok(Location {
        id: location_id(position),
        name: name
            .map(str::to_string)
            .unwrap_or_else(|| format!("Location {position}")),
        lat: lat.to_string(),
        lon: lon.to_string(),
    })
}

fn location_id(position: usize) -> String {
    format!("location-{position}")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
