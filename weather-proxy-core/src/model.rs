use serde::{Deserialize, Serialize};

use crate::error::{LookupError, Upstream};

/// Longest place name accepted, in characters.
pub const MAX_PLACE_NAME_CHARS: usize = 100;

/// A trimmed, non-empty, length-bounded place name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery(String);

impl PlaceQuery {
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(LookupError::InvalidQuery("place name is empty".to_string()));
        }

        let len = trimmed.chars().count();
        if len > MAX_PLACE_NAME_CHARS {
            return Err(LookupError::InvalidQuery(format!(
                "place name is {len} characters, limit is {MAX_PLACE_NAME_CHARS}"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Reject coordinates outside the WGS84 range. A geocoder handing these
    /// back is in breach of its contract.
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, LookupError> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);

        if !lat_ok || !lon_ok {
            return Err(LookupError::malformed(
                Upstream::Geocoding,
                format!("coordinates out of range: lat={latitude}, lon={longitude}"),
            ));
        }

        Ok(Self { latitude, longitude })
    }
}

/// Current-conditions payload from the weather provider, reduced to the
/// fields the snapshot needs. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWeatherPayload {
    pub weather: Vec<RawCondition>,
    pub main: RawMain,
    pub wind: RawWind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWind {
    pub speed: f64,
}

/// Normalized current weather returned to callers.
///
/// Temperature is in °C, humidity in %, wind speed in m/s. `precipitation`
/// is part of the front-end contract but no upstream field feeds it yet, so it
/// is always absent and omitted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub description: String,
    pub icon: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
}
