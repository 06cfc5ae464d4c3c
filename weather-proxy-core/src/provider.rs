use async_trait::async_trait;

use crate::{
    error::LookupError,
    model::{Coordinates, PlaceQuery, RawWeatherPayload},
};

pub mod openweather;

/// Resolves a place name to a single best-match coordinate pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Fails with [`LookupError::NotFound`] when the provider has no match.
    async fn geocode(&self, place: &PlaceQuery) -> Result<Coordinates, LookupError>;
}

/// Fetches current conditions, in metric units, for a coordinate pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn fetch_current(&self, coords: &Coordinates) -> Result<RawWeatherPayload, LookupError>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
