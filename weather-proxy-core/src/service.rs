//! The two-stage lookup: geocode, then fetch, then normalize.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::UpstreamConfig,
    error::LookupError,
    model::{PlaceQuery, WeatherSnapshot},
    normalize::normalize,
    provider::{Geocoder, WeatherFetcher, openweather::OpenWeatherClient},
};

/// Stateless entry point shared by every deployment shape.
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent callers.
#[derive(Clone)]
pub struct LookupService {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherFetcher>,
}

impl std::fmt::Debug for LookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupService").finish_non_exhaustive()
    }
}

impl LookupService {
    pub fn new(geocoder: Arc<dyn Geocoder>, weather: Arc<dyn WeatherFetcher>) -> Self {
        Self { geocoder, weather }
    }

    /// Wire both stages to OpenWeather using the given upstream settings.
    pub fn from_config(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Arc::new(OpenWeatherClient::new(config)?);
        Ok(Self::new(client.clone(), client))
    }

    /// Resolve a free-text place name to a weather snapshot.
    ///
    /// The weather fetch only runs after a successful geocode. Any failure is
    /// final for this call; nothing is retried.
    pub async fn resolve(&self, place_name: &str) -> Result<WeatherSnapshot, LookupError> {
        let result = self.run(place_name).await;

        if let Err(err) = &result {
            warn!(
                place = place_name,
                kind = %err.kind(),
                upstream = err.upstream().map(|u| u.as_str()),
                error = %err,
                "weather lookup failed"
            );
        }

        result
    }

    async fn run(&self, place_name: &str) -> Result<WeatherSnapshot, LookupError> {
        let place = PlaceQuery::parse(place_name)?;

        let coords = self.geocoder.geocode(&place).await?;
        let payload = self.weather.fetch_current(&coords).await?;
        let snapshot = normalize(payload)?;

        info!(
            place = %place,
            lat = coords.latitude,
            lon = coords.longitude,
            description = %snapshot.description,
            "weather lookup resolved"
        );

        Ok(snapshot)
    }
}
