use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    config::UpstreamConfig,
    error::{LookupError, Upstream},
    model::{Coordinates, PlaceQuery, RawWeatherPayload},
};

use super::{Geocoder, WeatherFetcher, truncate_body};

const USER_AGENT: &str = concat!("weather-proxy/", env!("CARGO_PKG_VERSION"));

/// OpenWeather client serving both the direct-geocoding and the
/// current-weather endpoints with one API key.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    geocoding_url: String,
    weather_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let api_key = config.api_key()?.to_owned();

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            geocoding_url: config.geocoding_url.clone(),
            weather_url: config.weather_url.clone(),
            http,
        })
    }

    /// One GET, classified at the edge: transport failure, non-success
    /// status, or a body that doesn't match `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        upstream: Upstream,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        debug!(%upstream, url, "sending upstream request");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| LookupError::from_transport(upstream, e))?;

        let status = res.status();

        if !status.is_success() {
            // body is for the log only; a failed read doesn't change the outcome
            let body = res.text().await.unwrap_or_default();
            warn!(
                %upstream,
                status = status.as_u16(),
                body = %truncate_body(&body),
                "upstream returned non-success status"
            );
            return Err(LookupError::UpstreamStatus { upstream, status: status.as_u16() });
        }

        let body = res.text().await.map_err(|e| LookupError::from_transport(upstream, e))?;

        serde_json::from_str(&body).map_err(|e| LookupError::malformed(upstream, e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    lat: f64,
    lon: f64,
}

#[async_trait]
impl Geocoder for OpenWeatherClient {
    async fn geocode(&self, place: &PlaceQuery) -> Result<Coordinates, LookupError> {
        let matches: Vec<OwGeoMatch> = self
            .get_json(
                Upstream::Geocoding,
                &self.geocoding_url,
                &[("q", place.as_str()), ("limit", "1")],
            )
            .await?;

        let best = matches.first().ok_or(LookupError::NotFound)?;
        Coordinates::validated(best.lat, best.lon)
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    async fn fetch_current(&self, coords: &Coordinates) -> Result<RawWeatherPayload, LookupError> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        self.get_json(
            Upstream::Weather,
            &self.weather_url,
            &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")],
        )
        .await
    }
}
