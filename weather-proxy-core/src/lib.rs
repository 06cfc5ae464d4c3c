//! Core library for `weather-proxy`.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geocoding and current-weather clients behind async traits
//! - The normalized snapshot model and the error taxonomy
//! - [`LookupService`], the place-name to snapshot pipeline
//!
//! It has no HTTP-server dependency; `weather-proxy` adapts it to an HTTP
//! endpoint and a CLI, and other front-ends can wrap it the same way.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;

pub use config::{Config, ServerConfig, UpstreamConfig};
pub use error::{ErrorKind, LookupError, Upstream};
pub use model::{Coordinates, PlaceQuery, RawWeatherPayload, WeatherSnapshot};
pub use provider::{Geocoder, WeatherFetcher, openweather::OpenWeatherClient};
pub use service::LookupService;
