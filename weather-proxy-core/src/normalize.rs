//! Mapping from the provider's payload to [`WeatherSnapshot`].

use crate::{
    error::{LookupError, Upstream},
    model::{RawWeatherPayload, WeatherSnapshot},
};

/// Build a snapshot from a raw payload.
///
/// Values are copied verbatim; the provider is asked for metric units so no
/// conversion happens here. Either every field is filled or the call fails.
pub fn normalize(payload: RawWeatherPayload) -> Result<WeatherSnapshot, LookupError> {
    let RawWeatherPayload { weather, main, wind } = payload;

    let condition = weather
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::malformed(Upstream::Weather, "empty `weather` array"))?;

    if condition.description.trim().is_empty() {
        return Err(LookupError::malformed(Upstream::Weather, "empty condition description"));
    }
    if condition.icon.trim().is_empty() {
        return Err(LookupError::malformed(Upstream::Weather, "empty condition icon"));
    }

    Ok(WeatherSnapshot {
        description: condition.description,
        icon: condition.icon,
        temperature: main.temp,
        humidity: main.humidity,
        wind_speed: wind.speed,
        precipitation: None,
    })
}
