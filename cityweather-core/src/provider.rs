use crate::{Config, model::{Coordinate, WeatherSnapshot}};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current conditions for a coordinate.
///
/// Errors carry diagnostic context only; callers collapse them into
/// [`WeatherError::WeatherFetchFailed`](crate::WeatherError::WeatherFetchFailed).
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, coordinate: Coordinate) -> anyhow::Result<WeatherSnapshot>;
}

/// Construct the OpenWeather provider from config.
///
/// A missing API key is not an error here: the request goes out with an
/// empty key and the provider rejects it.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key.clone().unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!(
            "No OpenWeather API key configured; set {} or run `cityweather configure`",
            crate::config::API_KEY_ENV
        );
    }

    let provider = OpenWeatherProvider::new(api_key, config.base_url.clone(), config.timeout())?;
    Ok(Arc::new(provider))
}
