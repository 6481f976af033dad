use crate::{
    Config,
    model::{AirQualitySample, Coordinates, CurrentConditions, ForecastSample, LocationResult},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Turns a place name or a position into candidate locations, best match first.
#[async_trait]
pub trait LocationLookup: Send + Sync + Debug {
    async fn resolve(&self, query: &str) -> anyhow::Result<Vec<LocationResult>>;

    async fn resolve_from_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> anyhow::Result<Vec<LocationResult>>;
}

/// Weather data for a resolved position.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(&self, at: Coordinates) -> anyhow::Result<CurrentConditions>;

    /// Samples sorted by timestamp, roughly every three hours over five days.
    async fn forecast(&self, at: Coordinates) -> anyhow::Result<Vec<ForecastSample>>;

    /// `Ok(None)` when the provider has no reading for this position.
    async fn air_quality(&self, at: Coordinates) -> anyhow::Result<Option<AirQualitySample>>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.require_api_key()?;
    let timeout = config.request_timeout_secs.map(Duration::from_secs);

    let mut provider = OpenWeatherProvider::with_timeout(api_key.to_owned(), timeout)?;

    if let Some(settings) = &config.openweather {
        if let Some(url) = &settings.data_url {
            provider = provider.with_data_url(url);
        }
        if let Some(url) = &settings.geo_url {
            provider = provider.with_geo_url(url);
        }
    }

    Ok(provider)
}
