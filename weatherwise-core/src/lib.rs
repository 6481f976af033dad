//! Core library for WeatherWise.
//!
//! This crate defines:
//! - Forecast reduction into daily and hourly views
//! - Derived quantities: unit conversion, wind direction, AQI levels, UV estimate
//! - The search session that ties location lookup and weather fetches together
//! - Configuration, preference persistence and the OpenWeatherMap provider
//!
//! It is used by `weatherwise-cli`, but can also be reused by other front ends.

pub mod air_quality;
pub mod clock;
pub mod config;
pub mod direction;
pub mod error;
pub mod forecast;
pub mod geolocation;
pub mod model;
pub mod preferences;
pub mod provider;
pub mod session;
pub mod units;
pub mod uv;

#[cfg(test)]
mod fixtures;

pub use air_quality::{AqiLevel, Pollutant, classify_aqi};
pub use clock::{Clock, FixedClock, SystemClock, ViewerZone};
pub use config::{Config, ProviderConfig};
pub use direction::{CompassPoint, classify_direction};
pub use error::SearchError;
pub use geolocation::{FixedPosition, GeolocationError, Geolocator};
pub use model::{
    AirQualitySample, Coordinates, CurrentConditions, ForecastSample, LocationResult, SunTimes,
    WeatherSnapshot,
};
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, UserPreferences,
};
pub use provider::{LocationLookup, WeatherProvider, openweather::OpenWeatherProvider};
pub use session::{
    Completion, PresentationSink, SearchOutcome, SearchTicket, Services, SessionState,
    WeatherSession,
};
pub use uv::{UvBand, UvEstimate, estimate_uv};
