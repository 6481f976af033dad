use std::{collections::HashMap, time::Duration};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    air_quality::Pollutant,
    model::{
        AirQualitySample, Coordinates, CurrentConditions, ForecastSample, LocationResult, SunTimes,
    },
};

use super::{LocationLookup, WeatherProvider};

pub const DEFAULT_DATA_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

const INVALID_API_KEY: &str = "Invalid API key. Please check your OpenWeatherMap API key. \
     Note: New API keys can take up to 2 hours to activate.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Direct,
    Reverse,
    Current,
    Forecast,
    AirPollution,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Direct => "direct",
            Endpoint::Reverse => "reverse",
            Endpoint::Current => "weather",
            Endpoint::Forecast => "forecast",
            Endpoint::AirPollution => "air_pollution",
        }
    }

    fn is_geo(self) -> bool {
        matches!(self, Endpoint::Direct | Endpoint::Reverse)
    }

    fn subject(self) -> &'static str {
        match self {
            Endpoint::Direct | Endpoint::Reverse => "location",
            Endpoint::Current => "weather",
            Endpoint::Forecast => "forecast",
            Endpoint::AirPollution => "air quality",
        }
    }

    fn failure_message(self) -> String {
        format!("Failed to fetch {} data. Please try again.", self.subject())
    }
}

/// OpenWeatherMap client covering geocoding, current conditions, the 5-day
/// forecast and air pollution.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    data_url: String,
    geo_url: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_client(api_key, Client::new())
    }

    pub fn with_client(api_key: String, http: Client) -> Self {
        Self {
            api_key,
            http,
            data_url: DEFAULT_DATA_URL.to_string(),
            geo_url: DEFAULT_GEO_URL.to_string(),
        }
    }

    /// Builds a client whose requests give up after `timeout`, if one is given.
    pub fn with_timeout(api_key: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self::with_client(api_key, http))
    }

    pub fn with_data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = trim_base(url.into());
        self
    }

    pub fn with_geo_url(mut self, url: impl Into<String>) -> Self {
        self.geo_url = trim_base(url.into());
        self
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn geo_url(&self) -> &str {
        &self.geo_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<T> {
        let base = if endpoint.is_geo() { &self.geo_url } else { &self.data_url };
        let url = format!("{base}/{}", endpoint.path());
        let subject = endpoint.subject();

        tracing::debug!(%url, "requesting OpenWeather {subject}");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({subject})"))
            .context(endpoint.failure_message())?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {subject} response body"))
            .context(endpoint.failure_message())?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(anyhow!(INVALID_API_KEY));
        }

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                subject,
                status,
                truncate_body(&body),
            )
            .context(endpoint.failure_message()));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {subject} JSON"))
            .context(endpoint.failure_message())
    }
}

fn coordinate_params(at: Coordinates) -> [(&'static str, String); 2] {
    [("lat", at.latitude.to_string()), ("lon", at.longitude.to_string())]
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    #[serde(default)]
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

impl From<OwGeoEntry> for LocationResult {
    fn from(entry: OwGeoEntry) -> Self {
        LocationResult {
            name: entry.name,
            country: entry.country,
            region: entry.state,
            latitude: entry.lat,
            longitude: entry.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OwEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    clouds: Option<OwClouds>,
    visibility: Option<f64>,
}

impl OwEntry {
    fn into_sample(self) -> Result<ForecastSample> {
        let timestamp = unix_to_utc(self.dt)
            .ok_or_else(|| anyhow!("OpenWeather returned an invalid timestamp: {}", self.dt))?;

        let (condition_main, condition_description, icon_code) = match self.weather.into_iter().next()
        {
            Some(w) => (w.main, w.description, w.icon),
            None => ("Unknown".to_string(), String::new(), String::new()),
        };

        Ok(ForecastSample {
            timestamp,
            temperature: self.main.temp,
            temperature_max: self.main.temp_max,
            temperature_min: self.main.temp_min,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            cloud_cover_percent: self.clouds.map_or(0.0, |c| c.all),
            wind_speed: self.wind.speed,
            wind_direction_degrees: self.wind.deg.unwrap_or(0.0),
            condition_main,
            condition_description,
            icon_code,
            visibility_meters: self.visibility,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(flatten)]
    entry: OwEntry,
    /// Shift from UTC in seconds for the location.
    timezone: Option<i32>,
    sys: Option<OwSys>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: u32,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: OwAirMain,
    #[serde(default)]
    components: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    #[serde(default)]
    list: Vec<OwAirEntry>,
}

impl OwAirEntry {
    fn into_sample(self) -> AirQualitySample {
        let components = Pollutant::all()
            .iter()
            .filter_map(|p| self.components.get(p.provider_key()).map(|v| (*p, *v)))
            .collect();

        AirQualitySample { index: self.main.aqi, components }
    }
}

fn sun_times(sys: Option<OwSys>, timezone: Option<i32>) -> Option<SunTimes> {
    let sys = sys?;
    let offset = FixedOffset::east_opt(timezone.unwrap_or(0))?;

    Some(SunTimes {
        sunrise: unix_to_utc(sys.sunrise?)?.with_timezone(&offset),
        sunset: unix_to_utc(sys.sunset?)?.with_timezone(&offset),
    })
}

#[async_trait]
impl LocationLookup for OpenWeatherProvider {
    async fn resolve(&self, query: &str) -> Result<Vec<LocationResult>> {
        let entries: Vec<OwGeoEntry> = self
            .get_json(Endpoint::Direct, &[("q", query.to_string()), ("limit", "1".to_string())])
            .await?;

        Ok(entries.into_iter().map(LocationResult::from).collect())
    }

    async fn resolve_from_coordinates(&self, at: Coordinates) -> Result<Vec<LocationResult>> {
        let [lat, lon] = coordinate_params(at);
        let entries: Vec<OwGeoEntry> =
            self.get_json(Endpoint::Reverse, &[lat, lon, ("limit", "1".to_string())]).await?;

        Ok(entries.into_iter().map(LocationResult::from).collect())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_conditions(&self, at: Coordinates) -> Result<CurrentConditions> {
        let [lat, lon] = coordinate_params(at);
        let parsed: OwCurrentResponse = self
            .get_json(Endpoint::Current, &[lat, lon, ("units", "metric".to_string())])
            .await?;

        let sun = sun_times(parsed.sys, parsed.timezone);
        let sample = parsed
            .entry
            .into_sample()
            .context(Endpoint::Current.failure_message())?;

        Ok(CurrentConditions { sample, sun })
    }

    async fn forecast(&self, at: Coordinates) -> Result<Vec<ForecastSample>> {
        let [lat, lon] = coordinate_params(at);
        let parsed: OwForecastResponse = self
            .get_json(Endpoint::Forecast, &[lat, lon, ("units", "metric".to_string())])
            .await?;

        parsed
            .list
            .into_iter()
            .map(OwEntry::into_sample)
            .collect::<Result<Vec<_>>>()
            .context(Endpoint::Forecast.failure_message())
    }

    async fn air_quality(&self, at: Coordinates) -> Result<Option<AirQualitySample>> {
        let parsed: OwAirResponse =
            self.get_json(Endpoint::AirPollution, &coordinate_params(at)).await?;

        Ok(parsed.list.into_iter().next().map(OwAirEntry::into_sample))
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
