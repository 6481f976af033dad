use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::{air_quality::Pollutant, clock::ViewerZone, uv::UvEstimate};

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// One provider-supplied observation or prediction.
///
/// All scalars are in canonical units (Celsius, metres per second); conversion
/// to the user's units happens at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
    pub cloud_cover_percent: f64,
    pub wind_speed: f64,
    pub wind_direction_degrees: f64,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_code: String,
    pub visibility_meters: Option<f64>,
}

impl ForecastSample {
    /// Night icons carry an `n` suffix, e.g. `01n`.
    pub fn is_night(&self) -> bool {
        self.icon_code.ends_with('n')
    }
}

/// A place resolved from a free-text query or from coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub name: String,
    pub country: String,
    pub region: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// `Name, Region, Country`, or `Name, Country` when no region is known.
    pub fn label(&self) -> String {
        match self.region.as_deref().filter(|r| !r.is_empty()) {
            Some(region) => format!("{}, {}, {}", self.name, region, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

/// Air-quality reading. Pollutants the provider did not report are simply
/// missing from `components`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySample {
    pub index: u32,
    pub components: BTreeMap<Pollutant, f64>,
}

impl AirQualitySample {
    /// Reported pollutants in display order.
    pub fn readings(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        Pollutant::all()
            .iter()
            .filter_map(|p| self.components.get(p).map(|value| (*p, *value)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
}

/// Result of the current-conditions fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub sample: ForecastSample,
    pub sun: Option<SunTimes>,
}

/// Everything a presentation layer needs for one successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location: LocationResult,
    pub current: ForecastSample,
    pub sun: Option<SunTimes>,
    pub daily_samples: Vec<ForecastSample>,
    pub hourly_samples: Vec<ForecastSample>,
    pub air_quality: Option<AirQualitySample>,
    pub uv: UvEstimate,
    pub fetched_at: DateTime<FixedOffset>,

    /// Zone the views were reduced in; use it to label sample times.
    pub zone: ViewerZone,
}

impl WeatherSnapshot {
    /// `at` in the viewer's zone, with the offset in effect at that instant.
    pub fn local_time(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        self.zone.localize(at)
    }
}
