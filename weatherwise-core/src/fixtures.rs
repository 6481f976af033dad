//! Sample builders shared by unit tests.

use chrono::{DateTime, Utc};

use crate::model::ForecastSample;

pub(crate) fn sample_at(timestamp: DateTime<Utc>) -> ForecastSample {
    ForecastSample {
        timestamp,
        temperature: 18.0,
        temperature_max: 20.0,
        temperature_min: 15.0,
        feels_like: 17.5,
        humidity: 60,
        pressure: 1015.0,
        cloud_cover_percent: 20.0,
        wind_speed: 4.0,
        wind_direction_degrees: 200.0,
        condition_main: "Clouds".to_string(),
        condition_description: "few clouds".to_string(),
        icon_code: "02d".to_string(),
        visibility_meters: Some(10_000.0),
    }
}
