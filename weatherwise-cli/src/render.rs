//! Plain-text rendering of a [`WeatherSnapshot`].

use chrono::{DateTime, FixedOffset, Utc};
use weatherwise_core::{
    PresentationSink, SearchError, UserPreferences, WeatherSnapshot, classify_aqi,
    classify_direction,
    units::{
        capitalize_words, format_temperature, format_visibility, format_wind_speed,
        temperature_symbol, wind_speed_unit,
    },
};

/// Prints to the terminal: snapshots to stdout, loading and errors to stderr.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl TerminalSink {
    pub fn new() -> Self {
        Self
    }
}

impl PresentationSink for TerminalSink {
    fn loading(&mut self, query: &str) {
        eprintln!("Loading weather for {query}...");
    }

    fn snapshot(&mut self, snapshot: &WeatherSnapshot, preferences: &UserPreferences) {
        print!("{}", render_snapshot(snapshot, preferences));
    }

    fn error(&mut self, error: &SearchError) {
        eprintln!("{}", render_error(error));
    }
}

pub fn render_error(error: &SearchError) -> String {
    if error.is_retryable() {
        format!("Error: {error}\nRun `weatherwise refresh` to try again.")
    } else {
        format!("Error: {error}")
    }
}

pub fn render_snapshot(snapshot: &WeatherSnapshot, prefs: &UserPreferences) -> String {
    let celsius = prefs.use_celsius;
    let symbol = temperature_symbol(celsius);
    let local = |at: DateTime<Utc>| snapshot.local_time(at);
    let current = &snapshot.current;

    let mut lines = vec![
        snapshot.location.label(),
        snapshot.fetched_at.format("%A, %B %-d, %Y").to_string(),
        String::new(),
        format!(
            "{}{symbol}  {}",
            format_temperature(current.temperature, celsius),
            capitalize_words(&current.condition_description)
        ),
        format!(
            "Feels like {}{symbol}   High {}{symbol}   Low {}{symbol}",
            format_temperature(current.feels_like, celsius),
            format_temperature(current.temperature_max, celsius),
            format_temperature(current.temperature_min, celsius),
        ),
        String::new(),
        format!("Humidity      {}%", current.humidity),
        format!(
            "Wind          {} {} {}",
            format_wind_speed(current.wind_speed, celsius),
            wind_speed_unit(celsius),
            classify_direction(current.wind_direction_degrees),
        ),
        format!("Pressure      {} hPa", current.pressure.round()),
    ];

    if let Some(meters) = current.visibility_meters {
        lines.push(format!("Visibility    {} km", format_visibility(meters)));
    }
    lines.push(format!("Cloud cover   {}%", current.cloud_cover_percent.round()));
    lines.push(format!(
        "UV index      {} {} (estimated)",
        snapshot.uv.index,
        snapshot.uv.band.label()
    ));

    if let Some(sun) = &snapshot.sun {
        lines.push(format!("Sunrise       {}", clock_time(&sun.sunrise)));
        lines.push(format!("Sunset        {}", clock_time(&sun.sunset)));
    }

    lines.push(String::new());
    lines.push("Hourly".to_string());
    for (i, sample) in snapshot.hourly_samples.iter().enumerate() {
        let label = if i == 0 {
            "Now".to_string()
        } else {
            local(sample.timestamp).format("%-I %p").to_string()
        };
        lines.push(format!(
            "  {label:<6} {:>4}{symbol}  {}",
            format_temperature(sample.temperature, celsius),
            capitalize_words(&sample.condition_description)
        ));
    }

    lines.push(String::new());
    lines.push("5-day forecast".to_string());
    for (i, sample) in snapshot.daily_samples.iter().enumerate() {
        let at = local(sample.timestamp);
        let day = if i == 0 { "Tomorrow".to_string() } else { at.format("%A").to_string() };
        lines.push(format!(
            "  {day:<10} {:<7} {:>4}{symbol} / {}{symbol}  {}",
            at.format("%b %-d"),
            format_temperature(sample.temperature_max, celsius),
            format_temperature(sample.temperature_min, celsius),
            capitalize_words(&sample.condition_description)
        ));
    }

    lines.push(String::new());
    match &snapshot.air_quality {
        Some(air) => {
            let level = classify_aqi(air.index);
            lines.push(format!("Air quality   {} ({})", level.label(), air.index));
            lines.push(format!("  {}", level.advisory()));
            for (pollutant, value) in air.readings() {
                lines.push(format!(
                    "  {:<6} {value:.1} {}",
                    pollutant.symbol(),
                    pollutant.unit()
                ));
            }
        }
        None => lines.push("Air quality data is not available for this location.".to_string()),
    }

    if !prefs.recent_cities.is_empty() {
        lines.push(String::new());
        lines.push(format!("Recent: {}", prefs.recent_cities.join(", ")));
    }

    lines.push(String::new());
    lines.push(format!("Last updated: {}", clock_time(&snapshot.fetched_at)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn clock_time(at: &DateTime<FixedOffset>) -> String {
    at.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, TimeZone};
    use weatherwise_core::{
        AirQualitySample, ForecastSample, LocationResult, Pollutant, SunTimes, ViewerZone,
        estimate_uv,
    };

    use super::*;

    fn sample(at: DateTime<Utc>, temperature: f64, description: &str) -> ForecastSample {
        ForecastSample {
            timestamp: at,
            temperature,
            temperature_max: temperature + 3.0,
            temperature_min: temperature - 3.0,
            feels_like: temperature - 1.0,
            humidity: 63,
            pressure: 1014.0,
            cloud_cover_percent: 40.0,
            wind_speed: 5.0,
            wind_direction_degrees: 225.0,
            condition_main: "Clouds".to_string(),
            condition_description: description.to_string(),
            icon_code: "03d".to_string(),
            visibility_meters: Some(10_000.0),
        }
    }

    fn snapshot() -> WeatherSnapshot {
        let offset = FixedOffset::east_opt(2 * 3600).expect("offset");
        let fetched_at = offset.with_ymd_and_hms(2026, 10, 17, 11, 0, 0).single().expect("time");
        let start = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).single().expect("time");

        let hourly = (0..8)
            .map(|i| sample(start + Duration::hours(3 * i), 10.0 + i as f64, "scattered clouds"))
            .collect();
        let daily = (1..=5)
            .map(|d| sample(start + Duration::days(d) + Duration::hours(3), 15.0, "light rain"))
            .collect();

        WeatherSnapshot {
            location: LocationResult {
                name: "Paris".to_string(),
                country: "FR".to_string(),
                region: Some("Ile-de-France".to_string()),
                latitude: 48.85,
                longitude: 2.35,
            },
            current: sample(start, 12.4, "broken clouds"),
            sun: Some(SunTimes {
                sunrise: offset.with_ymd_and_hms(2026, 10, 17, 8, 12, 0).single().expect("time"),
                sunset: offset.with_ymd_and_hms(2026, 10, 17, 18, 54, 0).single().expect("time"),
            }),
            daily_samples: daily,
            hourly_samples: hourly,
            air_quality: Some(AirQualitySample {
                index: 2,
                components: BTreeMap::from([(Pollutant::Pm2_5, 4.3), (Pollutant::O3, 68.7)]),
            }),
            uv: estimate_uv(11, 40.0),
            fetched_at,
            zone: ViewerZone::Fixed(offset),
        }
    }

    #[test]
    fn metric_snapshot_shows_converted_values() {
        let text = render_snapshot(&snapshot(), &UserPreferences::default());

        assert!(text.starts_with("Paris, Ile-de-France, FR\nSaturday, October 17, 2026\n"));
        assert!(text.contains("12°C  Broken Clouds"));
        assert!(text.contains("Feels like 11°C   High 15°C   Low 9°C"));
        assert!(text.contains("Wind          18.0 km/h SW"));
        assert!(text.contains("Visibility    10.0 km"));
        assert!(text.contains("Sunrise       8:12 AM"));
        assert!(text.contains("(estimated)"));
    }

    #[test]
    fn imperial_snapshot_uses_fahrenheit_and_mph() {
        let prefs = UserPreferences { use_celsius: false, ..Default::default() };
        let text = render_snapshot(&snapshot(), &prefs);

        assert!(text.contains("54°F  Broken Clouds"));
        assert!(text.contains("11.2 mph SW"));
    }

    #[test]
    fn hourly_rows_use_viewer_offset() {
        let text = render_snapshot(&snapshot(), &UserPreferences::default());
        let hourly: Vec<_> = text
            .lines()
            .skip_while(|l| *l != "Hourly")
            .skip(1)
            .take_while(|l| !l.is_empty())
            .collect();

        assert_eq!(hourly.len(), 8);
        assert!(hourly[0].trim_start().starts_with("Now"));
        // 12:00 UTC is 2 PM at +02:00.
        assert!(hourly[1].trim_start().starts_with("2 PM"));
    }

    #[test]
    fn hourly_labels_follow_daylight_saving() {
        // Paris drops to UTC+1 at 01:00 UTC on 2026-10-25.
        let mut snap = snapshot();
        snap.zone = ViewerZone::Named(chrono_tz::Europe::Paris);
        snap.hourly_samples[1].timestamp =
            Utc.with_ymd_and_hms(2026, 10, 24, 21, 0, 0).single().expect("time");
        snap.hourly_samples[2].timestamp =
            Utc.with_ymd_and_hms(2026, 10, 25, 3, 0, 0).single().expect("time");

        let text = render_snapshot(&snap, &UserPreferences::default());
        let hourly: Vec<_> = text
            .lines()
            .skip_while(|l| *l != "Hourly")
            .skip(1)
            .take_while(|l| !l.is_empty())
            .collect();

        assert!(hourly[1].trim_start().starts_with("11 PM"));
        assert!(hourly[2].trim_start().starts_with("4 AM"));
    }

    #[test]
    fn daily_rows_start_with_tomorrow() {
        let text = render_snapshot(&snapshot(), &UserPreferences::default());
        let daily: Vec<_> = text
            .lines()
            .skip_while(|l| *l != "5-day forecast")
            .skip(1)
            .take_while(|l| !l.is_empty())
            .collect();

        assert_eq!(daily.len(), 5);
        assert!(daily[0].trim_start().starts_with("Tomorrow   Oct 18"));
        assert!(daily[1].trim_start().starts_with("Monday"));
    }

    #[test]
    fn air_quality_section_lists_level_and_pollutants() {
        let text = render_snapshot(&snapshot(), &UserPreferences::default());

        assert!(text.contains("Air quality   Fair (2)"));
        assert!(text.contains("Sensitive groups should limit prolonged outdoor exposure."));
        assert!(text.contains("PM2.5  4.3 μg/m³"));
        assert!(text.contains("O₃"));
    }

    #[test]
    fn missing_air_quality_is_reported() {
        let mut snap = snapshot();
        snap.air_quality = None;
        let text = render_snapshot(&snap, &UserPreferences::default());

        assert!(text.contains("Air quality data is not available for this location."));
    }

    #[test]
    fn recent_cities_are_listed() {
        let mut prefs = UserPreferences::default();
        prefs.record_search("London");
        prefs.record_search("Paris");
        let text = render_snapshot(&snapshot(), &prefs);

        assert!(text.contains("Recent: Paris, London"));
    }

    #[test]
    fn retryable_errors_suggest_refresh() {
        let upstream = SearchError::UpstreamUnavailable("Failed to fetch weather data.".into());
        assert!(render_error(&upstream).contains("weatherwise refresh"));
        assert!(!render_error(&SearchError::LocationNotFound).contains("refresh"));
    }
}
