//! Conversion from canonical units (Celsius, m/s) to the user's display units.
//!
//! Conversions never round. Rounding is applied by the `format_*`/`round_*`
//! helpers, which a presentation layer calls at the very end.

const KMH_PER_MPS: f64 = 3.6;
const MPH_PER_MPS: f64 = 2.237;

pub fn to_display_temperature(celsius: f64, use_celsius: bool) -> f64 {
    if use_celsius { celsius } else { celsius * 9.0 / 5.0 + 32.0 }
}

/// Metric display uses km/h, imperial uses mph.
pub fn to_display_wind_speed(meters_per_second: f64, use_celsius: bool) -> f64 {
    if use_celsius {
        meters_per_second * KMH_PER_MPS
    } else {
        meters_per_second * MPH_PER_MPS
    }
}

pub fn temperature_symbol(use_celsius: bool) -> &'static str {
    if use_celsius { "°C" } else { "°F" }
}

pub fn wind_speed_unit(use_celsius: bool) -> &'static str {
    if use_celsius { "km/h" } else { "mph" }
}

/// Nearest whole degree; halves round up, so `-2.5` becomes `-2`.
pub fn round_temperature(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Converted and rounded temperature, e.g. `21` or `70`.
pub fn format_temperature(celsius: f64, use_celsius: bool) -> String {
    round_temperature(to_display_temperature(celsius, use_celsius)).to_string()
}

/// Converted wind speed with one decimal place.
pub fn format_wind_speed(meters_per_second: f64, use_celsius: bool) -> String {
    format!("{:.1}", to_display_wind_speed(meters_per_second, use_celsius))
}

/// Visibility in kilometres with one decimal place.
pub fn format_visibility(meters: f64) -> String {
    format!("{:.1}", meters / 1000.0)
}

/// Upper-cases the first letter of every word: `light rain` → `Light Rain`.
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if at_word_start && ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !(ch.is_alphanumeric() || ch == '_');
    }

    out
}
