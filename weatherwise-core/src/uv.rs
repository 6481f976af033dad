//! Approximate UV index.
//!
//! The provider's free tier does not report UV, so the value is derived from
//! the local hour and cloud cover. It is an estimate and must be presented as
//! one.

use serde::{Deserialize, Serialize};

/// Share of the clear-sky value removed by a fully overcast sky.
const FULL_OVERCAST_ATTENUATION: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UvBand {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl UvBand {
    pub fn from_index(index: u32) -> Self {
        match index {
            0..=2 => UvBand::Low,
            3..=5 => UvBand::Moderate,
            6..=7 => UvBand::High,
            _ => UvBand::VeryHigh,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UvBand::Low => "Low",
            UvBand::Moderate => "Moderate",
            UvBand::High => "High",
            UvBand::VeryHigh => "Very High",
        }
    }

    pub fn style_class(&self) -> &'static str {
        match self {
            UvBand::Low => "uv-low",
            UvBand::Moderate => "uv-moderate",
            UvBand::High => "uv-high",
            UvBand::VeryHigh => "uv-very-high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UvEstimate {
    pub index: u32,
    pub band: UvBand,
}

fn clear_sky_index(hour: u32) -> f64 {
    match hour {
        12..=14 => 10.0,
        11 | 15 => 8.0,
        10 | 16 => 6.0,
        7..=9 | 17..=19 => 3.0,
        _ => 0.0,
    }
}

/// Estimates the UV index for a local `hour` (0–23) and cloud cover percentage.
pub fn estimate_uv(hour: u32, cloud_cover_percent: f64) -> UvEstimate {
    let clouds = if cloud_cover_percent.is_finite() {
        cloud_cover_percent.clamp(0.0, 100.0)
    } else {
        0.0
    };

    let factor = 1.0 - (clouds / 100.0) * FULL_OVERCAST_ATTENUATION;
    let index = (clear_sky_index(hour) * factor).round() as u32;

    UvEstimate {
        index,
        band: UvBand::from_index(index),
    }
}
