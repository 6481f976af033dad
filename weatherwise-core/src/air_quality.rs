use serde::{Deserialize, Serialize};

/// Qualitative air-quality level for the provider's 1–5 index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiLevel {
    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
        }
    }

    pub fn advisory(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Air quality is satisfactory. Enjoy outdoor activities!",
            AqiLevel::Fair => {
                "Air quality is acceptable. Sensitive groups should limit prolonged outdoor exposure."
            }
            AqiLevel::Moderate => "Members of sensitive groups may experience health effects.",
            AqiLevel::Poor => "Everyone may begin to experience health effects.",
            AqiLevel::VeryPoor => {
                "Health alert: The risk of health effects is increased for everyone."
            }
        }
    }

    /// Styling tag for the presentation layer.
    pub fn severity_class(&self) -> &'static str {
        match self {
            AqiLevel::Good => "aqi-good",
            AqiLevel::Fair => "aqi-fair",
            AqiLevel::Moderate => "aqi-moderate",
            AqiLevel::Poor => "aqi-poor",
            AqiLevel::VeryPoor => "aqi-very-poor",
        }
    }
}

/// Looks up the level for an index.
///
/// Anything outside 1–5 falls back to [`AqiLevel::Good`]. That is the
/// historical behaviour of the dashboard rather than a meaningful answer; see
/// DESIGN.md.
pub fn classify_aqi(index: u32) -> AqiLevel {
    match index {
        2 => AqiLevel::Fair,
        3 => AqiLevel::Moderate,
        4 => AqiLevel::Poor,
        5 => AqiLevel::VeryPoor,
        _ => AqiLevel::Good,
    }
}

/// Pollutants shown in the air-quality panel, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    Pm2_5,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

impl Pollutant {
    pub const fn all() -> &'static [Pollutant] {
        &[
            Pollutant::Pm2_5,
            Pollutant::Pm10,
            Pollutant::O3,
            Pollutant::No2,
            Pollutant::So2,
            Pollutant::Co,
        ]
    }

    /// Key used by the provider's `components` object.
    pub fn provider_key(&self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "pm2_5",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::O3 => "O₃",
            Pollutant::No2 => "NO₂",
            Pollutant::So2 => "SO₂",
            Pollutant::Co => "CO",
        }
    }

    pub fn unit(&self) -> &'static str {
        "μg/m³"
    }
}
