use serde::{Deserialize, Serialize};

/// The 16 points of the compass rose, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

const SECTOR_DEGREES: f64 = 22.5;

impl CompassPoint {
    pub const fn all() -> &'static [CompassPoint; 16] {
        use CompassPoint::*;
        &[N, Nne, Ne, Ene, E, Ese, Se, Sse, S, Ssw, Sw, Wsw, W, Wnw, Nw, Nnw]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::Nne => "NNE",
            CompassPoint::Ne => "NE",
            CompassPoint::Ene => "ENE",
            CompassPoint::E => "E",
            CompassPoint::Ese => "ESE",
            CompassPoint::Se => "SE",
            CompassPoint::Sse => "SSE",
            CompassPoint::S => "S",
            CompassPoint::Ssw => "SSW",
            CompassPoint::Sw => "SW",
            CompassPoint::Wsw => "WSW",
            CompassPoint::W => "W",
            CompassPoint::Wnw => "WNW",
            CompassPoint::Nw => "NW",
            CompassPoint::Nnw => "NNW",
        }
    }
}

impl std::fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a bearing in degrees to the nearest compass point.
///
/// Any finite bearing is accepted and normalised into `[0, 360)` first, so
/// `360.0`, `0.0` and `-360.0` all classify as north. Non-finite input is
/// treated as north, matching the provider's "missing means 0" convention.
pub fn classify_direction(degrees: f64) -> CompassPoint {
    if !degrees.is_finite() {
        return CompassPoint::N;
    }

    let normalized = degrees.rem_euclid(360.0);
    let index = (normalized / SECTOR_DEGREES).round() as usize % 16;

    CompassPoint::all()[index]
}
