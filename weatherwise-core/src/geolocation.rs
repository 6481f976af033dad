//! Position source for "use my location" searches.

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::{error::SearchError, model::Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out")]
    Timeout,
    #[error("geolocation is not supported")]
    Unsupported,
    #[error("unknown geolocation error")]
    Unknown,
}

impl GeolocationError {
    /// Classifies the platform's numeric error code
    /// (1 = permission denied, 2 = position unavailable, 3 = timeout).
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            3 => GeolocationError::Timeout,
            _ => GeolocationError::Unknown,
        }
    }
}

impl From<GeolocationError> for SearchError {
    fn from(err: GeolocationError) -> Self {
        match err {
            GeolocationError::PermissionDenied => SearchError::PermissionDenied,
            GeolocationError::PositionUnavailable => SearchError::PositionUnavailable,
            GeolocationError::Timeout => SearchError::LocationTimeout,
            GeolocationError::Unsupported => SearchError::GeolocationUnsupported,
            GeolocationError::Unknown => SearchError::GeolocationUnknown,
        }
    }
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// A geolocator that reports a preconfigured position, or `Unsupported` when
/// none was given.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(pub Option<Coordinates>);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.0.ok_or(GeolocationError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_codes() {
        assert_eq!(GeolocationError::from_code(1), GeolocationError::PermissionDenied);
        assert_eq!(GeolocationError::from_code(2), GeolocationError::PositionUnavailable);
        assert_eq!(GeolocationError::from_code(3), GeolocationError::Timeout);
        assert_eq!(GeolocationError::from_code(42), GeolocationError::Unknown);
    }

    #[test]
    fn each_kind_has_its_own_user_message() {
        let messages: Vec<String> = [
            GeolocationError::PermissionDenied,
            GeolocationError::PositionUnavailable,
            GeolocationError::Timeout,
        ]
        .into_iter()
        .map(|e| SearchError::from(e).to_string())
        .collect();

        assert_eq!(messages[0], "Location access denied. Please enable location services.");
        assert_eq!(messages[1], "Location information unavailable.");
        assert_eq!(messages[2], "Location request timed out. Please try again.");
    }

    #[tokio::test]
    async fn fixed_position_without_coordinates_is_unsupported() {
        let err = FixedPosition(None).current_position().await.unwrap_err();
        assert_eq!(err, GeolocationError::Unsupported);

        let at = Coordinates::new(48.85, 2.35);
        assert_eq!(FixedPosition(Some(at)).current_position().await, Ok(at));
    }
}
