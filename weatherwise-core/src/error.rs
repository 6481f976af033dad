use thiserror::Error;

/// Why a search did not produce a snapshot. The `Display` text is meant for
/// the end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Please enter a city name.")]
    EmptyQuery,

    #[error("There is no previous search to retry.")]
    NothingToRetry,

    #[error("City not found. Please check the spelling and try again.")]
    LocationNotFound,

    /// Location lookup, current conditions or forecast could not be fetched.
    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("Location access denied. Please enable location services.")]
    PermissionDenied,

    #[error("Location information unavailable.")]
    PositionUnavailable,

    #[error("Location request timed out. Please try again.")]
    LocationTimeout,

    #[error("Geolocation is not supported on this device.")]
    GeolocationUnsupported,

    #[error("An unknown error occurred while determining your location.")]
    GeolocationUnknown,

    /// A position was obtained but could not be turned into a place name.
    #[error("Could not determine your location. Please enter a city manually.")]
    LocationUndetermined,

    /// The result arrived after a newer search had been issued and was dropped.
    #[error("A newer search replaced this one.")]
    Superseded,
}

impl SearchError {
    /// Wraps a collaborator failure, keeping only its outermost message.
    pub fn upstream(err: &anyhow::Error) -> Self {
        SearchError::UpstreamUnavailable(err.to_string())
    }

    /// Whether re-issuing the same query could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SearchError::UpstreamUnavailable(_)
                | SearchError::PositionUnavailable
                | SearchError::LocationTimeout
                | SearchError::LocationUndetermined
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_keeps_outer_context_only() {
        let err = anyhow::anyhow!("connection reset").context("Failed to fetch weather data. Please try again.");
        assert_eq!(
            SearchError::upstream(&err),
            SearchError::UpstreamUnavailable("Failed to fetch weather data. Please try again.".into())
        );
    }

    #[test]
    fn not_found_message_suggests_spelling() {
        assert!(SearchError::LocationNotFound.to_string().contains("spelling"));
        assert!(!SearchError::LocationNotFound.is_retryable());
        assert!(SearchError::UpstreamUnavailable("x".into()).is_retryable());
    }
}
