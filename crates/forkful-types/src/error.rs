use thiserror::Error;

/// Errors from calls to the recommendation backend.
///
/// Cloneable so the conversation state can keep the most recent one around
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("could not reach backend: {0}")]
    Transport(String),

    #[error("backend request timed out")]
    Timeout,

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid backend response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status code, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors from the platform geolocation capability.
///
/// The `Display` text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported by this system")]
    Unsupported,

    #[error("User denied the request for geolocation")]
    PermissionDenied,

    #[error("Location information is unavailable: {0}")]
    PositionUnavailable(String),

    #[error("The request to get user location timed out")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 404,
            body: "Session not found".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned HTTP 404: Session not found");
        assert!(err.is_not_found());
        assert_eq!(ApiError::Timeout.status(), None);
    }

    #[test]
    fn test_geolocation_error_display() {
        let err = GeolocationError::PositionUnavailable("no wifi".to_string());
        assert!(err.to_string().contains("no wifi"));
        assert_eq!(
            GeolocationError::Unsupported.to_string(),
            "Geolocation is not supported by this system"
        );
    }
}
