//! Position sources that need no network.

use forkful_core::geolocation::GeolocationSource;
use forkful_types::error::GeolocationError;
use forkful_types::location::Coordinates;

/// Always reports the same coordinates, typically taken from config.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

impl GeolocationSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// The capability is absent on this system.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl GeolocationSource for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}
