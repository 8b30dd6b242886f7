//! GeolocationSource trait definition.
//!
//! Abstracts the platform's "where am I" capability. Implementations live
//! in forkful-infra (network lookup, fixed coordinates, or none at all).

use forkful_types::error::GeolocationError;
use forkful_types::location::Coordinates;

/// A source of the device's current position.
pub trait GeolocationSource: Send + Sync {
    /// Whether the capability exists at all.
    ///
    /// When this returns false the location provider reports
    /// [`GeolocationError::Unsupported`] without starting a lookup.
    fn is_available(&self) -> bool {
        true
    }

    /// Resolve the current position.
    fn current_position(
        &self,
    ) -> impl std::future::Future<Output = Result<Coordinates, GeolocationError>> + Send;
}
