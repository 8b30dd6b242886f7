//! Geolocation sources.
//!
//! `GeolocationSource` uses native async fns, so it is not object safe;
//! [`Geolocator`] dispatches over the concrete sources instead of a
//! `Box<dyn _>`.

pub mod fixed;
pub mod google;

pub use fixed::{FixedPosition, Unavailable};
pub use google::GoogleGeolocation;

use forkful_core::geolocation::GeolocationSource;
use forkful_types::error::GeolocationError;
use forkful_types::location::Coordinates;

use crate::config::ClientConfig;

/// Any of the supported position sources.
pub enum Geolocator {
    Fixed(FixedPosition),
    Google(GoogleGeolocation),
    Unavailable(Unavailable),
}

impl Geolocator {
    /// Pick a source from configuration.
    ///
    /// Fixed coordinates win over a network lookup; with neither, the
    /// capability is reported as absent.
    pub fn from_config(config: &ClientConfig) -> Self {
        if let Some(coords) = config.fixed_position() {
            tracing::debug!("Using fixed position from configuration");
            return Geolocator::Fixed(FixedPosition(coords));
        }
        match &config.maps_api_key {
            Some(key) => {
                tracing::debug!("Using Google Geolocation API");
                Geolocator::Google(GoogleGeolocation::new(key.clone()))
            }
            None => {
                tracing::debug!("No geolocation source configured");
                Geolocator::Unavailable(Unavailable)
            }
        }
    }

    /// Short label for status output.
    pub fn name(&self) -> &'static str {
        match self {
            Geolocator::Fixed(_) => "fixed",
            Geolocator::Google(_) => "google",
            Geolocator::Unavailable(_) => "none",
        }
    }
}

impl GeolocationSource for Geolocator {
    fn is_available(&self) -> bool {
        match self {
            Geolocator::Fixed(s) => s.is_available(),
            Geolocator::Google(s) => s.is_available(),
            Geolocator::Unavailable(s) => s.is_available(),
        }
    }

    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        match self {
            Geolocator::Fixed(s) => s.current_position().await,
            Geolocator::Google(s) => s.current_position().await,
            Geolocator::Unavailable(s) => s.current_position().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn fixed_position_takes_priority() {
        let config = ClientConfig {
            latitude: Some(1.5),
            longitude: Some(2.5),
            maps_api_key: Some(SecretString::from("k")),
            ..Default::default()
        };
        assert_eq!(Geolocator::from_config(&config).name(), "fixed");
    }

    #[test]
    fn maps_key_selects_google() {
        let config = ClientConfig {
            maps_api_key: Some(SecretString::from("k")),
            ..Default::default()
        };
        let source = Geolocator::from_config(&config);
        assert_eq!(source.name(), "google");
        assert!(source.is_available());
    }

    #[tokio::test]
    async fn nothing_configured_is_unavailable() {
        let source = Geolocator::from_config(&ClientConfig::default());
        assert!(!source.is_available());
        assert_eq!(
            source.current_position().await.unwrap_err(),
            GeolocationError::Unsupported
        );
    }

    #[tokio::test]
    async fn fixed_source_reports_coordinates() {
        let source = Geolocator::Fixed(FixedPosition(Coordinates::new(3.0, 4.0)));
        assert_eq!(source.current_position().await.unwrap(), Coordinates::new(3.0, 4.0));
    }
}
