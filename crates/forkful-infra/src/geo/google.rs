//! GoogleGeolocation -- network position lookup via the Google
//! Geolocation API.
//!
//! Sends a `considerIp` lookup, so the position is approximated from the
//! caller's public IP address. The API key is wrapped in
//! [`secrecy::SecretString`] and only exposed when building the request URL.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use forkful_core::geolocation::GeolocationSource;
use forkful_types::error::GeolocationError;
use forkful_types::location::Coordinates;

const GOOGLE_GEOLOCATION_URL: &str = "https://www.googleapis.com/geolocation/v1/geolocate";

/// Lookups give up after this long.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GeolocateResponse {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Position source backed by the Google Geolocation API.
pub struct GoogleGeolocation {
    http: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
}

impl GoogleGeolocation {
    pub fn new(api_key: SecretString) -> Self {
        let http = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key,
            endpoint: GOOGLE_GEOLOCATION_URL.to_string(),
        }
    }

    /// Override the endpoint (useful for testing).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn lookup(&self) -> Result<Coordinates, GeolocationError> {
        debug!("Requesting position from Google Geolocation API");
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&serde_json::json!({ "considerIp": true }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeolocationError::Timeout
                } else {
                    // Strip the URL: it carries the API key.
                    GeolocationError::PositionUnavailable(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                400 | 401 | 403 => GeolocationError::PermissionDenied,
                404 => GeolocationError::PositionUnavailable(
                    "no position could be determined".to_string(),
                ),
                code => GeolocationError::PositionUnavailable(format!("HTTP {code}")),
            });
        }

        let body: GeolocateResponse = response
            .json()
            .await
            .map_err(|e| GeolocationError::PositionUnavailable(e.without_url().to_string()))?;
        Ok(Coordinates::new(body.location.lat, body.location.lng))
    }
}

impl GeolocationSource for GoogleGeolocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.lookup().await
    }
}
