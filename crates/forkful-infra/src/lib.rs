//! Infrastructure layer for Forkful.
//!
//! Contains implementations of the port traits defined in `forkful-core`:
//! the HTTP client for the recommendation backend (`ChatBackend`), the
//! geolocation sources (`GeolocationSource`), and the configuration loader.

pub mod api;
pub mod config;
pub mod geo;
