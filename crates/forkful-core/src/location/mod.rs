//! Location state for Forkful.
//!
//! `LocationProvider` tracks the user's current location, which comes
//! either from a `GeolocationSource` lookup or from a manually entered
//! address, and publishes changes through a `watch` channel.

pub mod provider;

pub use provider::{LocationProvider, LocationState};
