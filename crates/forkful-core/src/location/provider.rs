//! Location provider: holds the user's current location, filled either by a
//! geolocation lookup or by a manually entered address.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use forkful_types::error::GeolocationError;
use forkful_types::location::{Coordinates, Location};

use crate::geolocation::GeolocationSource;

/// What observers see about the current location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationState {
    pub location: Option<Location>,
    /// True while a lookup is running.
    pub loading: bool,
    /// User-facing message from the last failed lookup.
    pub error: Option<String>,
}

/// Holds the user's current location.
pub struct LocationProvider<G: GeolocationSource> {
    source: G,
    state: watch::Sender<LocationState>,
}

impl<G: GeolocationSource> LocationProvider<G> {
    pub fn new(source: G) -> Self {
        let (state, _) = watch::channel(LocationState::default());
        Self { source, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<LocationState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LocationState {
        self.state.borrow().clone()
    }

    pub fn location(&self) -> Option<Location> {
        self.state.borrow().location.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Look up the device position and store it as the current location.
    ///
    /// On failure the previous location is kept and the error message is
    /// recorded. If the source is unavailable no lookup is attempted and
    /// `loading` never turns on.
    pub async fn get_current_location(&self) -> Result<Coordinates, GeolocationError> {
        if !self.source.is_available() {
            let err = GeolocationError::Unsupported;
            self.state.send_modify(|s| s.error = Some(err.to_string()));
            return Err(err);
        }

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        debug!("Resolving current position");

        let result = self.source.current_position().await;
        self.state.send_modify(|s| {
            s.loading = false;
            match &result {
                Ok(coords) => s.location = Some(Location::from_coordinates(*coords)),
                Err(e) => s.error = Some(e.to_string()),
            }
        });

        match &result {
            Ok(coords) => info!(
                latitude = coords.latitude,
                longitude = coords.longitude,
                "Current position resolved"
            ),
            Err(e) => warn!(error = %e, "Geolocation lookup failed"),
        }
        result
    }

    /// Replace the current location with one the user entered.
    pub fn set_manual_location(&self, location: Location) {
        debug!(location = %location, "Manual location set");
        self.state.send_modify(|s| {
            s.location = Some(location);
            s.error = None;
        });
    }

    /// Forget the current location and any error.
    pub fn clear_location(&self) {
        self.state.send_modify(|s| {
            s.location = None;
            s.error = None;
        });
    }
}
