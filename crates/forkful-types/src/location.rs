//! User location attached to outgoing chat requests.
//!
//! A location is either a coordinate pair (from geolocation) or a free-form
//! address (entered manually), or both. It is forwarded to the backend
//! exactly as given: nothing here validates or normalizes it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Location sent along with a chat request.
///
/// Absent fields are omitted from the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Location {
    /// Location from a geolocation fix.
    pub fn from_coordinates(coords: Coordinates) -> Self {
        Self {
            latitude: Some(coords.latitude),
            longitude: Some(coords.longitude),
            ..Self::default()
        }
    }

    /// Location from a manually entered address.
    pub fn from_address(
        address: impl Into<String>,
        city: Option<String>,
        state: Option<String>,
    ) -> Self {
        Self {
            address: Some(address.into()),
            city,
            state,
            ..Self::default()
        }
    }

    /// Coordinates, if both halves are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    /// Address when known, otherwise "lat, lon".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(address) = &self.address {
            write!(f, "{address}")?;
            for part in [&self.city, &self.state].into_iter().flatten() {
                write!(f, ", {part}")?;
            }
            return Ok(());
        }
        match self.coordinates() {
            Some(c) => write!(f, "{}, {}", c.latitude, c.longitude),
            None => match (&self.city, &self.state) {
                (Some(city), Some(state)) => write!(f, "{city}, {state}"),
                (Some(city), None) => write!(f, "{city}"),
                (None, Some(state)) => write!(f, "{state}"),
                (None, None) => write!(f, "(unknown)"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_location_serializes_only_coords() {
        let loc = Location::from_coordinates(Coordinates::new(37.77, -122.42));
        let json = serde_json::to_value(&loc).unwrap();
        assert_eq!(json, serde_json::json!({"latitude": 37.77, "longitude": -122.42}));
    }

    #[test]
    fn test_address_location_display() {
        let loc = Location::from_address(
            "500 Congress Ave",
            Some("Austin".to_string()),
            Some("TX".to_string()),
        );
        assert_eq!(loc.to_string(), "500 Congress Ave, Austin, TX");
        assert!(loc.coordinates().is_none());
    }

    #[test]
    fn test_coordinates_display() {
        let loc = Location::from_coordinates(Coordinates::new(1.5, 2.25));
        assert_eq!(loc.to_string(), "1.5, 2.25");
    }

    #[test]
    fn test_half_coordinates_are_not_coordinates() {
        let loc = Location {
            latitude: Some(1.0),
            ..Location::default()
        };
        assert!(loc.coordinates().is_none());
        assert_eq!(loc.to_string(), "(unknown)");
    }
}
