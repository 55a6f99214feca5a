//! Geospatial utilities for classifying Tabimap photos.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Nearest-place matching within a search radius
//! - Distance-ranked place suggestions
//! - Proximity grouping of photo locations
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use tabimap_geo::{find_nearest_place, Coordinate, Place, PLACE_MATCH_RADIUS_M};
//!
//! let places = vec![
//!     Place::new("tokyo-station", "Tokyo Station", 35.6812, 139.7671),
//!     Place::new("tokyo-tower", "Tokyo Tower", 35.6586, 139.7454),
//! ];
//! let photo = Coordinate::new(35.681236, 139.767125);
//!
//! let nearest = find_nearest_place(&photo, &places, PLACE_MATCH_RADIUS_M).unwrap().unwrap();
//! assert_eq!(nearest.place.id, "tokyo-station");
//! ```

mod haversine;
mod nearest;
pub mod batch;
pub mod cluster;
mod error;

#[cfg(feature = "wasm")]
mod wasm;

pub use haversine::{
    haversine_distance, haversine_distance_meters, DistanceMetric, Haversine, EARTH_RADIUS_KM,
    EARTH_RADIUS_M,
};
pub use nearest::{
    find_nearest_place, find_nearest_place_with, MatchResult, PlaceDistance,
    PLACE_MATCH_RADIUS_M, TRIP_MATCH_RADIUS_M,
};
pub use batch::{places_within_radius, rank_places};
pub use cluster::{group_by_proximity, ProximityGroup, PHOTO_GROUP_RADIUS_M};
pub use error::{GeoError, GeoErrorCode, Result};

use serde::{Deserialize, Serialize};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    #[serde(alias = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    ///
    /// NaN fails every comparison, so non-finite axes are invalid too.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Returns the coordinate if valid, or an error naming the bad values.
    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({}, {})",
                self.latitude, self.longitude
            )))
        }
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// A cataloged place a photo can be matched to.
///
/// Extra fields in serialized places (address, category, notes, ...) are
/// ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Stable place identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Place {
    /// Creates a new place.
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lng,
        }
    }

    /// The place's position.
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Parse a JSON array of places.
///
/// # Errors
///
/// Returns [`GeoError::JsonError`] if the input is not an array of objects
/// with `id`, `name`, `lat` and `lng` fields.
pub fn parse_places(json: &str) -> Result<Vec<Place>> {
    Ok(serde_json::from_str(json)?)
}
