//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A way of measuring the distance in meters between two coordinates.
///
/// Matching and ranking are generic over this so callers can plug in a
/// different model of the Earth.
pub trait DistanceMetric: Send + Sync {
    /// Distance between `from` and `to` in meters.
    fn distance_meters(&self, from: &Coordinate, to: &Coordinate) -> f64;
}

/// Great-circle distance on a sphere of radius [`EARTH_RADIUS_M`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    #[inline]
    fn distance_meters(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        haversine_distance_meters(from, to)
    }
}

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Uses the Haversine formula for accurate distance calculation on a sphere.
///
/// # Arguments
/// * `from` - Starting coordinate
/// * `to` - Ending coordinate
///
/// # Returns
/// Distance in kilometers
///
/// # Example
/// ```
/// use tabimap_geo::{haversine_distance, Coordinate};
///
/// let tokyo = Coordinate::new(35.6812, 139.7671);
/// let kyoto = Coordinate::new(34.9858, 135.7588);
///
/// let distance = haversine_distance(&tokyo, &kyoto);
/// assert!((distance - 371.0).abs() < 5.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two coordinates in meters.
///
/// # Arguments
/// * `from` - Starting coordinate
/// * `to` - Ending coordinate
///
/// # Returns
/// Distance in meters
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}
