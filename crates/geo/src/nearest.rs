//! Nearest-place matching within a search radius.

use crate::error::check_radius;
use crate::{Coordinate, DistanceMetric, Haversine, Place, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Radius used when matching a photo against all known places.
pub const PLACE_MATCH_RADIUS_M: f64 = 200.0;

/// Radius used when matching a photo against the places of one trip.
pub const TRIP_MATCH_RADIUS_M: f64 = 500.0;

/// A place together with its distance from a query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDistance<'a> {
    /// The candidate place
    pub place: &'a Place,
    /// Distance from the query point in meters
    pub distance_meters: f64,
}

impl PlaceDistance<'_> {
    /// Owned summary of the match.
    pub fn to_match_result(&self) -> MatchResult {
        MatchResult {
            place_id: self.place.id.clone(),
            distance_meters: self.distance_meters,
        }
    }
}

/// Identifier and distance of a matched place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Id of the matched place
    pub place_id: String,
    /// Distance from the photo in meters
    pub distance_meters: f64,
}

/// Find the candidate closest to `coordinate` within `max_distance_meters`
/// using the haversine metric.
///
/// The boundary is inclusive. When candidates tie on distance, the one that
/// comes first wins.
///
/// # Errors
///
/// Returns an error if the query coordinate is out of range or the radius is
/// negative or NaN.
pub fn find_nearest_place<'a, I>(
    coordinate: &Coordinate,
    candidates: I,
    max_distance_meters: f64,
) -> Result<Option<PlaceDistance<'a>>>
where
    I: IntoIterator<Item = &'a Place>,
{
    find_nearest_place_with(&Haversine, coordinate, candidates, max_distance_meters)
}

/// Same as [`find_nearest_place`] with a caller-supplied distance metric.
pub fn find_nearest_place_with<'a, M, I>(
    metric: &M,
    coordinate: &Coordinate,
    candidates: I,
    max_distance_meters: f64,
) -> Result<Option<PlaceDistance<'a>>>
where
    M: DistanceMetric + ?Sized,
    I: IntoIterator<Item = &'a Place>,
{
    let coordinate = coordinate.validated()?;
    let max_distance_meters = check_radius(max_distance_meters)?;

    let mut best: Option<PlaceDistance<'a>> = None;
    let mut considered = 0usize;
    for place in candidates {
        considered += 1;
        let distance_meters = metric.distance_meters(&coordinate, &place.coordinate());
        // NaN distances fail this comparison and are never eligible
        if !(distance_meters <= max_distance_meters) {
            continue;
        }
        if best.is_none_or(|b| distance_meters < b.distance_meters) {
            best = Some(PlaceDistance { place, distance_meters });
        }
    }

    debug!(
        considered,
        max_distance_meters,
        matched = best.map(|b| b.place.id.as_str()),
        "nearest place search"
    );
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine_distance_meters;

    const METERS_PER_DEGREE_LAT: f64 = 111_194.93;

    fn tokyo_places() -> Vec<Place> {
        vec![
            Place::new("A", "Tokyo Station", 35.6812, 139.7671),
            Place::new("B", "Tokyo Tower", 35.6586, 139.7454),
        ]
    }

    fn north_of(origin: &Coordinate, id: &str, meters: f64) -> Place {
        Place::new(
            id,
            id,
            origin.latitude + meters / METERS_PER_DEGREE_LAT,
            origin.longitude,
        )
    }

    #[test]
    fn test_matches_station_within_radius() {
        let photo = Coordinate::new(35.681236, 139.767125);
        let places = tokyo_places();

        for radius in [PLACE_MATCH_RADIUS_M, 100.0] {
            let nearest = find_nearest_place(&photo, &places, radius).unwrap().unwrap();
            assert_eq!(nearest.place.id, "A");
            assert!(nearest.distance_meters < 10.0, "{}", nearest.distance_meters);
        }
    }

    #[test]
    fn test_tiny_radius_matches_nothing() {
        let photo = Coordinate::new(35.681236, 139.767125);
        let places = tokyo_places();
        assert!(find_nearest_place(&photo, &places, 0.1).unwrap().is_none());
    }

    #[test]
    fn test_prefers_closer_place_inside_radius() {
        let photo = Coordinate::new(48.8606, 2.3376);
        let places = vec![north_of(&photo, "far", 600.0), north_of(&photo, "near", 450.0)];

        let nearest = find_nearest_place(&photo, &places, TRIP_MATCH_RADIUS_M)
            .unwrap()
            .unwrap();
        assert_eq!(nearest.place.id, "near");
        assert!((nearest.distance_meters - 450.0).abs() < 1.0);
    }

    #[test]
    fn test_empty_candidates() {
        let photo = Coordinate::new(0.0, 0.0);
        assert!(find_nearest_place(&photo, &[] as &[Place], PLACE_MATCH_RADIUS_M).unwrap().is_none());
    }

    #[test]
    fn test_zero_radius_only_matches_exact_point() {
        let photo = Coordinate::new(35.0, 135.0);
        let places = vec![
            north_of(&photo, "close", 1.0),
            Place::new("exact", "exact", 35.0, 135.0),
        ];

        let nearest = find_nearest_place(&photo, &places, 0.0).unwrap().unwrap();
        assert_eq!(nearest.place.id, "exact");
        assert_eq!(nearest.distance_meters, 0.0);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let photo = Coordinate::new(10.0, 10.0);
        let places = vec![north_of(&photo, "edge", 200.0)];
        let exact = haversine_distance_meters(&photo, &places[0].coordinate());

        let nearest = find_nearest_place(&photo, &places, exact).unwrap();
        assert_eq!(nearest.map(|n| n.place.id.as_str()), Some("edge"));
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        let photo = Coordinate::new(-33.8568, 151.2153);
        let places = vec![
            Place::new("first", "Opera House", -33.8570, 151.2150),
            Place::new("second", "Opera House (dup)", -33.8570, 151.2150),
        ];

        let nearest = find_nearest_place(&photo, &places, 500.0).unwrap().unwrap();
        assert_eq!(nearest.place.id, "first");

        let reversed: Vec<_> = places.iter().rev().collect();
        let nearest = find_nearest_place(&photo, reversed, 500.0).unwrap().unwrap();
        assert_eq!(nearest.place.id, "second");
    }

    #[test]
    fn test_invalid_inputs() {
        let places = tokyo_places();
        assert!(find_nearest_place(&Coordinate::new(95.0, 0.0), &places, 200.0).is_err());
        assert!(find_nearest_place(&Coordinate::new(0.0, 0.0), &places, -1.0).is_err());
        assert!(find_nearest_place(&Coordinate::new(0.0, 0.0), &places, f64::NAN).is_err());
    }

    #[test]
    fn test_invalid_candidate_is_skipped() {
        let photo = Coordinate::new(0.0, 0.0);
        let places = vec![
            Place::new("broken", "broken", f64::NAN, 0.0),
            Place::new("ok", "ok", 0.0001, 0.0),
        ];
        let nearest = find_nearest_place(&photo, &places, 100.0).unwrap().unwrap();
        assert_eq!(nearest.place.id, "ok");
    }

    #[test]
    fn test_custom_metric() {
        struct Flat;
        impl DistanceMetric for Flat {
            fn distance_meters(&self, from: &Coordinate, to: &Coordinate) -> f64 {
                (to.latitude - from.latitude).abs() * 1000.0
            }
        }

        let photo = Coordinate::new(0.0, 0.0);
        let places = vec![Place::new("x", "x", 0.1, 50.0)];
        let nearest = find_nearest_place_with(&Flat, &photo, &places, 100.0).unwrap().unwrap();
        assert!((nearest.distance_meters - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_match_result_serialization() {
        let place = Place::new("p1", "Louvre", 48.8606, 2.3376);
        let found = PlaceDistance { place: &place, distance_meters: 12.5 };
        let json = serde_json::to_value(found.to_match_result()).unwrap();
        assert_eq!(json, serde_json::json!({"placeId": "p1", "distanceMeters": 12.5}));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn coordinate() -> impl Strategy<Value = Coordinate> {
            (-80.0f64..80.0, -170.0f64..170.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
        }

        proptest! {
            #[test]
            fn nearest_is_minimal_and_within_radius(
                photo in coordinate(),
                offsets in prop::collection::vec((-0.01f64..0.01, -0.01f64..0.01), 0..20),
                radius in 0.0f64..2000.0,
            ) {
                let places: Vec<Place> = offsets
                    .iter()
                    .enumerate()
                    .map(|(i, (dlat, dlng))| {
                        Place::new(i.to_string(), "p", photo.latitude + dlat, photo.longitude + dlng)
                    })
                    .collect();

                let found = find_nearest_place(&photo, &places, radius).unwrap();
                let distances: Vec<f64> = places
                    .iter()
                    .map(|p| haversine_distance_meters(&photo, &p.coordinate()))
                    .collect();

                match found {
                    Some(n) => {
                        prop_assert!(n.distance_meters <= radius);
                        let index: usize = n.place.id.parse().unwrap();
                        for (i, d) in distances.iter().enumerate() {
                            prop_assert!(*d >= n.distance_meters);
                            if i < index {
                                prop_assert!(*d > n.distance_meters);
                            }
                        }
                    }
                    None => prop_assert!(distances.iter().all(|d| *d > radius)),
                }
            }
        }
    }
}
