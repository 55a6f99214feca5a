//! Batch distance ranking with optional parallelism.
//!
//! Ranking backs the "suggested places" list shown when a photo is
//! reclassified by hand: every place is measured, the closest come first.

use crate::error::check_radius;
use crate::{haversine_distance_meters, Coordinate, Place, PlaceDistance, Result};

/// Measure the distance from `coordinate` to every place with a valid
/// position, preserving input order.
fn measure<'a>(coordinate: &Coordinate, places: &'a [Place]) -> Vec<PlaceDistance<'a>> {
    let single = |place: &'a Place| {
        let target = place.coordinate();
        target.is_valid().then(|| PlaceDistance {
            place,
            distance_meters: haversine_distance_meters(coordinate, &target),
        })
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        places.par_iter().filter_map(single).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        places.iter().filter_map(single).collect()
    }
}

/// Rank places by distance from `coordinate`, closest first.
///
/// Places at equal distance keep their input order. Places whose own
/// coordinate is out of range are left out.
///
/// # Arguments
/// * `coordinate` - Query point
/// * `places` - Candidate places
/// * `limit` - Maximum number of results to return (None for all)
///
/// # Example
/// ```
/// use tabimap_geo::{rank_places, Coordinate, Place};
///
/// let places = vec![
///     Place::new("tower", "Tokyo Tower", 35.6586, 139.7454),
///     Place::new("station", "Tokyo Station", 35.6812, 139.7671),
/// ];
/// let ranked = rank_places(&Coordinate::new(35.68, 139.76), &places, Some(1)).unwrap();
/// assert_eq!(ranked[0].place.id, "station");
/// ```
pub fn rank_places<'a>(
    coordinate: &Coordinate,
    places: &'a [Place],
    limit: Option<usize>,
) -> Result<Vec<PlaceDistance<'a>>> {
    let coordinate = coordinate.validated()?;
    let mut ranked = measure(&coordinate, places);

    // Stable sort, so ties stay in input order
    ranked.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    Ok(ranked)
}

/// All places within `radius_meters` of `coordinate`, closest first.
pub fn places_within_radius<'a>(
    coordinate: &Coordinate,
    places: &'a [Place],
    radius_meters: f64,
) -> Result<Vec<PlaceDistance<'a>>> {
    let radius_meters = check_radius(radius_meters)?;
    let mut ranked = rank_places(coordinate, places, None)?;
    ranked.retain(|r| r.distance_meters <= radius_meters);
    Ok(ranked)
}
