//! Proximity grouping of photo locations.
//!
//! Photos taken within a few meters of each other are shown as one marker.
//! Grouping is first-fit: each point joins the first group whose anchor is
//! close enough, otherwise it starts a new group anchored on itself.

use crate::error::check_radius;
use crate::{haversine_distance_meters, Coordinate, Result};
use serde::Serialize;

/// Radius within which photos collapse into a single marker.
pub const PHOTO_GROUP_RADIUS_M: f64 = 10.0;

/// A set of nearby points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityGroup {
    /// Position of the first member
    pub anchor: Coordinate,
    /// Input indices of the members, in input order
    pub members: Vec<usize>,
}

impl ProximityGroup {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; a group has at least its anchor.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group points lying strictly closer than `radius_meters` to a group's
/// anchor.
///
/// `None` entries (photos without a location) and invalid coordinates are
/// skipped but still consume an index, so member indices refer back to the
/// caller's sequence.
pub fn group_by_proximity<I>(points: I, radius_meters: f64) -> Result<Vec<ProximityGroup>>
where
    I: IntoIterator<Item = Option<Coordinate>>,
{
    let radius_meters = check_radius(radius_meters)?;
    let mut groups: Vec<ProximityGroup> = Vec::new();

    for (index, point) in points.into_iter().enumerate() {
        let Some(point) = point.filter(Coordinate::is_valid) else {
            continue;
        };
        match groups
            .iter_mut()
            .find(|g| haversine_distance_meters(&g.anchor, &point) < radius_meters)
        {
            Some(group) => group.members.push(index),
            None => groups.push(ProximityGroup { anchor: point, members: vec![index] }),
        }
    }

    tracing::trace!(groups = groups.len(), radius_meters, "grouped points");
    Ok(groups)
}
