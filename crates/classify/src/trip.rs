//! Trips and time-based trip suggestions.

use crate::error::Result;
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tabimap_geo::Place;

/// A dated trip visiting an ordered list of places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Stable trip identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// First day of the trip
    pub start_date: NaiveDate,
    /// Last day of the trip, inclusive
    pub end_date: NaiveDate,
    /// Place ids, in visiting order
    #[serde(default)]
    pub places: Vec<String>,
}

impl Trip {
    /// Resolve this trip's place ids against `places`, keeping trip order.
    ///
    /// Unknown ids are skipped. When `places` holds the same id twice, the
    /// first occurrence is used.
    pub fn resolve_places<'a>(&self, places: &'a [Place]) -> Vec<&'a Place> {
        let mut by_id: HashMap<&str, &'a Place> = HashMap::with_capacity(places.len());
        for place in places {
            by_id.entry(place.id.as_str()).or_insert(place);
        }
        self.places
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).copied())
            .collect()
    }

    /// True if `date` falls within the trip widened by `window_days` on
    /// both sides. Both ends are inclusive.
    pub fn covers(&self, date: NaiveDate, window_days: u32) -> bool {
        let window = Days::new(u64::from(window_days));
        let from = self.start_date.checked_sub_days(window).unwrap_or(NaiveDate::MIN);
        let until = self.end_date.checked_add_days(window).unwrap_or(NaiveDate::MAX);
        (from..=until).contains(&date)
    }
}

/// Parse a JSON array of trips.
pub fn parse_trips(json: &str) -> Result<Vec<Trip>> {
    Ok(serde_json::from_str(json)?)
}

/// Trips a photo taken at `taken_at` probably belongs to.
///
/// Keeps trips whose widened date range covers the photo's date and orders
/// them by how far the trip's start is from the photo time. Equal
/// distances keep input order.
pub fn suggest_trips<'a>(taken_at: NaiveDateTime, trips: &'a [Trip], window_days: u32) -> Vec<&'a Trip> {
    let date = taken_at.date();
    let mut suggested: Vec<&Trip> = trips.iter().filter(|t| t.covers(date, window_days)).collect();
    suggested.sort_by_key(|t| {
        let start = t.start_date.and_time(chrono::NaiveTime::MIN);
        (taken_at - start).num_seconds().unsigned_abs()
    });
    tracing::debug!(
        candidates = trips.len(),
        suggested = suggested.len(),
        window_days,
        "trip suggestions"
    );
    suggested
}
