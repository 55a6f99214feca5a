//! WASM bindings for the geo crate.
//!
//! These bindings allow the geo crate to be used from JavaScript/TypeScript
//! in the browser.

use crate::{find_nearest_place, haversine_distance_meters, parse_places, rank_places, Coordinate};
use wasm_bindgen::prelude::*;

/// Calculate distance between two coordinates.
///
/// # Returns
/// Distance in meters
#[wasm_bindgen]
pub fn distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_distance_meters(&Coordinate::new(lat1, lng1), &Coordinate::new(lat2, lng2))
}

/// Find the nearest place within a radius.
///
/// # Arguments
/// * `lat` - Photo latitude
/// * `lng` - Photo longitude
/// * `places_json` - JSON array of places with id, name, lat and lng fields
/// * `max_distance_meters` - Search radius in meters
///
/// # Returns
/// JSON `{"placeId", "distanceMeters"}`, or `null` when nothing is in range
#[wasm_bindgen]
pub fn nearest_place(
    lat: f64,
    lng: f64,
    places_json: &str,
    max_distance_meters: f64,
) -> Result<String, JsValue> {
    let places = parse_places(places_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let found = find_nearest_place(&Coordinate::new(lat, lng), &places, max_distance_meters)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&found.map(|f| f.to_match_result()))
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Rank places by distance.
///
/// # Arguments
/// * `max_results` - Maximum results to return (0 for all)
///
/// # Returns
/// JSON array of `{"place", "distanceMeters"}`, closest first
#[wasm_bindgen]
pub fn rank_places_by_distance(
    lat: f64,
    lng: f64,
    places_json: &str,
    max_results: u32,
) -> Result<String, JsValue> {
    let places = parse_places(places_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let limit = if max_results == 0 { None } else { Some(max_results as usize) };
    let ranked = rank_places(&Coordinate::new(lat, lng), &places, limit)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&ranked)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}
