//! WASM bindings for photo classification.
//!
//! The browser reads the first 64 KiB of an uploaded file and hands the
//! bytes over; results come back as JSON strings.

use crate::{parse_trips, ClassifyConfig, PhotoClassifier};
use tabimap_exif::extract_metadata;
use tabimap_geo::parse_places;
use wasm_bindgen::prelude::*;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Extract location, timestamp and camera fields from a JPEG.
///
/// # Returns
/// JSON metadata record; fields that were not found are omitted
#[wasm_bindgen]
pub fn extract_metadata_json(bytes: &[u8]) -> Result<String, JsValue> {
    serde_json::to_string(&extract_metadata(bytes)).map_err(js_error)
}

/// Classify a photo against a list of places.
///
/// # Arguments
/// * `bytes` - Leading bytes of the photo file
/// * `places_json` - JSON array of places with id, name, lat and lng fields
/// * `max_distance_meters` - Search radius in meters
///
/// # Returns
/// JSON classification with `metadata`, `matched` and `autoClassified`
#[wasm_bindgen]
pub fn classify_photo(
    bytes: &[u8],
    places_json: &str,
    max_distance_meters: f64,
) -> Result<String, JsValue> {
    let places = parse_places(places_json).map_err(js_error)?;

    let classifier = PhotoClassifier::new(ClassifyConfig {
        place_radius_m: max_distance_meters,
        ..ClassifyConfig::default()
    });
    let result = classifier.classify(bytes, &places).map_err(js_error)?;

    serde_json::to_string(&result).map_err(js_error)
}

/// Suggest trips for a photo from its capture time.
///
/// # Arguments
/// * `bytes` - Leading bytes of the photo file
/// * `trips_json` - JSON array of trips with camelCase fields
/// * `window_days` - Days before a trip's start and after its end still suggested
///
/// # Returns
/// JSON array of trips, closest start first; empty for undated photos
#[wasm_bindgen]
pub fn suggest_trips_for_photo(
    bytes: &[u8],
    trips_json: &str,
    window_days: u32,
) -> Result<String, JsValue> {
    let trips = parse_trips(trips_json).map_err(js_error)?;

    let classifier = PhotoClassifier::new(ClassifyConfig {
        trip_window_days: window_days,
        ..ClassifyConfig::default()
    });
    let metadata = classifier.extract(bytes).record;

    serde_json::to_string(&classifier.suggest_trips(&metadata, &trips)).map_err(js_error)
}
