//! Reading places, trips and photo files.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tabimap_classify::Trip;
use tabimap_geo::Place;

/// Read a JSON list, either bare or under `key` in an app data export.
fn load_collection<T: DeserializeOwned>(path: &Path, key: &str) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let items = match value {
        Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| anyhow!("{} has no \"{}\" list", path.display(), key))?,
        other => other,
    };
    serde_json::from_value(items).with_context(|| format!("Invalid {} in {}", key, path.display()))
}

pub fn load_places(path: &Path) -> Result<Vec<Place>> {
    let places = load_collection(path, "places")?;
    tracing::debug!(path = %path.display(), count = places.len(), "places loaded");
    Ok(places)
}

pub fn load_trips(path: &Path) -> Result<Vec<Trip>> {
    let trips = load_collection(path, "trips")?;
    tracing::debug!(path = %path.display(), count = trips.len(), "trips loaded");
    Ok(trips)
}

/// Read at most `limit` leading bytes of a file.
pub fn read_head(path: &Path, limit: usize) -> Result<Vec<u8>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut data = Vec::with_capacity(limit.min(1 << 20));
    file.take(limit as u64)
        .read_to_end(&mut data)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(data)
}
