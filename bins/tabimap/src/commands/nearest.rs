//! `tabimap nearest`

use crate::data::load_places;
use crate::Context;
use anyhow::Result;
use std::path::Path;
use tabimap_cli::output::{format_distance, Status};
use tabimap_geo::{find_nearest_place, Coordinate};

pub fn run(ctx: &Context, lat: f64, lng: f64, places: &Path, radius: Option<f64>) -> Result<()> {
    let places = load_places(places)?;
    let radius = radius.unwrap_or(ctx.config.classify.place_radius_m);

    let found = find_nearest_place(&Coordinate::new(lat, lng), &places, radius)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&found.map(|f| f.to_match_result()))?);
        return Ok(());
    }

    match found {
        Some(found) => Status::success(&format!(
            "{} ({}) {}",
            found.place.name,
            found.place.id,
            format_distance(found.distance_meters)
        )),
        None => Status::info(&format!("No place within {}", format_distance(radius))),
    }
    Ok(())
}
