//! `tabimap rank`

use crate::data::load_places;
use crate::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;
use tabimap_cli::output::{format_distance, Status};
use tabimap_geo::{rank_places, Coordinate};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankedPlace<'a> {
    place_id: &'a str,
    name: &'a str,
    distance_meters: f64,
    distance_text: String,
}

pub fn run(ctx: &Context, lat: f64, lng: f64, places: &Path, limit: usize) -> Result<()> {
    let places = load_places(places)?;
    let ranked = rank_places(&Coordinate::new(lat, lng), &places, Some(limit))?;

    if ctx.json {
        let output: Vec<_> = ranked
            .iter()
            .map(|r| RankedPlace {
                place_id: &r.place.id,
                name: &r.place.name,
                distance_meters: r.distance_meters,
                distance_text: format_distance(r.distance_meters),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if ranked.is_empty() {
        Status::info("No places to rank");
        return Ok(());
    }
    Status::header("Nearby places");
    for (i, r) in ranked.iter().enumerate() {
        println!(
            "  {:>2}. {} {}",
            i + 1,
            r.place.name,
            format_distance(r.distance_meters).dimmed()
        );
    }
    Ok(())
}
