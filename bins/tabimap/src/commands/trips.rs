//! `tabimap trips`

use crate::data::load_trips;
use crate::Context;
use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use tabimap_classify::suggest_trips;
use tabimap_cli::output::Status;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y:%m:%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Accepts ISO-like and EXIF-style timestamps, or a bare date.
pub fn parse_taken_at(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
        .ok_or_else(|| anyhow!("Unrecognized capture time: {}", text))
}

pub fn run(ctx: &Context, taken_at: &str, trips: &Path, window: Option<u32>) -> Result<()> {
    let taken_at = parse_taken_at(taken_at)?;
    let trips = load_trips(trips)?;
    let window = window.unwrap_or(ctx.config.classify.trip_window_days);

    let suggested = suggest_trips(taken_at, &trips, window);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&suggested)?);
        return Ok(());
    }

    if suggested.is_empty() {
        Status::info(&format!("No trips within {} days of {}", window, taken_at.date()));
        return Ok(());
    }
    Status::header("Suggested trips");
    for trip in suggested {
        println!("  {} ({} - {})", trip.name, trip.start_date, trip.end_date);
    }
    Ok(())
}
