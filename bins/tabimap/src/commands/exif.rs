//! `tabimap exif`

use crate::data::read_head;
use crate::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tabimap_classify::PhotoClassifier;
use tabimap_cli::output::{format_coordinate, Status};

pub fn run(ctx: &Context, path: &Path) -> Result<()> {
    let classifier = PhotoClassifier::new(ctx.config.classify.clone());
    let data = read_head(path, classifier.config().max_read_bytes)?;
    let report = classifier.extract(&data);

    if ctx.json {
        let faults: Vec<String> = report.faults.iter().map(ToString::to_string).collect();
        let output = serde_json::json!({
            "path": path.to_string_lossy(),
            "metadata": report.record,
            "faults": faults,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let record = &report.record;
    Status::header(&path.display().to_string());
    if record.is_empty() {
        Status::warning("No EXIF metadata found");
    }
    if let Some(location) = record.location {
        Status::field("Location", &format_coordinate(location.latitude, location.longitude));
    }
    if let Some(taken_at) = record.timestamp {
        Status::field("Taken", &taken_at.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    if let Some(camera) = &record.camera {
        Status::field("Camera", camera);
    }
    if let Some(orientation) = record.orientation {
        Status::field("Orientation", &orientation.to_string());
    }

    if ctx.verbose {
        for fault in &report.faults {
            println!("  {} {}", "fault:".yellow(), fault);
        }
    }
    Ok(())
}
