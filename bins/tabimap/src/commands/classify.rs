//! `tabimap classify`

use crate::data::{load_places, load_trips, read_head};
use crate::Context;
use anyhow::Result;
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabimap_classify::{Classification, ClassifyError, PhotoClassifier, Trip};
use tabimap_cli::output::{format_count, format_distance, format_duration, Status};
use tabimap_cli::progress::{finish_success, photo_progress};
use tabimap_geo::{group_by_proximity, Coordinate, Place, ProximityGroup};
use tabimap_telemetry::timed_span;
use walkdir::WalkDir;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhotoResult {
    path: String,
    #[serde(flatten)]
    classification: Option<Classification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    suggested_trips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct Report {
    photos: Vec<PhotoResult>,
    groups: Vec<ProximityGroup>,
}

fn photo_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

pub fn run(
    ctx: &Context,
    dir: &Path,
    places: &Path,
    trips: Option<&Path>,
    trip_id: Option<&str>,
) -> Result<()> {
    let places = load_places(places)?;
    let trips = trips.map(load_trips).transpose()?.unwrap_or_default();
    let trip = trip_id
        .map(|id| {
            trips
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| ClassifyError::UnknownTrip(id.to_string()))
        })
        .transpose()?;

    let classifier = PhotoClassifier::new(ctx.config.classify.clone());
    let files = photo_files(dir);

    let pb = photo_progress(files.len() as u64);
    let photos = {
        timed_span!("classify_directory", photos = files.len());
        files
            .par_iter()
            .progress_with(pb.clone())
            .map(|path| classify_file(&classifier, path, &places, &trips, trip))
            .collect::<Result<Vec<_>>>()?
    };
    finish_success(&pb, "done");
    let elapsed = pb.elapsed();

    let locations: Vec<Option<Coordinate>> = photos
        .iter()
        .map(|p| {
            p.classification
                .as_ref()
                .and_then(|c| c.metadata.location)
                .map(|l| Coordinate::new(l.latitude, l.longitude))
        })
        .collect();
    let groups = group_by_proximity(locations, ctx.config.grouping.photo_group_radius_m)?;

    if ctx.json {
        let report = Report { photos, groups };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&photos, &places, &groups, elapsed);
    Ok(())
}

fn classify_file(
    classifier: &PhotoClassifier,
    path: &Path,
    places: &[Place],
    trips: &[Trip],
    trip: Option<&Trip>,
) -> Result<PhotoResult> {
    let path_text = path.to_string_lossy().into_owned();
    let data = match read_head(path, classifier.config().max_read_bytes) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(path = %path_text, error = %e, "skipping unreadable file");
            return Ok(PhotoResult {
                path: path_text,
                classification: None,
                suggested_trips: Vec::new(),
                error: Some(format!("{:#}", e)),
            });
        }
    };

    let classification = match trip {
        Some(trip) => classifier.classify_for_trip(&data, trip, places)?,
        None => classifier.classify(&data, places)?,
    };
    let suggested_trips = classifier
        .suggest_trips(&classification.metadata, trips)
        .into_iter()
        .map(|t| t.id.clone())
        .collect();

    Ok(PhotoResult {
        path: path_text,
        classification: Some(classification),
        suggested_trips,
        error: None,
    })
}

fn print_summary(
    photos: &[PhotoResult],
    places: &[Place],
    groups: &[ProximityGroup],
    elapsed: std::time::Duration,
) {
    Status::header("Classification");
    for photo in photos {
        let Some(classification) = &photo.classification else {
            let reason = photo.error.as_deref().unwrap_or("unreadable");
            Status::warning(&format!("{}: {}", photo.path, reason));
            continue;
        };
        match &classification.matched {
            Some(m) => {
                let name = places
                    .iter()
                    .find(|p| p.id == m.place_id)
                    .map_or(m.place_id.as_str(), |p| p.name.as_str());
                let distance = format_distance(m.distance_meters);
                Status::success(&format!("{} → {} ({})", photo.path, name, distance));
            }
            None if classification.metadata.location.is_none() => {
                Status::info(&format!("{}: no location", photo.path));
            }
            None => Status::info(&format!("{}: no place nearby", photo.path)),
        }
        if !photo.suggested_trips.is_empty() {
            println!("    trips: {}", photo.suggested_trips.join(", "));
        }
    }

    let classified = photos
        .iter()
        .filter(|p| p.classification.as_ref().is_some_and(|c| c.auto_classified))
        .count();
    println!();
    println!(
        "{} classified of {} in {} ({})",
        classified,
        format_count(photos.len(), "photo", "photos"),
        format_duration(elapsed),
        format_count(groups.len(), "map marker", "map markers"),
    );
}
