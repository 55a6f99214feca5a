//! Photo classification pipeline.

use crate::config::ClassifyConfig;
use crate::error::Result;
use crate::trip::{suggest_trips, Trip};
use serde::Serialize;
use tabimap_exif::{extract_metadata_report, ExtractReport, MetadataRecord};
use tabimap_geo::{find_nearest_place, Coordinate, MatchResult, Place};
use tracing::debug;

/// Outcome of classifying one photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Everything recovered from the photo's EXIF data
    pub metadata: MetadataRecord,
    /// Nearest place within the search radius, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<MatchResult>,
    /// True exactly when `matched` is present
    pub auto_classified: bool,
}

impl Classification {
    fn new(metadata: MetadataRecord, matched: Option<MatchResult>) -> Self {
        Self {
            auto_classified: matched.is_some(),
            metadata,
            matched,
        }
    }
}

/// Classifies photos by the place they were taken at.
#[derive(Debug, Clone, Default)]
pub struct PhotoClassifier {
    config: ClassifyConfig,
}

impl PhotoClassifier {
    /// Create a classifier using the given radii, read window and trip window.
    pub fn new(config: ClassifyConfig) -> Self {
        Self { config }
    }

    /// The classifier's settings.
    pub fn config(&self) -> &ClassifyConfig {
        &self.config
    }

    /// Extract metadata from the leading `max_read_bytes` of `data`.
    pub fn extract(&self, data: &[u8]) -> ExtractReport {
        let window = &data[..data.len().min(self.config.max_read_bytes)];
        extract_metadata_report(window)
    }

    /// Match a photo against every known place.
    pub fn classify(&self, data: &[u8], places: &[Place]) -> Result<Classification> {
        let metadata = self.extract(data).record;
        self.match_metadata(metadata, places, self.config.place_radius_m)
    }

    /// Match a photo against the places of `trip` only, in trip order.
    pub fn classify_for_trip(
        &self,
        data: &[u8],
        trip: &Trip,
        places: &[Place],
    ) -> Result<Classification> {
        let metadata = self.extract(data).record;
        let candidates = trip.resolve_places(places);
        self.match_metadata(metadata, candidates, self.config.trip_radius_m)
    }

    /// Classify many photos against every known place.
    ///
    /// Results are in input order. The first matcher error aborts the batch.
    pub fn classify_batch<D>(&self, inputs: &[D], places: &[Place]) -> Result<Vec<Classification>>
    where
        D: AsRef<[u8]> + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            inputs
                .par_iter()
                .map(|data| self.classify(data.as_ref(), places))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            inputs
                .iter()
                .map(|data| self.classify(data.as_ref(), places))
                .collect()
        }
    }

    /// Trips the photo described by `metadata` probably belongs to, using
    /// the configured date window. Empty when the photo has no timestamp.
    pub fn suggest_trips<'t>(&self, metadata: &MetadataRecord, trips: &'t [Trip]) -> Vec<&'t Trip> {
        match metadata.timestamp {
            Some(taken_at) => suggest_trips(taken_at, trips, self.config.trip_window_days),
            None => Vec::new(),
        }
    }

    /// Attach the nearest candidate within `radius_meters` to `metadata`.
    ///
    /// A record without a location is returned unclassified.
    pub fn match_metadata<'a, I>(
        &self,
        metadata: MetadataRecord,
        candidates: I,
        radius_meters: f64,
    ) -> Result<Classification>
    where
        I: IntoIterator<Item = &'a Place>,
    {
        let Some(location) = metadata.location else {
            debug!("photo has no location, left unclassified");
            return Ok(Classification::new(metadata, None));
        };

        let coordinate = Coordinate::new(location.latitude, location.longitude);
        let matched = find_nearest_place(&coordinate, candidates, radius_meters)?
            .map(|found| found.to_match_result());
        Ok(Classification::new(metadata, matched))
    }
}
