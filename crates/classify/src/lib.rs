//! Photo classification for Tabimap travel logs.
//!
//! Ties the EXIF parser and the place matcher together: read a photo's
//! location and capture time, attach it to the nearest cataloged place, and
//! suggest the trips it was probably taken on.
//!
//! # Example
//!
//! ```
//! use tabimap_classify::PhotoClassifier;
//! use tabimap_geo::Place;
//!
//! let classifier = PhotoClassifier::default();
//! let places = vec![Place::new("station", "Tokyo Station", 35.6812, 139.7671)];
//!
//! // A file without EXIF data is left unclassified.
//! let result = classifier.classify(b"plain bytes", &places).unwrap();
//! assert!(!result.auto_classified);
//! ```

mod classifier;
pub mod config;
mod error;
mod trip;

#[cfg(feature = "wasm")]
mod wasm;

pub use classifier::{Classification, PhotoClassifier};
pub use config::{ClassifierConfig, ClassifyConfig, Config, GroupingConfig, LoggingConfig};
pub use error::{ClassifyError, ClassifyErrorCode, Result};
pub use trip::{parse_trips, suggest_trips, Trip};

pub use tabimap_exif::{ExtractReport, GpsLocation, MetadataRecord};
pub use tabimap_geo::{MatchResult, Place};
