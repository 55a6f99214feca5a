//! Error types for the classify crate.

use tabimap_geo::GeoError;
use thiserror::Error;

/// Result type alias for classification operations.
pub type Result<T> = std::result::Result<T, ClassifyError>;

/// Errors that can occur while classifying photos.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Matcher rejected its inputs
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// Trip id not present in the trip list
    #[error("Unknown trip: {0}")]
    UnknownTrip(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error code for integration with tabimap error handling.
/// Range: 12xxx for classification errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyErrorCode {
    /// Invalid configuration
    Config = 12001,
    /// Geo error, see [`GeoError::code`]
    Geo = 12002,
    /// Unknown trip id
    UnknownTrip = 12003,
    /// JSON parsing error
    JsonParsing = 12004,
}

impl ClassifyError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ClassifyErrorCode {
        match self {
            ClassifyError::Config(_) => ClassifyErrorCode::Config,
            ClassifyError::Geo(_) => ClassifyErrorCode::Geo,
            ClassifyError::UnknownTrip(_) => ClassifyErrorCode::UnknownTrip,
            ClassifyError::Json(_) => ClassifyErrorCode::JsonParsing,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        ClassifyError::Config(message.into())
    }
}
