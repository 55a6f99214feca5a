//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Negative or non-numeric search radius
    #[error("Invalid radius: {0} (must be a non-negative number of meters)")]
    InvalidRadius(f64),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with tabimap error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid coordinate values
    InvalidCoordinate = 10001,
    /// Invalid search radius
    InvalidRadius = 10002,
    /// JSON parsing error
    JsonParsing = 10003,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidRadius(_) => GeoErrorCode::InvalidRadius,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}

/// Reject radii that no distance can satisfy meaningfully.
pub(crate) fn check_radius(radius_meters: f64) -> Result<f64> {
    if radius_meters >= 0.0 {
        Ok(radius_meters)
    } else {
        Err(GeoError::InvalidRadius(radius_meters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GeoError::InvalidRadius(-1.0).code(), GeoErrorCode::InvalidRadius);
        assert_eq!(GeoErrorCode::InvalidCoordinate as u32, 10001);
    }

    #[test]
    fn test_check_radius() {
        assert_eq!(check_radius(0.0).unwrap(), 0.0);
        assert_eq!(check_radius(f64::INFINITY).unwrap(), f64::INFINITY);
        assert!(check_radius(-0.5).is_err());
        assert!(check_radius(f64::NAN).is_err());
    }
}
