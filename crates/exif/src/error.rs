//! Error types for the exif crate.
//!
//! None of these reach callers of [`extract_metadata`](crate::extract_metadata):
//! they cut a single parsing stage short and are collected into
//! [`ExtractReport::faults`](crate::ExtractReport) for diagnostics.

use thiserror::Error;

/// Result type alias for exif parsing stages.
pub type Result<T> = std::result::Result<T, ExifError>;

/// Malformed-data faults met while decoding an EXIF block.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExifError {
    /// A read ran past the end of the available bytes
    #[error("truncated data: {len} bytes at offset {offset} exceed buffer of {size} bytes")]
    Truncated {
        /// Offset of the attempted read
        offset: usize,
        /// Number of bytes requested
        len: usize,
        /// Size of the buffer being read
        size: usize,
    },

    /// A JPEG segment declared a length shorter than its own length field
    #[error("invalid segment length {length} for marker 0xFF{marker:02X}")]
    InvalidSegmentLength {
        /// Marker code (second byte)
        marker: u8,
        /// Declared length
        length: u16,
    },

    /// TIFF header did not start with `II` or `MM`
    #[error("invalid byte order marker 0x{0:04X}")]
    InvalidByteOrder(u16),

    /// TIFF version sentinel was not 42
    #[error("invalid TIFF version {0}")]
    InvalidVersion(u16),

    /// A directory offset was seen twice, or the chain grew too long
    #[error("directory chain loops or is too long at offset {0}")]
    DirectoryLoop(usize),

    /// Sub-directories were nested deeper than the parser follows
    #[error("sub-directory at offset {0} nested too deeply")]
    NestingTooDeep(usize),

    /// An entry had a type or count the tag does not allow
    #[error("unexpected field for tag 0x{tag:04X}: type {field_type}, count {count}")]
    UnexpectedField {
        /// Tag number
        tag: u16,
        /// Raw field type code
        field_type: u16,
        /// Value count
        count: u32,
    },

    /// A rational value had a zero denominator
    #[error("rational with zero denominator at offset {0}")]
    ZeroDenominator(usize),

    /// An ASCII value was not valid text
    #[error("invalid text value for tag 0x{0:04X}")]
    InvalidText(u16),

    /// A date-time value did not match `YYYY:MM:DD HH:MM:SS`
    #[error("invalid date-time value {0:?}")]
    InvalidDateTime(String),

    /// Decoded GPS coordinate fell outside the valid latitude/longitude range
    #[error("GPS coordinate out of range: {latitude}, {longitude}")]
    CoordinateOutOfRange {
        /// Decoded latitude
        latitude: f64,
        /// Decoded longitude
        longitude: f64,
    },
}
