//! EXIF location and capture-time extraction for Tabimap photos.
//!
//! This crate provides:
//! - JPEG segment scanning for the EXIF APP1 block
//! - TIFF directory decoding with either byte order
//! - GPS latitude/longitude recovery with hemisphere correction
//! - Capture timestamp, camera and orientation fields
//!
//! Extraction never fails: foreign formats, stripped metadata and corrupt
//! blocks all produce a (possibly empty) [`MetadataRecord`].
//!
//! # Example
//!
//! ```
//! use tabimap_exif::extract_metadata;
//!
//! // A PNG signature is not a JPEG, so nothing is recovered.
//! let record = extract_metadata(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
//! assert!(record.is_empty());
//! ```

#![warn(missing_docs)]

mod datetime;
mod error;
mod gps;
mod ifd;
mod jpeg;
mod reader;
mod tiff;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod fixtures;

pub use error::{ExifError, Result};
pub use reader::ByteOrder;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of leading file bytes worth reading: the EXIF block of a
/// well-formed JPEG sits in its first 64 KiB.
pub const RECOMMENDED_READ_LEN: usize = 65_536;

/// A GPS position decoded from EXIF, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsLocation {
    /// Latitude in degrees (-90 to 90), negative south of the equator
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180), negative west of Greenwich
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl GpsLocation {
    /// Returns true if both axes are finite and in range.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Metadata recovered from one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    /// Where the photo was taken. Only set when both axes decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GpsLocation>,
    /// When the photo was taken, in camera-local time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
    /// Camera make and model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    /// EXIF orientation (1-8)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u16>,
}

impl MetadataRecord {
    /// Returns true if nothing was recovered.
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.timestamp.is_none()
            && self.camera.is_none()
            && self.orientation.is_none()
    }
}

/// A metadata record together with the faults that cut parsing short.
#[derive(Debug, Clone, Default)]
pub struct ExtractReport {
    /// Everything decoded before (or around) the faults
    pub record: MetadataRecord,
    /// Malformed-data faults, in the order they were met
    pub faults: Vec<ExifError>,
}

/// Extract metadata from the leading bytes of an image file.
///
/// Non-JPEG input, JPEGs without EXIF and malformed blocks yield an empty or
/// partial record; this function never fails.
///
/// # Example
/// ```
/// use tabimap_exif::{extract_metadata, RECOMMENDED_READ_LEN};
///
/// let file = vec![0xFF, 0xD8, 0xFF, 0xD9];
/// let head = &file[..file.len().min(RECOMMENDED_READ_LEN)];
/// assert!(extract_metadata(head).location.is_none());
/// ```
pub fn extract_metadata(data: &[u8]) -> MetadataRecord {
    extract_metadata_report(data).record
}

/// Like [`extract_metadata`], but also returns the faults met on the way.
pub fn extract_metadata_report(data: &[u8]) -> ExtractReport {
    if !jpeg::has_soi(data) {
        tracing::trace!(len = data.len(), "not a JPEG");
        return ExtractReport::default();
    }

    match jpeg::find_exif_block(data) {
        Ok(Some(block)) => tiff::parse_tiff(block),
        Ok(None) => {
            tracing::trace!("no EXIF segment");
            ExtractReport::default()
        }
        Err(fault) => {
            tracing::debug!(%fault, "malformed JPEG segment list");
            ExtractReport {
                record: MetadataRecord::default(),
                faults: vec![fault],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, ExifBuilder, JPEG_TIFF_START};
    use chrono::NaiveDate;

    const TOKYO_STATION: (f64, f64) = (35.681236, 139.767125);

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
    }

    #[test]
    fn test_not_jpeg_is_empty() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
        let report = extract_metadata_report(&png);
        assert!(report.record.is_empty());
        assert!(report.faults.is_empty());

        assert!(extract_metadata(&[]).is_empty());
        assert!(extract_metadata(&[0xFF]).is_empty());
        assert!(extract_metadata(b"GIF89a").is_empty());
    }

    #[test]
    fn test_jpeg_without_exif() {
        let data = fixtures::wrap_app1(b"http://ns.adobe.com/xap/1.0/\0<x:xmpmeta/>");
        let report = extract_metadata_report(&data);
        assert!(report.record.is_empty());
        assert!(report.faults.is_empty());
    }

    #[test]
    fn test_gps_known_dms_big_endian() {
        let data = ExifBuilder::new(ByteOrder::BigEndian)
            .gps_ref(ifd::tags::GPS_LATITUDE_REF, b'N')
            .gps_dms(ifd::tags::GPS_LATITUDE, [(35, 1), (40, 1), (5245, 100)])
            .gps_ref(ifd::tags::GPS_LONGITUDE_REF, b'E')
            .gps_dms(ifd::tags::GPS_LONGITUDE, [(139, 1), (46, 1), (165, 100)])
            .jpeg();

        let location = extract_metadata(&data).location.unwrap();
        assert_close(location.latitude, 35.0 + 40.0 / 60.0 + 52.45 / 3600.0);
        assert_close(location.longitude, 139.0 + 46.0 / 60.0 + 1.65 / 3600.0);
    }

    #[test]
    fn test_gps_hemisphere_signs_little_endian() {
        // Buenos Aires
        let data = ExifBuilder::new(ByteOrder::LittleEndian)
            .gps_ref(ifd::tags::GPS_LATITUDE_REF, b'S')
            .gps_dms(ifd::tags::GPS_LATITUDE, [(34, 1), (36, 1), (12, 1)])
            .gps_ref(ifd::tags::GPS_LONGITUDE_REF, b'W')
            .gps_dms(ifd::tags::GPS_LONGITUDE, [(58, 1), (22, 1), (54, 1)])
            .jpeg();

        let location = extract_metadata(&data).location.unwrap();
        assert_close(location.latitude, -(34.0 + 36.0 / 60.0 + 12.0 / 3600.0));
        assert_close(location.longitude, -(58.0 + 22.0 / 60.0 + 54.0 / 3600.0));
    }

    #[test]
    fn test_gps_round_trip_both_byte_orders() {
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let data = ExifBuilder::new(order).location(-33.8568, 151.2153).jpeg();
            let location = extract_metadata(&data).location.unwrap();
            assert_close(location.latitude, -33.8568);
            assert_close(location.longitude, 151.2153);
        }
    }

    #[test]
    fn test_single_axis_does_not_populate_location() {
        let data = ExifBuilder::new(ByteOrder::BigEndian)
            .gps_ref(ifd::tags::GPS_LATITUDE_REF, b'N')
            .gps_dms(ifd::tags::GPS_LATITUDE, [(35, 1), (40, 1), (52, 1)])
            .jpeg();

        assert!(extract_metadata(&data).location.is_none());
    }

    #[test]
    fn test_zero_denominator_makes_axis_unavailable() {
        let data = ExifBuilder::new(ByteOrder::BigEndian)
            .gps_dms(ifd::tags::GPS_LATITUDE, [(35, 1), (40, 0), (52, 1)])
            .gps_dms(ifd::tags::GPS_LONGITUDE, [(139, 1), (46, 1), (1, 1)])
            .jpeg();

        let report = extract_metadata_report(&data);
        assert!(report.record.location.is_none());
        assert!(report.faults.iter().any(|f| matches!(f, ExifError::ZeroDenominator(_))));
    }

    #[test]
    fn test_gps_wrong_field_type_is_ignored() {
        let data = ExifBuilder::new(ByteOrder::BigEndian)
            .gps_shorts(ifd::tags::GPS_LATITUDE, &[35, 40, 52])
            .gps_dms(ifd::tags::GPS_LONGITUDE, [(139, 1), (46, 1), (1, 1)])
            .jpeg();

        let report = extract_metadata_report(&data);
        assert!(report.record.location.is_none());
        assert!(matches!(
            report.faults.as_slice(),
            [ExifError::UnexpectedField { tag: 0x0002, field_type: 3, count: 3 }]
        ));
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let data = ExifBuilder::new(ByteOrder::BigEndian)
            .gps_dms(ifd::tags::GPS_LATITUDE, [(95, 1), (0, 1), (0, 1)])
            .gps_dms(ifd::tags::GPS_LONGITUDE, [(10, 1), (0, 1), (0, 1)])
            .jpeg();

        let report = extract_metadata_report(&data);
        assert!(report.record.location.is_none());
        assert!(matches!(report.faults.as_slice(), [ExifError::CoordinateOutOfRange { .. }]));
    }

    #[test]
    fn test_timestamp_from_ifd0() {
        let data = ExifBuilder::new(ByteOrder::LittleEndian)
            .ascii(ifd::tags::DATE_TIME, "2024:03:15 14:30:05")
            .jpeg();

        assert_eq!(
            extract_metadata(&data).timestamp,
            Some(datetime(2024, 3, 15, 14, 30, 5))
        );
    }

    #[test]
    fn test_timestamp_from_exif_sub_directory() {
        let data = ExifBuilder::new(ByteOrder::BigEndian)
            .exif_ascii(ifd::tags::DATE_TIME_ORIGINAL, "2019:08:01 06:15:00")
            .jpeg();

        assert_eq!(
            extract_metadata(&data).timestamp,
            Some(datetime(2019, 8, 1, 6, 15, 0))
        );
    }

    #[test]
    fn test_first_timestamp_wins() {
        let data = ExifBuilder::new(ByteOrder::BigEndian)
            .ascii(ifd::tags::DATE_TIME, "2023:01:01 09:00:00")
            .exif_ascii(ifd::tags::DATE_TIME_ORIGINAL, "2022:12:31 23:59:59")
            .exif_ascii(ifd::tags::DATE_TIME_DIGITIZED, "2022:12:30 10:00:00")
            .jpeg();

        assert_eq!(
            extract_metadata(&data).timestamp,
            Some(datetime(2023, 1, 1, 9, 0, 0))
        );
    }

    #[test]
    fn test_invalid_timestamp_falls_through_to_next_tag() {
        let data = ExifBuilder::new(ByteOrder::BigEndian)
            .ascii(ifd::tags::DATE_TIME, "0000:00:00 00:00:00")
            .exif_ascii(ifd::tags::DATE_TIME_ORIGINAL, "2021:05:05 12:00:00")
            .jpeg();

        let report = extract_metadata_report(&data);
        assert_eq!(report.record.timestamp, Some(datetime(2021, 5, 5, 12, 0, 0)));
        assert!(matches!(report.faults.as_slice(), [ExifError::InvalidDateTime(_)]));
    }

    #[test]
    fn test_timestamp_in_ifd1_when_ifd0_has_none() {
        let data = ExifBuilder::new(ByteOrder::LittleEndian)
            .short(ifd::tags::ORIENTATION, 1)
            .ifd1_ascii(ifd::tags::DATE_TIME, "2020:02:02 02:02:02")
            .jpeg();

        assert_eq!(
            extract_metadata(&data).timestamp,
            Some(datetime(2020, 2, 2, 2, 2, 2))
        );
    }

    #[test]
    fn test_camera_and_orientation() {
        let data = ExifBuilder::new(ByteOrder::LittleEndian)
            .ascii(ifd::tags::MAKE, "FUJIFILM")
            .ascii(ifd::tags::MODEL, "X100V")
            .short(ifd::tags::ORIENTATION, 6)
            .jpeg();

        let record = extract_metadata(&data);
        assert_eq!(record.camera.as_deref(), Some("FUJIFILM X100V"));
        assert_eq!(record.orientation, Some(6));
    }

    #[test]
    fn test_camera_model_already_prefixed() {
        let data = ExifBuilder::new(ByteOrder::BigEndian)
            .ascii(ifd::tags::MAKE, "Canon")
            .ascii(ifd::tags::MODEL, "Canon EOS R6")
            .jpeg();

        assert_eq!(extract_metadata(&data).camera.as_deref(), Some("Canon EOS R6"));
    }

    #[test]
    fn test_truncated_gps_keeps_timestamp() {
        let builder = ExifBuilder::new(ByteOrder::BigEndian)
            .ascii(ifd::tags::DATE_TIME, "2024:07:20 18:45:00")
            .location(TOKYO_STATION.0, TOKYO_STATION.1);
        let mut data = builder.jpeg();
        let gps_dir = builder.gps_directory_offset().unwrap();

        // Cut through the middle of the second GPS entry.
        data.truncate(JPEG_TIFF_START + gps_dir + 2 + 12 + 5);

        let report = extract_metadata_report(&data);
        assert_eq!(report.record.timestamp, Some(datetime(2024, 7, 20, 18, 45, 0)));
        assert!(report.record.location.is_none());
        assert!(report.faults.iter().any(|f| matches!(f, ExifError::Truncated { .. })));
    }

    #[test]
    fn test_bad_byte_order() {
        let data = fixtures::wrap_tiff(b"XX\x2A\0\x08\0\0\0\0\0\0\0\0\0");
        let report = extract_metadata_report(&data);
        assert!(report.record.is_empty());
        assert_eq!(report.faults, vec![ExifError::InvalidByteOrder(0x5858)]);
    }

    #[test]
    fn test_bad_version() {
        let data = fixtures::wrap_tiff(b"II\x2B\0\x08\0\0\0\0\0\0\0\0\0");
        let report = extract_metadata_report(&data);
        assert!(report.record.is_empty());
        assert_eq!(report.faults, vec![ExifError::InvalidVersion(43)]);
    }

    #[test]
    fn test_directory_cycle_terminates() {
        // IFD0 at 8 with no entries whose next pointer is itself.
        let data = fixtures::wrap_tiff(b"II\x2A\0\x08\0\0\0\0\0\x08\0\0\0");
        let report = extract_metadata_report(&data);
        assert!(report.record.is_empty());
        assert_eq!(report.faults, vec![ExifError::DirectoryLoop(8)]);
    }

    #[test]
    fn test_exif_pointer_back_to_ifd0_keeps_later_entries() {
        let data = ExifBuilder::new(ByteOrder::BigEndian)
            .ascii(ifd::tags::DATE_TIME, "2024:07:20 18:45:00")
            .pointer(ifd::tags::EXIF_IFD, 8)
            .location(TOKYO_STATION.0, TOKYO_STATION.1)
            .jpeg();

        let report = extract_metadata_report(&data);
        assert_eq!(report.faults, vec![ExifError::DirectoryLoop(8)]);
        assert_eq!(report.record.timestamp, Some(datetime(2024, 7, 20, 18, 45, 0)));
        let location = report.record.location.unwrap();
        assert_close(location.latitude, TOKYO_STATION.0);
        assert_close(location.longitude, TOKYO_STATION.1);
    }

    #[test]
    fn test_gps_pointer_to_parsed_directory_keeps_chain() {
        let builder = |gps_at| {
            ExifBuilder::new(ByteOrder::LittleEndian)
                .exif_ascii(ifd::tags::DATE_TIME_ORIGINAL, "2019:08:01 06:15:00")
                .pointer(ifd::tags::GPS_IFD, gps_at)
                .ifd1_ascii(ifd::tags::MAKE, "RICOH")
        };
        let exif_dir = builder(0).exif_directory_offset().unwrap();
        let data = builder(exif_dir as u32).jpeg();

        let report = extract_metadata_report(&data);
        assert_eq!(report.faults, vec![ExifError::DirectoryLoop(exif_dir)]);
        assert!(report.record.location.is_none());
        assert_eq!(report.record.timestamp, Some(datetime(2019, 8, 1, 6, 15, 0)));
        assert_eq!(report.record.camera.as_deref(), Some("RICOH"));
    }

    /// Little-endian TIFF whose directories each hold one Exif pointer to
    /// the next, `levels` deep.
    fn nested_exif_directories(levels: usize) -> Vec<u8> {
        const DIRECTORY_LEN: usize = 2 + ifd::ENTRY_SIZE + 4;

        let mut tiff = b"II\x2A\0\x08\0\0\0".to_vec();
        for level in 0..levels {
            let child = (8 + DIRECTORY_LEN * (level + 1)) as u32;
            tiff.extend_from_slice(&1u16.to_le_bytes());
            tiff.extend_from_slice(&ifd::tags::EXIF_IFD.to_le_bytes());
            tiff.extend_from_slice(&4u16.to_le_bytes());
            tiff.extend_from_slice(&1u32.to_le_bytes());
            tiff.extend_from_slice(&child.to_le_bytes());
            tiff.extend_from_slice(&0u32.to_le_bytes());
        }
        tiff
    }

    #[test]
    fn test_deep_sub_directory_nesting_is_cut_off() {
        // Fills nearly the whole APP1 segment inside the 64 KiB read window
        let data = fixtures::wrap_tiff(&nested_exif_directories(3_600));
        assert!(data.len() < RECOMMENDED_READ_LEN);

        let report = extract_metadata_report(&data);
        assert!(report.record.is_empty());
        // IFD0 plus four nested levels are parsed; the fifth pointer is refused
        assert_eq!(report.faults, vec![ExifError::NestingTooDeep(8 + 18 * 5)]);
    }

    #[test]
    fn test_first_ifd_past_end() {
        let data = fixtures::wrap_tiff(b"MM\0\x2A\0\0\x10\0");
        let report = extract_metadata_report(&data);
        assert!(report.record.is_empty());
        assert!(matches!(report.faults.as_slice(), [ExifError::Truncated { .. }]));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = MetadataRecord {
            location: Some(GpsLocation { latitude: 1.5, longitude: -2.5 }),
            timestamp: Some(datetime(2024, 1, 2, 3, 4, 5)),
            camera: None,
            orientation: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["location"]["lat"], 1.5);
        assert_eq!(json["location"]["lng"], -2.5);
        assert_eq!(json["timestamp"], "2024-01-02T03:04:05");
        assert!(json.get("camera").is_none());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn location_round_trips(
                lat in -90.0f64..=90.0,
                lng in -180.0f64..=180.0,
                little in any::<bool>(),
            ) {
                let order = if little { ByteOrder::LittleEndian } else { ByteOrder::BigEndian };
                let data = ExifBuilder::new(order).location(lat, lng).jpeg();
                let location = extract_metadata(&data).location.unwrap();
                prop_assert!((location.latitude - lat).abs() < 1e-6);
                prop_assert!((location.longitude - lng).abs() < 1e-6);
            }

            #[test]
            fn arbitrary_bytes_never_panic(tail in proptest::collection::vec(any::<u8>(), 0..512)) {
                let mut data = vec![0xFF, 0xD8];
                data.extend(tail);
                let _ = extract_metadata_report(&data);
            }

            #[test]
            fn truncation_never_panics(cut in 0usize..400) {
                let data = ExifBuilder::new(ByteOrder::LittleEndian)
                    .ascii(ifd::tags::DATE_TIME, "2024:07:20 18:45:00")
                    .exif_ascii(ifd::tags::DATE_TIME_ORIGINAL, "2024:07:20 18:45:00")
                    .location(TOKYO_STATION.0, TOKYO_STATION.1)
                    .jpeg();
                let cut = cut.min(data.len());
                let _ = extract_metadata_report(&data[..cut]);
            }
        }
    }
}
