//! GPS sub-directory decoding.

use crate::ifd::{self, tags, Entry, FieldType};
use crate::reader::TiffReader;
use crate::{ExifError, GpsLocation, Result};

/// Degrees, minutes and seconds stored as three RATIONALs.
const DMS_COUNT: u32 = 3;

/// Convert degrees/minutes/seconds to decimal degrees.
#[inline]
pub(crate) fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

/// Decode one latitude or longitude magnitude.
fn read_axis(reader: &TiffReader<'_>, entry: &Entry) -> Result<f64> {
    if entry.field_type != FieldType::Rational || entry.count != DMS_COUNT {
        return Err(entry.unexpected());
    }
    let offset = entry.value_offset()?;
    let degrees = reader.rational(offset)?;
    let minutes = reader.rational(offset.saturating_add(8))?;
    let seconds = reader.rational(offset.saturating_add(16))?;
    Ok(dms_to_decimal(degrees, minutes, seconds))
}

/// First byte of a reference value (`N`, `S`, `E` or `W`).
fn read_ref(reader: &TiffReader<'_>, entry: &Entry) -> Result<u8> {
    let bytes = entry.value_bytes(reader)?;
    bytes.first().copied().ok_or_else(|| entry.unexpected())
}

/// Parse the GPS directory at `offset`.
///
/// Axis-level faults (bad type, zero denominator, value past the buffer) only
/// make that axis unavailable and are pushed to `faults`; a fault reading the
/// directory itself is returned. A location is produced only when both axes
/// decoded.
pub(crate) fn parse_gps_directory(
    reader: &TiffReader<'_>,
    offset: usize,
    faults: &mut Vec<ExifError>,
) -> Result<Option<GpsLocation>> {
    let mut latitude = None;
    let mut longitude = None;
    let mut latitude_ref = None;
    let mut longitude_ref = None;

    for entry_offset in ifd::entry_offsets(reader, offset)? {
        let entry = Entry::read(reader, entry_offset)?;
        let decoded = match entry.tag {
            tags::GPS_LATITUDE_REF => read_ref(reader, &entry).map(|r| latitude_ref = Some(r)),
            tags::GPS_LATITUDE => read_axis(reader, &entry).map(|v| latitude = Some(v)),
            tags::GPS_LONGITUDE_REF => read_ref(reader, &entry).map(|r| longitude_ref = Some(r)),
            tags::GPS_LONGITUDE => read_axis(reader, &entry).map(|v| longitude = Some(v)),
            _ => Ok(()),
        };
        if let Err(fault) = decoded {
            tracing::debug!(tag = entry.tag, %fault, "GPS field unavailable");
            faults.push(fault);
        }
    }

    let (Some(mut latitude), Some(mut longitude)) = (latitude, longitude) else {
        return Ok(None);
    };
    if latitude_ref == Some(b'S') {
        latitude = -latitude;
    }
    if longitude_ref == Some(b'W') {
        longitude = -longitude;
    }

    let location = GpsLocation { latitude, longitude };
    if !location.is_valid() {
        return Err(ExifError::CoordinateOutOfRange { latitude, longitude });
    }
    Ok(Some(location))
}
