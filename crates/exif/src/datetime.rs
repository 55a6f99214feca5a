//! EXIF date-time strings.

use chrono::NaiveDateTime;

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Parse a `YYYY:MM:DD HH:MM:SS` value.
///
/// The layout is checked byte by byte before handing off to chrono, which on
/// its own accepts variable-width fields. Placeholder values such as
/// `0000:00:00 00:00:00` are rejected as invalid dates.
pub(crate) fn parse_exif_datetime(text: &str) -> Option<NaiveDateTime> {
    let bytes = text.as_bytes();
    if bytes.len() != 19 {
        return None;
    }
    let well_formed = bytes.iter().enumerate().all(|(i, &b)| match i {
        4 | 7 | 13 | 16 => b == b':',
        10 => b == b' ',
        _ => b.is_ascii_digit(),
    });
    if !well_formed {
        return None;
    }
    NaiveDateTime::parse_from_str(text, EXIF_DATETIME_FORMAT).ok()
}
