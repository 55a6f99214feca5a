//! JPEG marker segment scanning.

use crate::{ExifError, Result};

/// Start-of-image marker every JPEG begins with.
pub(crate) const SOI: [u8; 2] = [0xFF, 0xD8];

const APP1: u8 = 0xE1;
const SOS: u8 = 0xDA;
const EOI: u8 = 0xD9;

/// Identifier that opens an EXIF APP1 payload, followed by two pad bytes.
const EXIF_IDENTIFIER: &[u8; 4] = b"Exif";
const EXIF_HEADER_LEN: usize = 6;

/// Check for the JPEG start-of-image marker.
#[inline]
pub(crate) fn has_soi(data: &[u8]) -> bool {
    data.starts_with(&SOI)
}

/// Markers that carry no length field.
#[inline]
fn is_standalone(marker: u8) -> bool {
    matches!(marker, 0x01 | 0xD0..=0xD7)
}

/// Find the TIFF block of the first EXIF APP1 segment.
///
/// Returns `Ok(None)` when the segment list ends (start of scan, end of
/// image, a non-marker byte or the end of the buffer) without an EXIF
/// segment. The returned slice is clamped to the available bytes when the
/// buffer ends inside the segment.
pub(crate) fn find_exif_block(data: &[u8]) -> Result<Option<&[u8]>> {
    let mut offset = SOI.len();

    while offset + 4 <= data.len() {
        if data[offset] != 0xFF {
            tracing::trace!(offset, "segment scan hit a non-marker byte");
            return Ok(None);
        }

        let marker = data[offset + 1];
        if marker == 0xFF {
            // Fill byte before the real marker
            offset += 1;
            continue;
        }
        if is_standalone(marker) {
            offset += 2;
            continue;
        }
        if marker == SOS || marker == EOI {
            return Ok(None);
        }

        let length = u16::from_be_bytes([data[offset + 2], data[offset + 3]]);
        if length < 2 {
            return Err(ExifError::InvalidSegmentLength { marker, length });
        }

        let payload_start = offset + 4;
        let segment_end = (offset + 2 + length as usize).min(data.len());
        let payload = &data[payload_start..segment_end.max(payload_start)];

        if marker == APP1 && payload.starts_with(EXIF_IDENTIFIER) {
            if payload.len() < EXIF_HEADER_LEN {
                return Err(ExifError::Truncated {
                    offset: payload_start,
                    len: EXIF_HEADER_LEN,
                    size: data.len(),
                });
            }
            tracing::trace!(offset, length, "found EXIF segment");
            return Ok(Some(&payload[EXIF_HEADER_LEN..]));
        }

        tracing::trace!(offset, marker, length, "skipping segment");
        offset += length as usize + 2;
    }

    Ok(None)
}
