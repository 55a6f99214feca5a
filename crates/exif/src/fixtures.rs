//! Synthetic JPEG/EXIF buffers for tests.
//!
//! Compiled for this crate's own tests and, with the `test-support`
//! feature, for downstream crates' tests.

use crate::ifd::{tags, ENTRY_SIZE};
use crate::ByteOrder;

/// Offset of the TIFF header inside buffers built by [`wrap_app1`]:
/// SOI (2) + APP0 segment (18) + APP1 marker/length (4) + `Exif\0\0` (6).
pub const JPEG_TIFF_START: usize = 30;

const APP0_JFIF: [u8; 18] = [
    0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01,
    0x00, 0x00,
];

/// Wrap an APP1 payload in a minimal JPEG (SOI, JFIF APP0, APP1, SOS, EOI).
pub fn wrap_app1(payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend_from_slice(&APP0_JFIF);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    out.extend_from_slice(&[0xAB, 0xCD, 0xEF]);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// Wrap a raw TIFF block as the EXIF segment of a minimal JPEG.
pub fn wrap_tiff(tiff: &[u8]) -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(tiff);
    wrap_app1(&payload)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    Ifd0,
    Exif,
    Gps,
    Ifd1,
}

#[derive(Debug, Clone)]
struct Field {
    tag: u16,
    field_type: u16,
    count: u32,
    data: Vec<u8>,
}

/// Builds a TIFF block with IFD0, optional Exif and GPS sub-directories and
/// an optional IFD1. Each directory is followed by its own out-of-line
/// values, and directories are written in the order IFD0, Exif, GPS, IFD1.
#[derive(Debug, Clone)]
pub struct ExifBuilder {
    order: ByteOrder,
    ifd0: Vec<Field>,
    exif: Vec<Field>,
    gps: Vec<Field>,
    ifd1: Vec<Field>,
}

impl ExifBuilder {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            order,
            ifd0: Vec::new(),
            exif: Vec::new(),
            gps: Vec::new(),
            ifd1: Vec::new(),
        }
    }

    fn u16(&self, value: u16) -> [u8; 2] {
        match self.order {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        }
    }

    fn u32(&self, value: u32) -> [u8; 4] {
        match self.order {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        }
    }

    fn ascii_field(tag: u16, text: &str) -> Field {
        let mut data = text.as_bytes().to_vec();
        data.push(0);
        Field { tag, field_type: 2, count: data.len() as u32, data }
    }

    pub fn ascii(mut self, tag: u16, text: &str) -> Self {
        self.ifd0.push(Self::ascii_field(tag, text));
        self
    }

    pub fn exif_ascii(mut self, tag: u16, text: &str) -> Self {
        self.exif.push(Self::ascii_field(tag, text));
        self
    }

    pub fn ifd1_ascii(mut self, tag: u16, text: &str) -> Self {
        self.ifd1.push(Self::ascii_field(tag, text));
        self
    }

    pub fn short(mut self, tag: u16, value: u16) -> Self {
        let data = self.u16(value).to_vec();
        self.ifd0.push(Field { tag, field_type: 3, count: 1, data });
        self
    }

    /// Add a LONG directory pointer to IFD0 with a fixed target offset.
    /// Only used for tags whose directory the builder does not write itself.
    pub fn pointer(mut self, tag: u16, offset: u32) -> Self {
        let data = self.u32(offset).to_vec();
        self.ifd0.push(Field { tag, field_type: 4, count: 1, data });
        self
    }

    pub fn gps_ref(mut self, tag: u16, reference: u8) -> Self {
        self.gps.push(Field { tag, field_type: 2, count: 2, data: vec![reference, 0] });
        self
    }

    pub fn gps_dms(mut self, tag: u16, dms: [(u32, u32); 3]) -> Self {
        let mut data = Vec::with_capacity(24);
        for (numerator, denominator) in dms {
            data.extend_from_slice(&self.u32(numerator));
            data.extend_from_slice(&self.u32(denominator));
        }
        self.gps.push(Field { tag, field_type: 5, count: 3, data });
        self
    }

    pub fn gps_shorts(mut self, tag: u16, values: &[u16]) -> Self {
        let data = values.iter().flat_map(|&v| self.u16(v)).collect();
        self.gps.push(Field { tag, field_type: 3, count: values.len() as u32, data });
        self
    }

    /// Encode a decimal coordinate as reference letters plus DMS rationals.
    pub fn location(self, latitude: f64, longitude: f64) -> Self {
        let lat_ref = if latitude < 0.0 { b'S' } else { b'N' };
        let lng_ref = if longitude < 0.0 { b'W' } else { b'E' };
        self.gps_ref(tags::GPS_LATITUDE_REF, lat_ref)
            .gps_dms(tags::GPS_LATITUDE, to_dms(latitude))
            .gps_ref(tags::GPS_LONGITUDE_REF, lng_ref)
            .gps_dms(tags::GPS_LONGITUDE, to_dms(longitude))
    }

    fn directories(&self) -> Vec<(Dir, Vec<Field>)> {
        let mut ifd0 = self.ifd0.clone();
        if !self.exif.is_empty() {
            ifd0.push(Field { tag: tags::EXIF_IFD, field_type: 4, count: 1, data: vec![0; 4] });
        }
        if !self.gps.is_empty() {
            ifd0.push(Field { tag: tags::GPS_IFD, field_type: 4, count: 1, data: vec![0; 4] });
        }

        let mut dirs = vec![(Dir::Ifd0, ifd0)];
        for (dir, fields) in [(Dir::Exif, &self.exif), (Dir::Gps, &self.gps), (Dir::Ifd1, &self.ifd1)] {
            if !fields.is_empty() {
                dirs.push((dir, fields.clone()));
            }
        }
        for (_, fields) in &mut dirs {
            fields.sort_by_key(|f| f.tag);
        }
        dirs
    }

    fn offsets(dirs: &[(Dir, Vec<Field>)]) -> Vec<(Dir, usize)> {
        let mut offset = 8;
        dirs.iter()
            .map(|(dir, fields)| {
                let at = offset;
                offset += directory_size(fields);
                (*dir, at)
            })
            .collect()
    }

    fn offset_of(offsets: &[(Dir, usize)], dir: Dir) -> Option<usize> {
        offsets.iter().find(|(d, _)| *d == dir).map(|(_, at)| *at)
    }

    /// Offset of the GPS directory from the TIFF header start.
    pub fn gps_directory_offset(&self) -> Option<usize> {
        Self::offset_of(&Self::offsets(&self.directories()), Dir::Gps)
    }

    /// Offset of the Exif sub-directory from the TIFF header start.
    pub fn exif_directory_offset(&self) -> Option<usize> {
        Self::offset_of(&Self::offsets(&self.directories()), Dir::Exif)
    }

    pub fn tiff(&self) -> Vec<u8> {
        let mut dirs = self.directories();
        let offsets = Self::offsets(&dirs);
        let exif_at = Self::offset_of(&offsets, Dir::Exif).unwrap_or(0) as u32;
        let gps_at = Self::offset_of(&offsets, Dir::Gps).unwrap_or(0) as u32;
        let ifd1_at = Self::offset_of(&offsets, Dir::Ifd1).unwrap_or(0) as u32;

        for field in &mut dirs[0].1 {
            match field.tag {
                tags::EXIF_IFD if !self.exif.is_empty() => field.data = self.u32(exif_at).to_vec(),
                tags::GPS_IFD if !self.gps.is_empty() => field.data = self.u32(gps_at).to_vec(),
                _ => {}
            }
        }

        let mut out = Vec::new();
        out.extend_from_slice(match self.order {
            ByteOrder::LittleEndian => b"II",
            ByteOrder::BigEndian => b"MM",
        });
        out.extend_from_slice(&self.u16(42));
        out.extend_from_slice(&self.u32(8));

        for ((dir, fields), (_, at)) in dirs.iter().zip(&offsets) {
            assert_eq!(out.len(), *at);
            out.extend_from_slice(&self.u16(fields.len() as u16));

            let mut cursor = at + 2 + fields.len() * ENTRY_SIZE + 4;
            let mut data_area = Vec::new();
            for field in fields {
                out.extend_from_slice(&self.u16(field.tag));
                out.extend_from_slice(&self.u16(field.field_type));
                out.extend_from_slice(&self.u32(field.count));
                if field.data.len() <= 4 {
                    let mut inline = field.data.clone();
                    inline.resize(4, 0);
                    out.extend_from_slice(&inline);
                } else {
                    out.extend_from_slice(&self.u32(cursor as u32));
                    data_area.extend_from_slice(&field.data);
                    if field.data.len() % 2 == 1 {
                        data_area.push(0);
                    }
                    cursor += padded(field.data.len());
                }
            }

            let next = if *dir == Dir::Ifd0 { ifd1_at } else { 0 };
            out.extend_from_slice(&self.u32(next));
            out.extend_from_slice(&data_area);
        }
        out
    }

    pub fn jpeg(&self) -> Vec<u8> {
        wrap_tiff(&self.tiff())
    }
}

/// Big-endian JPEG with a GPS position and, optionally, an IFD0 `DateTime`.
pub fn geotagged_jpeg(latitude: f64, longitude: f64, taken_at: Option<&str>) -> Vec<u8> {
    let builder = ExifBuilder::new(ByteOrder::BigEndian).location(latitude, longitude);
    match taken_at {
        Some(text) => builder.ascii(tags::DATE_TIME, text).jpeg(),
        None => builder.jpeg(),
    }
}

fn padded(len: usize) -> usize {
    len + len % 2
}

fn directory_size(fields: &[Field]) -> usize {
    let external: usize = fields
        .iter()
        .filter(|f| f.data.len() > 4)
        .map(|f| padded(f.data.len()))
        .sum();
    2 + fields.len() * ENTRY_SIZE + 4 + external
}

/// Split decimal degrees into whole degrees, whole minutes and micro-second
/// precision seconds. Seconds are rounded down so the encoded magnitude
/// never exceeds the input.
fn to_dms(value: f64) -> [(u32, u32); 3] {
    let magnitude = value.abs();
    let degrees = magnitude.trunc();
    let minutes_total = (magnitude - degrees) * 60.0;
    let minutes = minutes_total.trunc();
    let seconds = (minutes_total - minutes) * 60.0;
    [
        (degrees as u32, 1),
        (minutes as u32, 1),
        ((seconds * 1_000_000.0).floor() as u32, 1_000_000),
    ]
}
