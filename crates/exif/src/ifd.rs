//! Image file directory (IFD) entries.
//!
//! A directory is a 2-byte entry count, `count` fixed 12-byte entries and a
//! 4-byte offset of the next directory (0 ends the chain).

use crate::reader::TiffReader;
use crate::{ExifError, Result};

/// Size of one directory entry in bytes.
pub(crate) const ENTRY_SIZE: usize = 12;

/// Tags the extractor understands.
pub(crate) mod tags {
    pub const MAKE: u16 = 0x010F;
    pub const MODEL: u16 = 0x0110;
    pub const ORIENTATION: u16 = 0x0112;
    pub const DATE_TIME: u16 = 0x0132;
    pub const EXIF_IFD: u16 = 0x8769;
    pub const GPS_IFD: u16 = 0x8825;
    pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
    pub const DATE_TIME_DIGITIZED: u16 = 0x9004;

    pub const GPS_LATITUDE_REF: u16 = 0x0001;
    pub const GPS_LATITUDE: u16 = 0x0002;
    pub const GPS_LONGITUDE_REF: u16 = 0x0003;
    pub const GPS_LONGITUDE: u16 = 0x0004;
}

/// TIFF field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldType {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SByte,
    Undefined,
    SShort,
    SLong,
    SRational,
    Float,
    Double,
    /// IFD offset type used by some writers for sub-directory pointers
    Ifd,
    Unknown(u16),
}

impl FieldType {
    pub(crate) fn from_code(code: u16) -> Self {
        match code {
            1 => FieldType::Byte,
            2 => FieldType::Ascii,
            3 => FieldType::Short,
            4 => FieldType::Long,
            5 => FieldType::Rational,
            6 => FieldType::SByte,
            7 => FieldType::Undefined,
            8 => FieldType::SShort,
            9 => FieldType::SLong,
            10 => FieldType::SRational,
            11 => FieldType::Float,
            12 => FieldType::Double,
            13 => FieldType::Ifd,
            other => FieldType::Unknown(other),
        }
    }

    pub(crate) fn code(self) -> u16 {
        match self {
            FieldType::Byte => 1,
            FieldType::Ascii => 2,
            FieldType::Short => 3,
            FieldType::Long => 4,
            FieldType::Rational => 5,
            FieldType::SByte => 6,
            FieldType::Undefined => 7,
            FieldType::SShort => 8,
            FieldType::SLong => 9,
            FieldType::SRational => 10,
            FieldType::Float => 11,
            FieldType::Double => 12,
            FieldType::Ifd => 13,
            FieldType::Unknown(code) => code,
        }
    }

    /// Size in bytes of one value of this type, if the type is known.
    pub(crate) fn size(self) -> Option<usize> {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => Some(1),
            FieldType::Short | FieldType::SShort => Some(2),
            FieldType::Long | FieldType::SLong | FieldType::Float | FieldType::Ifd => Some(4),
            FieldType::Rational | FieldType::SRational | FieldType::Double => Some(8),
            FieldType::Unknown(_) => None,
        }
    }
}

/// One decoded 12-byte directory entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub tag: u16,
    pub field_type: FieldType,
    pub count: u32,
    /// Offset of the entry's trailing 4-byte value/offset field
    value_field: usize,
    /// The trailing field read as a `u32`
    raw_value: u32,
}

impl Entry {
    pub(crate) fn read(reader: &TiffReader<'_>, offset: usize) -> Result<Self> {
        // Bounds-check the whole entry up front so a short tail is one fault.
        reader.bytes(offset, ENTRY_SIZE)?;
        Ok(Self {
            tag: reader.u16(offset)?,
            field_type: FieldType::from_code(reader.u16(offset + 2)?),
            count: reader.u32(offset + 4)?,
            value_field: offset + 8,
            raw_value: reader.u32(offset + 8)?,
        })
    }

    pub(crate) fn unexpected(&self) -> ExifError {
        ExifError::UnexpectedField {
            tag: self.tag,
            field_type: self.field_type.code(),
            count: self.count,
        }
    }

    /// Total size of the value in bytes.
    pub(crate) fn value_len(&self) -> Result<usize> {
        self.field_type
            .size()
            .and_then(|size| size.checked_mul(self.count as usize))
            .ok_or_else(|| self.unexpected())
    }

    /// Offset of the value bytes: inline when they fit in 4 bytes, otherwise
    /// the stored offset.
    pub(crate) fn value_offset(&self) -> Result<usize> {
        if self.value_len()? <= 4 {
            Ok(self.value_field)
        } else {
            Ok(self.raw_value as usize)
        }
    }

    pub(crate) fn value_bytes<'a>(&self, reader: &TiffReader<'a>) -> Result<&'a [u8]> {
        reader.bytes(self.value_offset()?, self.value_len()?)
    }

    /// Offset of the sub-directory this pointer entry refers to.
    pub(crate) fn sub_directory(&self) -> Result<usize> {
        match self.field_type {
            FieldType::Long | FieldType::Ifd if self.count == 1 => Ok(self.raw_value as usize),
            _ => Err(self.unexpected()),
        }
    }

    /// Decode an ASCII value up to its first NUL.
    pub(crate) fn ascii<'a>(&self, reader: &TiffReader<'a>) -> Result<&'a str> {
        if self.field_type != FieldType::Ascii {
            return Err(self.unexpected());
        }
        let bytes = self.value_bytes(reader)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        std::str::from_utf8(&bytes[..end]).map_err(|_| ExifError::InvalidText(self.tag))
    }

    /// Decode a single SHORT value.
    pub(crate) fn short(&self, reader: &TiffReader<'_>) -> Result<u16> {
        if self.field_type != FieldType::Short || self.count != 1 {
            return Err(self.unexpected());
        }
        reader.u16(self.value_field)
    }
}

/// Read the entry count of the directory at `offset` and the offsets of
/// each of its entries.
pub(crate) fn entry_offsets(
    reader: &TiffReader<'_>,
    offset: usize,
) -> Result<impl Iterator<Item = usize> + use<>> {
    let count = reader.u16(offset)? as usize;
    let first = offset.saturating_add(2);
    Ok((0..count).map(move |i| first.saturating_add(i * ENTRY_SIZE)))
}

/// Offset of the next-directory field of the directory at `offset`.
pub(crate) fn next_pointer_offset(reader: &TiffReader<'_>, offset: usize) -> Result<usize> {
    let count = reader.u16(offset)? as usize;
    Ok(offset.saturating_add(2 + count * ENTRY_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ByteOrder;

    fn entry_bytes(tag: u16, field_type: u16, count: u32, value: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&tag.to_be_bytes());
        bytes.extend_from_slice(&field_type.to_be_bytes());
        bytes.extend_from_slice(&count.to_be_bytes());
        bytes.extend_from_slice(&value);
        bytes
    }

    #[test]
    fn test_inline_ascii() {
        let data = entry_bytes(tags::GPS_LATITUDE_REF, 2, 2, *b"N\0\0\0");
        let reader = TiffReader::new(&data, ByteOrder::BigEndian);
        let entry = Entry::read(&reader, 0).unwrap();

        assert_eq!(entry.value_offset().unwrap(), 8);
        assert_eq!(entry.ascii(&reader).unwrap(), "N");
    }

    #[test]
    fn test_out_of_line_value() {
        let mut data = entry_bytes(tags::MAKE, 2, 6, [0, 0, 0, 12]);
        data.extend_from_slice(b"Canon\0");
        let reader = TiffReader::new(&data, ByteOrder::BigEndian);
        let entry = Entry::read(&reader, 0).unwrap();

        assert_eq!(entry.value_offset().unwrap(), 12);
        assert_eq!(entry.ascii(&reader).unwrap(), "Canon");
    }

    #[test]
    fn test_out_of_line_value_past_end() {
        let data = entry_bytes(tags::MAKE, 2, 6, [0, 0, 0, 200]);
        let reader = TiffReader::new(&data, ByteOrder::BigEndian);
        let entry = Entry::read(&reader, 0).unwrap();

        assert!(matches!(entry.ascii(&reader), Err(ExifError::Truncated { .. })));
    }

    #[test]
    fn test_short_entry_is_truncated() {
        let data = entry_bytes(tags::MAKE, 2, 6, [0, 0, 0, 12]);
        let reader = TiffReader::new(&data[..10], ByteOrder::BigEndian);

        assert!(matches!(Entry::read(&reader, 0), Err(ExifError::Truncated { .. })));
    }

    #[test]
    fn test_unknown_type_has_no_value() {
        let data = entry_bytes(tags::MAKE, 99, 1, [0; 4]);
        let reader = TiffReader::new(&data, ByteOrder::BigEndian);
        let entry = Entry::read(&reader, 0).unwrap();

        assert_eq!(
            entry.value_offset(),
            Err(ExifError::UnexpectedField { tag: tags::MAKE, field_type: 99, count: 1 })
        );
    }

    #[test]
    fn test_short_value_little_endian() {
        let mut data = Vec::new();
        data.extend_from_slice(&tags::ORIENTATION.to_le_bytes());
        data.extend_from_slice(&3u16.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&[6, 0, 0, 0]);
        let reader = TiffReader::new(&data, ByteOrder::LittleEndian);
        let entry = Entry::read(&reader, 0).unwrap();

        assert_eq!(entry.tag, tags::ORIENTATION);
        assert_eq!(entry.short(&reader).unwrap(), 6);
    }

    #[test]
    fn test_entry_offsets() {
        let mut data = vec![0, 2];
        data.extend(entry_bytes(1, 2, 1, [0; 4]));
        data.extend(entry_bytes(2, 2, 1, [0; 4]));
        data.extend_from_slice(&[0, 0, 0, 0]);
        let reader = TiffReader::new(&data, ByteOrder::BigEndian);

        let offsets: Vec<_> = entry_offsets(&reader, 0).unwrap().collect();
        assert_eq!(offsets, vec![2, 14]);
        assert_eq!(next_pointer_offset(&reader, 0).unwrap(), 26);
    }
}
