//! Bounds-checked integer reads over a TIFF block.

use crate::{ExifError, Result};

/// Byte order declared by the TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `II`, Intel order
    LittleEndian,
    /// `MM`, Motorola order
    BigEndian,
}

impl ByteOrder {
    /// Interpret the 2-byte marker that opens a TIFF header.
    pub(crate) fn from_marker(marker: [u8; 2]) -> Result<Self> {
        match &marker {
            b"II" => Ok(ByteOrder::LittleEndian),
            b"MM" => Ok(ByteOrder::BigEndian),
            _ => Err(ExifError::InvalidByteOrder(u16::from_be_bytes(marker))),
        }
    }

    #[inline]
    pub(crate) fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub(crate) fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
        }
    }
}

/// View over the bytes of one TIFF block. All offsets are relative to the
/// start of the TIFF header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TiffReader<'a> {
    data: &'a [u8],
    order: ByteOrder,
}

impl<'a> TiffReader<'a> {
    pub(crate) fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self { data, order }
    }

    /// Borrow `len` bytes at `offset`.
    pub(crate) fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .map(|end| &self.data[offset..end])
            .ok_or(ExifError::Truncated {
                offset,
                len,
                size: self.data.len(),
            })
    }

    pub(crate) fn u16(&self, offset: usize) -> Result<u16> {
        let b = self.bytes(offset, 2)?;
        Ok(self.order.u16_from([b[0], b[1]]))
    }

    pub(crate) fn u32(&self, offset: usize) -> Result<u32> {
        let b = self.bytes(offset, 4)?;
        Ok(self.order.u32_from([b[0], b[1], b[2], b[3]]))
    }

    /// Read an unsigned RATIONAL (two `u32`s) as a float.
    pub(crate) fn rational(&self, offset: usize) -> Result<f64> {
        let numerator = self.u32(offset)?;
        let denominator = self.u32(offset.saturating_add(4))?;
        if denominator == 0 {
            return Err(ExifError::ZeroDenominator(offset));
        }
        Ok(f64::from(numerator) / f64::from(denominator))
    }
}
