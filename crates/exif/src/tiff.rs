//! TIFF header and directory-chain walking.
//!
//! Decoded fields accumulate in a record under construction. Each stage
//! (header, directory, sub-directory, entry) returns a `Result`; a fault ends
//! that stage only and is kept in the report, so fields decoded earlier
//! survive.

use crate::datetime::parse_exif_datetime;
use crate::gps::parse_gps_directory;
use crate::ifd::{self, tags, Entry};
use crate::reader::{ByteOrder, TiffReader};
use crate::{ExifError, ExtractReport, MetadataRecord, Result};

/// TIFF version sentinel.
const TIFF_VERSION: u16 = 42;

/// Upper bound on IFD0 -> IFD1 -> ... chain length.
const MAX_CHAIN_LEN: usize = 16;

/// Upper bound on Exif sub-directory nesting below a chain directory.
const MAX_SUB_IFD_DEPTH: usize = 4;

/// Decode a TIFF block (the bytes after `Exif\0\0`).
pub(crate) fn parse_tiff(block: &[u8]) -> ExtractReport {
    match read_header(block) {
        Ok((reader, first_ifd)) => {
            let mut walker = Walker::new(reader);
            walker.walk_chain(first_ifd);
            walker.finish()
        }
        Err(fault) => {
            tracing::debug!(%fault, "unreadable TIFF header");
            ExtractReport {
                record: MetadataRecord::default(),
                faults: vec![fault],
            }
        }
    }
}

fn read_header(block: &[u8]) -> Result<(TiffReader<'_>, usize)> {
    let marker = block.get(..2).ok_or(ExifError::Truncated {
        offset: 0,
        len: 2,
        size: block.len(),
    })?;
    let order = ByteOrder::from_marker([marker[0], marker[1]])?;
    let reader = TiffReader::new(block, order);

    let version = reader.u16(2)?;
    if version != TIFF_VERSION {
        return Err(ExifError::InvalidVersion(version));
    }
    let first_ifd = reader.u32(4)? as usize;
    Ok((reader, first_ifd))
}

struct Walker<'a> {
    reader: TiffReader<'a>,
    record: MetadataRecord,
    make: Option<String>,
    model: Option<String>,
    faults: Vec<ExifError>,
    visited: Vec<usize>,
    depth: usize,
}

impl<'a> Walker<'a> {
    fn new(reader: TiffReader<'a>) -> Self {
        Self {
            reader,
            record: MetadataRecord::default(),
            make: None,
            model: None,
            faults: Vec::new(),
            visited: Vec::new(),
            depth: 0,
        }
    }

    fn fault(&mut self, fault: ExifError) {
        tracing::debug!(%fault, "EXIF parsing stage aborted");
        self.faults.push(fault);
    }

    /// Mark a directory offset as visited; false if it was seen before.
    fn enter(&mut self, offset: usize) -> bool {
        if self.visited.contains(&offset) {
            return false;
        }
        self.visited.push(offset);
        true
    }

    fn walk_chain(&mut self, first: usize) {
        let mut next = first;
        let mut walked = 0;

        while next != 0 {
            if walked == MAX_CHAIN_LEN || !self.enter(next) {
                self.fault(ExifError::DirectoryLoop(next));
                return;
            }
            walked += 1;

            if let Err(fault) = self.parse_directory(next) {
                self.fault(fault);
                return;
            }
            match ifd::next_pointer_offset(&self.reader, next).and_then(|at| self.reader.u32(at)) {
                Ok(offset) => next = offset as usize,
                Err(fault) => {
                    self.fault(fault);
                    return;
                }
            }
        }
    }

    /// Visit every entry of one directory. A fault reading an entry ends the
    /// directory; faults decoding a single value are recorded and skipped.
    fn parse_directory(&mut self, offset: usize) -> Result<()> {
        tracing::trace!(offset, "parsing directory");
        let reader = self.reader;
        for entry_offset in ifd::entry_offsets(&reader, offset)? {
            let entry = Entry::read(&reader, entry_offset)?;
            if let Err(fault) = self.visit(&entry) {
                self.fault(fault);
            }
        }
        Ok(())
    }

    fn visit(&mut self, entry: &Entry) -> Result<()> {
        match entry.tag {
            tags::GPS_IFD if self.record.location.is_none() => {
                let offset = entry.sub_directory()?;
                if !self.enter(offset) {
                    return Err(ExifError::DirectoryLoop(offset));
                }
                self.record.location = parse_gps_directory(&self.reader, offset, &mut self.faults)?;
            }
            tags::EXIF_IFD => {
                let offset = entry.sub_directory()?;
                if self.depth == MAX_SUB_IFD_DEPTH {
                    return Err(ExifError::NestingTooDeep(offset));
                }
                if !self.enter(offset) {
                    return Err(ExifError::DirectoryLoop(offset));
                }
                self.depth += 1;
                let parsed = self.parse_directory(offset);
                self.depth -= 1;
                parsed?;
            }
            tags::DATE_TIME | tags::DATE_TIME_ORIGINAL | tags::DATE_TIME_DIGITIZED
                if self.record.timestamp.is_none() =>
            {
                let text = entry.ascii(&self.reader)?;
                let parsed = parse_exif_datetime(text)
                    .ok_or_else(|| ExifError::InvalidDateTime(text.to_string()))?;
                self.record.timestamp = Some(parsed);
            }
            tags::MAKE if self.make.is_none() => {
                self.make = non_empty(entry.ascii(&self.reader)?);
            }
            tags::MODEL if self.model.is_none() => {
                self.model = non_empty(entry.ascii(&self.reader)?);
            }
            tags::ORIENTATION if self.record.orientation.is_none() => {
                let value = entry.short(&self.reader)?;
                if (1..=8).contains(&value) {
                    self.record.orientation = Some(value);
                } else {
                    return Err(entry.unexpected());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(mut self) -> ExtractReport {
        self.record.camera = match (self.make, self.model) {
            (Some(make), Some(model)) if model.starts_with(&make) => Some(model),
            (Some(make), Some(model)) => Some(format!("{make} {model}")),
            (Some(make), None) => Some(make),
            (None, Some(model)) => Some(model),
            (None, None) => None,
        };
        ExtractReport {
            record: self.record,
            faults: self.faults,
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
