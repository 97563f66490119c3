/// Builder for creating WDI containers

use crate::error::{Result, WdiError};
use crate::format::constants::*;
use crate::format::DriveParameters;
use crate::image::sector::{DataType, SectorId, SectorOutcome};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One sector to encode: ID entry plus data entry
#[derive(Debug, Clone)]
pub struct SectorSpec {
    /// Sector ID entry
    pub id: SectorId,
    /// Raw data type byte
    pub data_type: u8,
    /// Bytes stored after the data type byte
    pub payload: Vec<u8>,
}

impl SectorSpec {
    fn with_type(sector: u8, sdh: u8, outcome: SectorOutcome, compressed: bool, payload: Vec<u8>) -> Self {
        Self {
            id: SectorId::new(0, sector, sdh),
            data_type: DataType { outcome, compressed }.to_byte(),
            payload,
        }
    }

    /// A sector read without error
    pub fn good(sector: u8, sdh: u8, data: Vec<u8>) -> Self {
        Self::with_type(sector, sdh, SectorOutcome::Good, false, data)
    }

    /// A sector read with a CRC/ECC error
    pub fn data_error(sector: u8, sdh: u8, data: Vec<u8>) -> Self {
        Self::with_type(sector, sdh, SectorOutcome::DataError, false, data)
    }

    /// A sector filled with a single byte value
    pub fn compressed(sector: u8, sdh: u8, value: u8) -> Self {
        Self::with_type(sector, sdh, SectorOutcome::Good, true, vec![value])
    }

    /// A sector flagged as a bad block
    pub fn bad_block(sector: u8, sdh: u8) -> Self {
        Self::with_type(sector, sdh, SectorOutcome::BadBlock, false, Vec::new())
    }

    /// Set the logical cylinder in the ID entry
    pub fn with_cylinder(mut self, cylinder: u16) -> Self {
        self.id.cylinder = cylinder;
        self
    }
}

/// One track record to encode
///
/// Cylinder and head are written as given so malformed records can be built.
#[derive(Debug, Clone)]
pub struct TrackSpec {
    /// Physical cylinder
    pub cylinder: u16,
    /// Physical head
    pub head: u8,
    /// Sectors in physical order
    pub sectors: Vec<SectorSpec>,
}

impl TrackSpec {
    /// Create a track with no sectors, encoded as unreadable
    pub fn new(cylinder: u16, head: u8) -> Self {
        Self {
            cylinder,
            head,
            sectors: Vec::new(),
        }
    }

    /// Append a sector, taking the logical cylinder from the track
    pub fn sector(mut self, sector: SectorSpec) -> Self {
        self.sectors.push(sector.with_cylinder(self.cylinder));
        self
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        let count = u8::try_from(self.sectors.len()).map_err(|_| {
            WdiError::geometry(format!(
                "track {}/{} has {} sectors",
                self.cylinder,
                self.head,
                self.sectors.len()
            ))
        })?;

        out.extend_from_slice(&self.cylinder.to_le_bytes());
        out.push(self.head);
        out.push(count);

        for sector in &self.sectors {
            out.extend_from_slice(&sector.id.cylinder.to_le_bytes());
            out.push(sector.id.sector);
            out.push(sector.id.sdh);
        }
        for sector in &self.sectors {
            out.push(sector.data_type);
            out.extend_from_slice(&sector.payload);
        }
        Ok(())
    }
}

/// Builder for constructing WDI containers
#[derive(Debug, Clone)]
pub struct WdiBuilder {
    description: String,
    params: DriveParameters,
    tracks: Vec<TrackSpec>,
    terminator: bool,
}

impl WdiBuilder {
    /// Create a new builder with default drive parameters
    pub fn new() -> Self {
        Self {
            description: String::new(),
            params: DriveParameters::default(),
            tracks: Vec::new(),
            terminator: false,
        }
    }

    /// Set the description text
    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Set the drive parameters
    pub fn params(mut self, params: DriveParameters) -> Self {
        self.params = params;
        self
    }

    /// Append a track record
    pub fn track(mut self, track: TrackSpec) -> Self {
        self.tracks.push(track);
        self
    }

    /// End track data with an end-of-file marker
    pub fn terminator(mut self, terminator: bool) -> Self {
        self.terminator = terminator;
        self
    }

    /// Encode the container
    pub fn build(&self) -> Result<Vec<u8>> {
        if !self.description.is_ascii() || self.description.bytes().any(|b| b == ASCII_EOF) {
            return Err(WdiError::header(
                "description must be ASCII text without end-of-file markers",
            ));
        }

        let mut out = Vec::with_capacity(HEADER_PREFIX_SIZE + DRIVE_PARAMS_SIZE + 1);

        let mut prefix = [b' '; HEADER_PREFIX_SIZE];
        prefix[..WDI_SIGNATURE.len()].copy_from_slice(WDI_SIGNATURE);
        let banner_end = WDI_SIGNATURE.len() + CREATOR_BANNER.len();
        prefix[WDI_SIGNATURE.len()..banner_end].copy_from_slice(CREATOR_BANNER);
        prefix[HEADER_PREFIX_SIZE - 2..].copy_from_slice(b"\r\n");
        out.extend_from_slice(&prefix);

        out.extend_from_slice(self.description.as_bytes());
        out.push(ASCII_EOF);
        out.extend_from_slice(&self.params.to_bytes());

        for track in &self.tracks {
            track.encode(&mut out)?;
        }

        if self.terminator {
            out.extend_from_slice(&[ASCII_EOF, ASCII_EOF]);
        }

        Ok(out)
    }

    /// Encode the container and write it to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = self.build()?;
        let mut file = File::create(path)?;
        file.write_all(&data)?;
        Ok(())
    }
}

impl Default for WdiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
