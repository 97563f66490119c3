/// Sector data structures

use crate::format::constants::*;
use std::fmt;

/// Sector ID entry - addressing information for a sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorId {
    /// Logical cylinder number
    pub cylinder: u16,
    /// Logical sector number
    pub sector: u8,
    /// SDH byte (size, drive, head)
    pub sdh: u8,
}

impl SectorId {
    /// Create a new sector ID
    pub fn new(cylinder: u16, sector: u8, sdh: u8) -> Self {
        Self {
            cylinder,
            sector,
            sdh,
        }
    }

    /// Get the sector size in bytes based on the SDH size bits
    pub fn size_bytes(&self) -> usize {
        sdh_to_sector_size(self.sdh)
    }
}

/// Outcome recorded for a sector at capture time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorOutcome {
    /// Sector carried a bad block flag, no data stored
    BadBlock,
    /// Sector read without error
    Good,
    /// Sector read with a CRC/ECC data error, data stored as read
    DataError,
}

impl fmt::Display for SectorOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectorOutcome::BadBlock => write!(f, "Bad block"),
            SectorOutcome::Good => write!(f, "OK"),
            SectorOutcome::DataError => write!(f, "CRC/ECC data error"),
        }
    }
}

/// Sector data type byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataType {
    /// Sector outcome
    pub outcome: SectorOutcome,
    /// Payload stored as a single repeated byte
    pub compressed: bool,
}

impl DataType {
    /// Decode a data type byte, `None` if the outcome bits are out of range
    pub fn from_byte(value: u8) -> Option<Self> {
        let outcome = match value & DATA_TYPE_MASK {
            0 => SectorOutcome::BadBlock,
            1 => SectorOutcome::Good,
            2 => SectorOutcome::DataError,
            _ => return None,
        };
        Some(Self {
            outcome,
            compressed: value & DATA_COMPRESSED_FLAG != 0,
        })
    }

    /// Encode as a data type byte
    pub fn to_byte(&self) -> u8 {
        let base = match self.outcome {
            SectorOutcome::BadBlock => 0,
            SectorOutcome::Good => 1,
            SectorOutcome::DataError => 2,
        };
        if self.compressed {
            base | DATA_COMPRESSED_FLAG
        } else {
            base
        }
    }

    /// Check whether payload bytes follow the data type byte
    pub fn has_payload(&self) -> bool {
        self.outcome != SectorOutcome::BadBlock
    }
}

/// A decoded sector ready for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSector {
    /// Sector addressing information
    pub id: SectorId,
    /// Data type the sector was stored with
    pub data_type: DataType,
    /// Sector payload, always `id.size_bytes()` long
    data: Vec<u8>,
}

impl ResolvedSector {
    /// Create a resolved sector
    pub fn new(id: SectorId, data_type: DataType, data: Vec<u8>) -> Self {
        Self {
            id,
            data_type,
            data,
        }
    }

    /// Logical sector number
    pub fn number(&self) -> u8 {
        self.id.sector
    }

    /// Sector outcome
    pub fn outcome(&self) -> SectorOutcome {
        self.data_type.outcome
    }

    /// Get a reference to the sector data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the sector, returning its data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
