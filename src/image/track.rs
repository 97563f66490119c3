/// Track data structures

use crate::image::sector::{ResolvedSector, SectorId};
use crate::interleave::{detect_interleave, Interleave};
use std::collections::HashMap;

/// One physical track as captured
#[derive(Debug, Clone)]
pub struct TrackRecord {
    /// Physical cylinder number
    pub cylinder: u16,
    /// Physical head number
    pub head: u8,
    /// Sectors in physical capture order
    sectors: Vec<ResolvedSector>,
    /// Map from logical sector number to the first captured sector with it
    sector_map: HashMap<u8, usize>,
}

impl TrackRecord {
    /// Create a new track with no sectors
    pub fn new(cylinder: u16, head: u8) -> Self {
        Self {
            cylinder,
            head,
            sectors: Vec::new(),
            sector_map: HashMap::new(),
        }
    }

    /// Add the next sector in capture order
    pub fn add_sector(&mut self, sector: ResolvedSector) {
        let index = self.sectors.len();
        self.sector_map.entry(sector.number()).or_insert(index);
        self.sectors.push(sector);
    }

    /// Get a reference to all sectors in capture order
    pub fn sectors(&self) -> &[ResolvedSector] {
        &self.sectors
    }

    /// Get a sector by its logical number
    ///
    /// Duplicated numbers resolve to the first one captured.
    pub fn get_sector(&self, sector: u8) -> Option<&ResolvedSector> {
        self.sector_map
            .get(&sector)
            .and_then(|&idx| self.sectors.get(idx))
    }

    /// Get the number of sectors in this track
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Check if no sector ID could be read from this track
    pub fn is_unreadable(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Sector IDs in capture order
    pub fn sector_ids(&self) -> Vec<SectorId> {
        self.sectors.iter().map(|s| s.id).collect()
    }

    /// Logical sector numbers in capture order (the interleave table)
    pub fn logical_sectors(&self) -> Vec<u8> {
        self.sectors.iter().map(|s| s.number()).collect()
    }

    /// Interleave derived from the capture order
    pub fn interleave(&self) -> Option<Interleave> {
        detect_interleave(&self.logical_sectors())
    }

    /// Get the total data size of all sectors in bytes
    pub fn total_data_size(&self) -> usize {
        self.sectors.iter().map(|s| s.data().len()).sum()
    }
}
