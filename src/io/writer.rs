/// Raw disk image writer

use crate::align::align_sectors;
use crate::error::{Result, WdiError};
use crate::format::constants::sector_size_to_sdh;
use crate::image::TrackRecord;
use std::io::Write;

/// Expected track geometry used to align the raw image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    sectors_per_track: u8,
    sector_size: usize,
}

impl Geometry {
    /// Highest sectors per track accepted for alignment
    pub const MAX_SECTORS_PER_TRACK: u8 = 63;

    /// Create a geometry, validating both values
    pub fn new(sectors_per_track: u8, sector_size: usize) -> Result<Self> {
        if sectors_per_track == 0 || sectors_per_track > Self::MAX_SECTORS_PER_TRACK {
            return Err(WdiError::geometry(format!(
                "sectors per track must be 1-{}, got {}",
                Self::MAX_SECTORS_PER_TRACK,
                sectors_per_track
            )));
        }
        if sector_size_to_sdh(sector_size).is_none() {
            return Err(WdiError::geometry(format!(
                "sector size must be 128, 256, 512 or 1024 bytes, got {}",
                sector_size
            )));
        }
        Ok(Self {
            sectors_per_track,
            sector_size,
        })
    }

    /// Expected sectors per track
    pub fn sectors_per_track(&self) -> u8 {
        self.sectors_per_track
    }

    /// Expected sector size in bytes
    pub fn sector_size(&self) -> usize {
        self.sector_size
    }

    /// Bytes in one full track
    pub fn track_size(&self) -> usize {
        self.sectors_per_track as usize * self.sector_size
    }
}

/// Order in which a track's sectors are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectorOrder {
    /// Physical order as read off the track
    #[default]
    Capture,
    /// Ascending logical sector number (1:1 interleave)
    Normalized,
}

/// Appends decoded tracks to an optional raw image sink
///
/// Without a sink every write is a no-op.
#[derive(Debug)]
pub struct ImageWriter<W: Write> {
    sink: Option<W>,
    order: SectorOrder,
    alignment: Option<Geometry>,
    fill_byte: u8,
    bytes_written: u64,
}

impl<W: Write> ImageWriter<W> {
    /// Create a writer in capture order without alignment
    pub fn new(sink: Option<W>) -> Self {
        Self {
            sink,
            order: SectorOrder::Capture,
            alignment: None,
            fill_byte: 0,
            bytes_written: 0,
        }
    }

    /// Set the sector order
    pub fn with_order(mut self, order: SectorOrder) -> Self {
        self.order = order;
        self
    }

    /// Align missing sectors and unreadable tracks to `geometry`
    ///
    /// Alignment implies normalized order.
    pub fn with_alignment(mut self, geometry: Option<Geometry>) -> Self {
        self.alignment = geometry;
        if geometry.is_some() {
            self.order = SectorOrder::Normalized;
        }
        self
    }

    /// Set the byte used for fill blocks
    pub fn with_fill_byte(mut self, fill_byte: u8) -> Self {
        self.fill_byte = fill_byte;
        self
    }

    /// Check whether output was requested
    pub fn is_active(&self) -> bool {
        self.sink.is_some()
    }

    /// Sector order in effect
    pub fn order(&self) -> SectorOrder {
        self.order
    }

    /// Total bytes appended so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Append one decoded track
    pub fn write_track(&mut self, track: &TrackRecord) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }

        if track.is_unreadable() {
            return self.write_unreadable_track();
        }

        match self.order {
            SectorOrder::Capture => {
                for sector in track.sectors() {
                    self.emit(sector.data())?;
                }
                Ok(())
            }
            SectorOrder::Normalized => self.write_normalized(track),
        }
    }

    fn write_unreadable_track(&mut self) -> Result<()> {
        match self.alignment {
            Some(geometry) => self.emit_fill(geometry.track_size()),
            None => Ok(()),
        }
    }

    fn write_normalized(&mut self, track: &TrackRecord) -> Result<()> {
        let mut numbers = track.logical_sectors();
        numbers.sort_unstable();

        let targets: Vec<u16> = match self.alignment {
            Some(geometry) => {
                let mut unique = numbers.clone();
                unique.dedup();
                let budget = unique.len().abs_diff(geometry.sectors_per_track as usize);
                align_sectors(&unique, budget)
            }
            None => numbers.iter().map(|&n| u16::from(n)).collect(),
        };

        for number in targets {
            let sector = u8::try_from(number)
                .ok()
                .and_then(|n| track.get_sector(n));

            match (sector, self.alignment) {
                (Some(sector), _) => self.emit(sector.data())?,
                (None, Some(geometry)) => self.emit_fill(geometry.sector_size())?,
                // Nothing defined for a missing sector without alignment
                (None, None) => {}
            }
        }

        Ok(())
    }

    fn emit_fill(&mut self, len: usize) -> Result<()> {
        let block = vec![self.fill_byte; len];
        self.emit(&block)
    }

    fn emit(&mut self, data: &[u8]) -> Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            sink.write_all(data).map_err(WdiError::Write)?;
            self.bytes_written += data.len() as u64;
        }
        Ok(())
    }

    /// Flush the sink
    pub fn flush(&mut self) -> Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            sink.flush().map_err(WdiError::Write)?;
        }
        Ok(())
    }

    /// Consume the writer, returning the sink
    pub fn into_inner(self) -> Option<W> {
        self.sink
    }
}
