/// WDI track record decoder

use crate::error::{Result, WdiError};
use crate::format::constants::*;
use crate::image::{DataType, ResolvedSector, SectorId, SectorOutcome, TrackRecord};
use crate::io::cursor::ByteCursor;

/// Outcome counters accumulated over one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    /// Sectors stored with a bad block flag
    pub bad_blocks: usize,
    /// Tracks where no sector ID could be read
    pub unreadable_tracks: usize,
    /// Sectors stored with a CRC/ECC data error
    pub data_errors: usize,
    /// Track records decoded, unreadable ones included
    pub tracks: usize,
}

/// Sequential decoder for the track records following the header
///
/// Each call to [`TrackDecoder::next_track`] consumes one track record.
/// Decoding ends at a clean end of stream or at the end-of-file marker in
/// place of a cylinder number.
#[derive(Debug)]
pub struct TrackDecoder<'a> {
    cursor: ByteCursor<'a>,
    fill_byte: u8,
    summary: ParseSummary,
    finished: bool,
}

impl<'a> TrackDecoder<'a> {
    /// Create a decoder for track data starting at `offset`
    ///
    /// Bad block sectors are resolved to `fill_byte`.
    pub fn new(data: &'a [u8], offset: usize, fill_byte: u8) -> Self {
        Self {
            cursor: ByteCursor::at(data, offset),
            fill_byte,
            summary: ParseSummary::default(),
            finished: false,
        }
    }

    /// Current byte offset in the stream
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    /// Counters accumulated so far
    pub fn summary(&self) -> &ParseSummary {
        &self.summary
    }

    /// Consume the decoder, returning its counters
    pub fn into_summary(self) -> ParseSummary {
        self.summary
    }

    /// Decode the next track record, `None` once the track data has ended
    pub fn next_track(&mut self) -> Result<Option<TrackRecord>> {
        if self.finished {
            return Ok(None);
        }

        let Some(cylinder) = self.read_cylinder()? else {
            self.finished = true;
            return Ok(None);
        };

        let head_offset = self.cursor.offset();
        let head = self.cursor.expect_u8("physical head byte")?;
        if head > MAX_PHYSICAL_HEAD {
            return Err(WdiError::out_of_range(
                head_offset,
                "physical head",
                head.into(),
                MAX_PHYSICAL_HEAD.into(),
            ));
        }

        let spt_offset = self.cursor.offset();
        let spt = self.cursor.expect_u8("sectors per track")?;
        if spt > MAX_SECTORS_PER_TRACK {
            return Err(WdiError::out_of_range(
                spt_offset,
                "sectors per track",
                spt.into(),
                MAX_SECTORS_PER_TRACK.into(),
            ));
        }

        self.summary.tracks += 1;
        let mut track = TrackRecord::new(cylinder, head);

        if spt == 0 {
            log::trace!("next_track: C{} H{} unreadable", cylinder, head);
            self.summary.unreadable_tracks += 1;
            return Ok(Some(track));
        }

        let mut ids = Vec::with_capacity(spt as usize);
        for _ in 0..spt {
            let logical_cylinder = self.cursor.expect_u16_le("logical cylinder")?;
            let sector = self.cursor.expect_u8("logical sector byte")?;
            let sdh = self.cursor.expect_u8("SDH byte")?;
            ids.push(SectorId::new(logical_cylinder, sector, sdh));
        }

        for id in ids {
            let sector = self.read_sector_data(id)?;
            track.add_sector(sector);
        }

        log::trace!(
            "next_track: C{} H{} {} sectors, next record at {:#x}",
            cylinder,
            head,
            spt,
            self.cursor.offset()
        );
        Ok(Some(track))
    }

    /// Read the physical cylinder, `None` at the end of track data
    fn read_cylinder(&mut self) -> Result<Option<u16>> {
        let offset = self.cursor.offset();

        let Some(lsb) = self.cursor.read_u8() else {
            return Ok(None);
        };

        let msb = match self.cursor.read_u8() {
            Some(msb) => msb,
            None if lsb == ASCII_EOF => return Ok(None),
            None => return Err(WdiError::eof(self.cursor.offset(), "physical cylinder MSB")),
        };

        // Transfer padding, anything after it is discarded
        if msb == ASCII_EOF {
            log::debug!("read_cylinder: end-of-file marker at {:#x}", offset);
            return Ok(None);
        }

        let cylinder = u16::from_le_bytes([lsb, msb]);
        if cylinder > MAX_PHYSICAL_CYLINDER {
            return Err(WdiError::out_of_range(
                offset,
                "physical cylinder",
                cylinder.into(),
                MAX_PHYSICAL_CYLINDER.into(),
            ));
        }

        Ok(Some(cylinder))
    }

    fn read_sector_data(&mut self, id: SectorId) -> Result<ResolvedSector> {
        let offset = self.cursor.offset();
        let raw = self.cursor.expect_u8("sector data type")?;
        let data_type = DataType::from_byte(raw).ok_or_else(|| {
            WdiError::out_of_range(
                offset,
                "sector data type",
                (raw & DATA_TYPE_MASK).into(),
                MAX_DATA_TYPE.into(),
            )
        })?;

        let size = id.size_bytes();
        let data = match data_type.outcome {
            SectorOutcome::BadBlock => {
                self.summary.bad_blocks += 1;
                vec![self.fill_byte; size]
            }
            outcome => {
                if outcome == SectorOutcome::DataError {
                    self.summary.data_errors += 1;
                }

                if data_type.compressed {
                    let byte = self.cursor.expect_u8("compressed sector data")?;
                    vec![byte; size]
                } else {
                    self.cursor
                        .expect_bytes(size, &format!("{}B sector data", size))?
                        .to_vec()
                }
            }
        };

        Ok(ResolvedSector::new(id, data_type, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(data: &[u8]) -> Result<(Vec<TrackRecord>, ParseSummary)> {
        let mut decoder = TrackDecoder::new(data, 0, 0xF6);
        let mut tracks = Vec::new();
        while let Some(track) = decoder.next_track()? {
            tracks.push(track);
        }
        Ok((tracks, decoder.into_summary()))
    }

    #[test]
    fn test_empty_stream() {
        let (tracks, summary) = decode_all(&[]).unwrap();
        assert!(tracks.is_empty());
        assert_eq!(summary, ParseSummary::default());
    }

    #[test]
    fn test_single_good_sector() {
        let mut data = vec![0x05, 0x00, 0x02, 0x01];
        data.extend_from_slice(&[0x05, 0x00, 0x01, 0x60]);
        data.push(0x01);
        data.extend(0..128u8);

        let (tracks, summary) = decode_all(&data).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].cylinder, 5);
        assert_eq!(tracks[0].head, 2);
        assert_eq!(tracks[0].sectors()[0].id, SectorId::new(5, 1, 0x60));
        assert_eq!(tracks[0].sectors()[0].data(), (0..128u8).collect::<Vec<_>>());
        assert_eq!(summary.tracks, 1);
        assert_eq!(summary.bad_blocks, 0);
    }

    #[test]
    fn test_unreadable_track() {
        let data = [0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
        let (tracks, summary) = decode_all(&data).unwrap();
        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t| t.is_unreadable()));
        assert_eq!(summary.unreadable_tracks, 2);
    }

    #[test]
    fn test_sector_outcomes() {
        let mut data = vec![0x00, 0x00, 0x00, 0x03];
        for sector in 0..3 {
            data.extend_from_slice(&[0x00, 0x00, sector, 0x60]);
        }
        data.push(0x00); // bad block
        data.push(0x02); // data error
        data.extend_from_slice(&[0x55; 128]);
        data.extend_from_slice(&[0x81, 0xE5]); // compressed

        let (tracks, summary) = decode_all(&data).unwrap();
        let sectors = tracks[0].sectors();
        assert_eq!(sectors[0].data(), &[0xF6; 128][..]);
        assert_eq!(sectors[1].data(), &[0x55; 128][..]);
        assert_eq!(sectors[2].data(), &[0xE5; 128][..]);
        assert_eq!(summary.bad_blocks, 1);
        assert_eq!(summary.data_errors, 1);
    }

    #[test]
    fn test_compressed_data_error_counts() {
        let data = [0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0x82, 0x00];
        let (tracks, summary) = decode_all(&data).unwrap();
        assert_eq!(tracks[0].sectors()[0].data().len(), 256);
        assert_eq!(summary.data_errors, 1);
    }

    #[test]
    fn test_end_marker_in_msb() {
        let data = [0x1A, 0x1A, 0x1A, 0x1A, 0xFF, 0xFF];
        let (tracks, _) = decode_all(&data).unwrap();
        assert!(tracks.is_empty());

        let data = [0x00, 0x1A, 0x99];
        assert!(decode_all(&data).unwrap().0.is_empty());
    }

    #[test]
    fn test_end_marker_as_last_byte() {
        let data = [0x00, 0x00, 0x00, 0x00, 0x1A];
        let (tracks, summary) = decode_all(&data).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(summary.unreadable_tracks, 1);
    }

    #[test]
    fn test_truncated_cylinder() {
        let err = decode_all(&[0x05]).unwrap_err();
        assert!(matches!(err, WdiError::UnexpectedEof { offset: 1, .. }));
    }

    #[test]
    fn test_cylinder_26_is_not_end_marker() {
        // 0x1A in the LSB only ends track data when it is the last byte
        let data = [0x1A, 0x00, 0x00, 0x00, 0x1A, 0x00, 0x01, 0x00];
        let (tracks, summary) = decode_all(&data).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].cylinder, 26);
        assert_eq!(tracks[1].cylinder, 26);
        assert_eq!(tracks[1].head, 1);
        assert_eq!(summary.unreadable_tracks, 2);
    }

    #[test]
    fn test_decoder_stops_after_end() {
        let data = [0x00, 0x1A];
        let mut decoder = TrackDecoder::new(&data, 0, 0);
        assert!(decoder.next_track().unwrap().is_none());
        assert!(decoder.next_track().unwrap().is_none());
    }

    #[test]
    fn test_cylinder_out_of_range() {
        let err = decode_all(&[0x00, 0x08, 0x00, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            WdiError::FieldOutOfRange { offset: 0, value: 2048, max: 2047, .. }
        ));
    }

    #[test]
    fn test_head_out_of_range() {
        let err = decode_all(&[0x00, 0x00, 0x10, 0x00]).unwrap_err();
        assert!(matches!(err, WdiError::FieldOutOfRange { offset: 2, value: 16, .. }));
    }

    #[test]
    fn test_sector_count_out_of_range() {
        let err = decode_all(&[0x00, 0x00, 0x00, 65]).unwrap_err();
        assert!(matches!(err, WdiError::FieldOutOfRange { offset: 3, value: 65, .. }));
    }

    #[test]
    fn test_invalid_data_type() {
        let data = [0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0x83];
        let err = decode_all(&data).unwrap_err();
        assert!(matches!(err, WdiError::FieldOutOfRange { offset: 8, value: 3, .. }));
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = vec![0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x01, 0x20, 0x01];
        data.extend_from_slice(&[0xAA; 100]);
        let err = decode_all(&data).unwrap_err();
        assert_eq!(err.offset(), Some(data.len()));
        assert!(err.to_string().contains("512B sector data"));
    }

    #[test]
    fn test_truncated_sector_id() {
        let data = [0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x01];
        let err = decode_all(&data).unwrap_err();
        assert!(matches!(err, WdiError::UnexpectedEof { offset: 7, .. }));
    }
}
