/// WDI parser: header access and track decoding with raw image output

use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::error::{Result, WdiError};
use crate::format::{DriveParameters, WdiHeader};
use crate::io::{read_header, Geometry, ImageWriter, ParseSummary, SectorOrder, TrackDecoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Options controlling a parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Report the error that aborted the parse to the diagnostics receiver
    pub verbose_errors: bool,
    /// Report every decoded track to the diagnostics receiver
    pub verbose_track_listing: bool,
    /// Write sectors in ascending logical order instead of capture order
    pub reinterleave: bool,
    /// Fill missing sectors and unreadable tracks to `expected_geometry`
    pub align: bool,
    /// Expected track geometry, required by `align`
    pub expected_geometry: Option<Geometry>,
    /// Byte used for bad blocks and alignment fill
    pub fill_byte: u8,
}

/// Parser over an in-memory WDI image with an optional raw image sink
#[derive(Debug)]
pub struct WdiParser<W: Write = BufWriter<File>> {
    data: Vec<u8>,
    output: Option<W>,
}

impl WdiParser<BufWriter<File>> {
    /// Open a WDI file and, optionally, create the raw image destination
    ///
    /// An existing destination is truncated.
    pub fn open<P: AsRef<Path>>(source: P, dest: Option<&Path>) -> Result<Self> {
        let source = source.as_ref();
        let data = std::fs::read(source).map_err(|e| WdiError::FileOpen {
            path: source.to_path_buf(),
            source: e,
        })?;

        let output = match dest {
            Some(path) => {
                let file = File::create(path).map_err(|e| WdiError::FileOpen {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                Some(BufWriter::new(file))
            }
            None => None,
        };

        log::debug!("open: {} ({} bytes)", source.display(), data.len());
        Ok(Self { data, output })
    }
}

impl<W: Write> WdiParser<W> {
    /// Create a parser over WDI data already in memory
    pub fn from_bytes(data: Vec<u8>, output: Option<W>) -> Self {
        Self { data, output }
    }

    /// Check whether a raw image destination was supplied
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Read the header: description and drive parameters
    pub fn read_header(&self) -> Result<WdiHeader> {
        read_header(&self.data).map(|(header, _)| header)
    }

    /// Read the drive parameters
    pub fn read_drive_parameters(&self) -> Result<DriveParameters> {
        self.read_header().map(|header| header.params)
    }

    /// Decode every track, logging diagnostics through the `log` facade
    pub fn parse(&mut self, options: &ParseOptions) -> Result<ParseSummary> {
        self.parse_with(options, &mut LogDiagnostics)
    }

    /// Decode every track, sending diagnostics to `diagnostics`
    ///
    /// Succeeds once the end of track data is reached. Counters are
    /// discarded on the first fatal error.
    pub fn parse_with(
        &mut self,
        options: &ParseOptions,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<ParseSummary> {
        let result = self.decode(options, diagnostics);
        if let Err(ref error) = result {
            if options.verbose_errors {
                diagnostics.error(error);
            }
        }
        result
    }

    fn decode(
        &mut self,
        options: &ParseOptions,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<ParseSummary> {
        let (_, data_start) = read_header(&self.data)?;

        let alignment = if options.align && self.output.is_some() {
            let geometry = options.expected_geometry.ok_or_else(|| {
                WdiError::geometry("alignment requested without expected track geometry")
            })?;
            Some(geometry)
        } else {
            None
        };

        let order = if options.reinterleave || alignment.is_some() {
            SectorOrder::Normalized
        } else {
            SectorOrder::Capture
        };

        let mut writer = ImageWriter::new(self.output.as_mut())
            .with_order(order)
            .with_alignment(alignment)
            .with_fill_byte(options.fill_byte);
        let mut decoder = TrackDecoder::new(&self.data, data_start, options.fill_byte);

        while let Some(track) = decoder.next_track()? {
            if options.verbose_track_listing {
                diagnostics.track(&track);
            }
            writer.write_track(&track)?;
        }
        writer.flush()?;

        log::debug!(
            "parse: {} tracks, {} bytes of raw image written",
            decoder.summary().tracks,
            writer.bytes_written()
        );
        Ok(decoder.into_summary())
    }

    /// Consume the parser, returning the raw image sink
    pub fn into_output(self) -> Option<W> {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{SectorSpec, TrackSpec, WdiBuilder};
    use crate::image::TrackRecord;

    #[derive(Default)]
    struct Recorder {
        tracks: Vec<(u16, u8)>,
        errors: Vec<String>,
    }

    impl Diagnostics for Recorder {
        fn track(&mut self, track: &TrackRecord) {
            self.tracks.push((track.cylinder, track.head));
        }

        fn error(&mut self, error: &WdiError) {
            self.errors.push(error.to_string());
        }
    }

    fn sample() -> Vec<u8> {
        WdiBuilder::new()
            .description("test drive")
            .track(TrackSpec::new(0, 0).sector(SectorSpec::good(0, 0x00, vec![0x11; 256])))
            .track(TrackSpec::new(0, 1))
            .terminator(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_read_header() {
        let parser: WdiParser<Vec<u8>> = WdiParser::from_bytes(sample(), None);
        let header = parser.read_header().unwrap();
        assert_eq!(header.description, "test drive");
        assert_eq!(parser.read_drive_parameters().unwrap(), DriveParameters::default());
    }

    #[test]
    fn test_parse_counts() {
        let mut parser: WdiParser<Vec<u8>> = WdiParser::from_bytes(sample(), None);
        let summary = parser.parse(&ParseOptions::default()).unwrap();
        assert_eq!(summary.unreadable_tracks, 1);
        assert_eq!(summary.tracks, 2);
    }

    #[test]
    fn test_parse_is_repeatable() {
        let mut parser: WdiParser<Vec<u8>> = WdiParser::from_bytes(sample(), None);
        let first = parser.parse(&ParseOptions::default()).unwrap();
        let second = parser.parse(&ParseOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_track_listing_only_when_verbose() {
        let mut parser = WdiParser::from_bytes(sample(), Some(Vec::new()));
        let mut recorder = Recorder::default();
        parser.parse_with(&ParseOptions::default(), &mut recorder).unwrap();
        assert!(recorder.tracks.is_empty());

        let options = ParseOptions {
            verbose_track_listing: true,
            ..Default::default()
        };
        parser.parse_with(&options, &mut recorder).unwrap();
        assert_eq!(recorder.tracks, vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn test_errors_only_when_verbose() {
        let mut data = sample();
        data.truncate(data.len() - 20);

        let mut parser: WdiParser<Vec<u8>> = WdiParser::from_bytes(data, None);
        let mut recorder = Recorder::default();
        assert!(parser.parse_with(&ParseOptions::default(), &mut recorder).is_err());
        assert!(recorder.errors.is_empty());

        let options = ParseOptions {
            verbose_errors: true,
            ..Default::default()
        };
        assert!(parser.parse_with(&options, &mut recorder).is_err());
        assert_eq!(recorder.errors.len(), 1);
    }

    #[test]
    fn test_align_requires_geometry() {
        let mut parser = WdiParser::from_bytes(sample(), Some(Vec::new()));
        let options = ParseOptions {
            align: true,
            ..Default::default()
        };
        let err = parser.parse(&options).unwrap_err();
        assert!(matches!(err, WdiError::InvalidGeometry(_)));
        assert!(parser.into_output().unwrap().is_empty());
    }

    #[test]
    fn test_align_ignored_without_output() {
        let mut parser: WdiParser<Vec<u8>> = WdiParser::from_bytes(sample(), None);
        let options = ParseOptions {
            align: true,
            ..Default::default()
        };
        assert!(parser.parse(&options).is_ok());
    }
}
