/*!
# wdinspect

A Rust library for inspecting WDI hard disk images and converting them to raw disk images.

WDI images are captured track by track from MFM and RLL Winchester drives. They keep the
physical sector order of every track along with bad block flags, CRC/ECC data errors,
unreadable tracks and single-byte sector compression.

## Features

- Header validation, description text and drive parameter decoding
- Track by track decoding with bad block, data error and unreadable track counters
- Interleave detection from the physical sector order
- Raw image output in capture order or reinterleaved to 1:1, optionally aligned to an
  expected track geometry
- Encoding of WDI containers

## Quick Start

```rust,no_run
use std::path::Path;
use wdinspect::{Geometry, ParseOptions, WdiParser};

// Open an image and create a raw output file
let mut parser = WdiParser::open("drive.wdi", Some(Path::new("drive.img")))?;

// Read the drive parameters
let params = parser.read_drive_parameters()?;
println!("{} cylinders, {} heads", params.cylinders, params.heads);

// Decode all tracks, writing 17 x 512 byte tracks in 1:1 order
let options = ParseOptions {
    align: true,
    expected_geometry: Some(Geometry::new(17, 512)?),
    ..Default::default()
};
let summary = parser.parse(&options)?;
println!("{} bad blocks, {} data errors", summary.bad_blocks, summary.data_errors);
# Ok::<(), wdinspect::WdiError>(())
```

## Modules

- `format`: WDI format constants and drive parameters
- `image`: Track and sector structures, container builder
- `io`: Header reader, track decoder and raw image writer
- `parser`: High level parser
- `interleave`: Interleave detection
- `align`: Logical sector alignment
- `diagnostics`: Verbose parse diagnostics
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// Logical sector alignment
pub mod align;
/// Verbose parse diagnostics
pub mod diagnostics;
/// Error types and Result alias
pub mod error;
/// WDI format constants and drive parameters
pub mod format;
/// Track and sector data structures
pub mod image;
/// Interleave detection
pub mod interleave;
/// I/O operations for reading WDI files and writing raw images
pub mod io;
/// High level parser
pub mod parser;

// Re-export common types
pub use align::align_sectors;
pub use diagnostics::{track_listing, Diagnostics, LogDiagnostics, NoDiagnostics};
pub use error::{Result, WdiError};
pub use format::{CylinderOption, DataMode, DriveParameters, SeekType, VerifyMode, WdiHeader};
pub use image::{
    DataType, ResolvedSector, SectorId, SectorOutcome, SectorSpec, TrackRecord, TrackSpec,
    WdiBuilder,
};
pub use interleave::{detect_interleave, Interleave};
pub use io::{Geometry, ImageWriter, ParseSummary, SectorOrder, TrackDecoder};
pub use parser::{ParseOptions, WdiParser};
