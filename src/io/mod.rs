/// I/O operations for reading WDI files and writing raw images

/// Offset-tracking byte cursor
pub mod cursor;
/// Track record decoder
pub mod decoder;
/// Header reader
pub mod header;
/// Raw image writer
pub mod writer;

pub use cursor::ByteCursor;
pub use decoder::{ParseSummary, TrackDecoder};
pub use header::{read_description, read_header, verify_header};
pub use writer::{Geometry, ImageWriter, SectorOrder};
