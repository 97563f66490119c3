/// WDI image data structures

/// Builder for encoding WDI containers
pub mod builder;
/// Sector definition and outcome
pub mod sector;
/// Track record definition
pub mod track;

pub use builder::{SectorSpec, TrackSpec, WdiBuilder};
pub use sector::{DataType, ResolvedSector, SectorId, SectorOutcome};
pub use track::TrackRecord;
