/// WDI format constants and drive parameters

/// Format constants
pub mod constants;
/// Drive parameter block types
pub mod params;

pub use constants::*;
pub use params::{CylinderOption, DataMode, DriveParameters, SeekType, VerifyMode};

/// Decoded container header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WdiHeader {
    /// Free-text description, empty when none was entered
    pub description: String,
    /// Drive parameters the image was captured with
    pub params: DriveParameters,
}

/// Check whether a buffer begins with the WDI signature
pub fn has_signature(data: &[u8]) -> bool {
    data.starts_with(WDI_SIGNATURE)
}
