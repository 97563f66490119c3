/// Drive parameter block

use crate::format::constants::*;
use std::fmt;

/// Data separator mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    /// Modified Frequency Modulation
    Mfm,
    /// Run Length Limited (2,7)
    Rll,
    /// Value not defined by the format
    Other(u8),
}

impl From<u8> for DataMode {
    fn from(value: u8) -> Self {
        match value {
            0 => DataMode::Mfm,
            1 => DataMode::Rll,
            other => DataMode::Other(other),
        }
    }
}

impl From<DataMode> for u8 {
    fn from(mode: DataMode) -> Self {
        match mode {
            DataMode::Mfm => 0,
            DataMode::Rll => 1,
            DataMode::Other(value) => value,
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataMode::Mfm => write!(f, "MFM"),
            DataMode::Rll => write!(f, "RLL"),
            DataMode::Other(value) => write!(f, "unknown ({})", value),
        }
    }
}

/// Data field verification mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    /// 16-bit CRC
    Crc16,
    /// 32-bit ECC
    Ecc32,
    /// 56-bit ECC
    Ecc56,
    /// Value not defined by the format
    Other(u8),
}

impl From<u8> for VerifyMode {
    fn from(value: u8) -> Self {
        match value {
            0 => VerifyMode::Crc16,
            1 => VerifyMode::Ecc32,
            2 => VerifyMode::Ecc56,
            other => VerifyMode::Other(other),
        }
    }
}

impl From<VerifyMode> for u8 {
    fn from(mode: VerifyMode) -> Self {
        match mode {
            VerifyMode::Crc16 => 0,
            VerifyMode::Ecc32 => 1,
            VerifyMode::Ecc56 => 2,
            VerifyMode::Other(value) => value,
        }
    }
}

impl fmt::Display for VerifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyMode::Crc16 => write!(f, "16-bit CRC"),
            VerifyMode::Ecc32 => write!(f, "32-bit ECC"),
            VerifyMode::Ecc56 => write!(f, "56-bit ECC"),
            VerifyMode::Other(value) => write!(f, "unknown ({})", value),
        }
    }
}

/// Drive seeking mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekType {
    /// Fast, buffered seeks
    Buffered,
    /// Slow, ST-506 compatible step pulses
    St506,
    /// Value not defined by the format
    Other(u8),
}

impl From<u8> for SeekType {
    fn from(value: u8) -> Self {
        match value {
            0 => SeekType::Buffered,
            1 => SeekType::St506,
            other => SeekType::Other(other),
        }
    }
}

impl From<SeekType> for u8 {
    fn from(seek: SeekType) -> Self {
        match seek {
            SeekType::Buffered => 0,
            SeekType::St506 => 1,
            SeekType::Other(value) => value,
        }
    }
}

impl fmt::Display for SeekType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekType::Buffered => write!(f, "fast, buffered"),
            SeekType::St506 => write!(f, "slow, ST-506 compatible"),
            SeekType::Other(value) => write!(f, "unknown ({})", value),
        }
    }
}

/// A feature flag byte paired with its starting cylinder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CylinderOption {
    /// Raw enable byte, nonzero means enabled
    pub flag: u8,
    /// Starting cylinder
    pub cylinder: u16,
}

impl CylinderOption {
    /// Create an enabled option starting at `cylinder`
    pub fn enabled_from(cylinder: u16) -> Self {
        Self { flag: 1, cylinder }
    }

    /// Check whether the option is enabled
    pub fn is_enabled(&self) -> bool {
        self.flag != 0
    }
}

/// Decoded drive parameter block
///
/// Values are kept as stored. Range checking is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveParameters {
    /// Data separator mode
    pub data_mode: DataMode,
    /// Data field verification mode
    pub verify_mode: VerifyMode,
    /// Physical cylinder count
    pub cylinders: u16,
    /// Physical head count
    pub heads: u8,
    /// Write precompensation
    pub write_precomp: CylinderOption,
    /// Reduced write current
    pub reduced_write_current: CylinderOption,
    /// Landing zone parking cylinder
    pub landing_zone: CylinderOption,
    /// Seek type
    pub seek_type: SeekType,
    /// Raw partial image flag, nonzero means partial
    pub partial_image: u8,
    /// First imaged cylinder of a partial image
    pub partial_start_cylinder: u16,
    /// Last imaged cylinder of a partial image
    pub partial_end_cylinder: u16,
}

#[inline]
fn le16(block: &[u8; DRIVE_PARAMS_SIZE], offset: usize) -> u16 {
    u16::from_le_bytes([block[offset], block[offset + 1]])
}

impl DriveParameters {
    /// Decode the 32-byte drive parameter block
    pub fn from_bytes(block: &[u8; DRIVE_PARAMS_SIZE]) -> Self {
        let option = |offset: usize| CylinderOption {
            flag: block[offset],
            cylinder: le16(block, offset + 1),
        };

        Self {
            data_mode: DataMode::from(block[PARAMS_DATA_MODE_OFFSET]),
            verify_mode: VerifyMode::from(block[PARAMS_VERIFY_MODE_OFFSET]),
            cylinders: le16(block, PARAMS_CYLINDERS_OFFSET),
            heads: block[PARAMS_HEADS_OFFSET],
            write_precomp: option(PARAMS_WRITE_PRECOMP_OFFSET),
            reduced_write_current: option(PARAMS_RWC_OFFSET),
            landing_zone: option(PARAMS_LANDING_ZONE_OFFSET),
            seek_type: SeekType::from(block[PARAMS_SEEK_TYPE_OFFSET]),
            partial_image: block[PARAMS_PARTIAL_IMAGE_OFFSET],
            partial_start_cylinder: le16(block, PARAMS_PARTIAL_IMAGE_OFFSET + 1),
            partial_end_cylinder: le16(block, PARAMS_PARTIAL_IMAGE_OFFSET + 3),
        }
    }

    /// Encode into a 32-byte drive parameter block, reserved bytes zeroed
    pub fn to_bytes(&self) -> [u8; DRIVE_PARAMS_SIZE] {
        let mut block = [0u8; DRIVE_PARAMS_SIZE];

        let put16 = |block: &mut [u8; DRIVE_PARAMS_SIZE], offset: usize, value: u16| {
            block[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        };

        block[PARAMS_DATA_MODE_OFFSET] = self.data_mode.into();
        block[PARAMS_VERIFY_MODE_OFFSET] = self.verify_mode.into();
        put16(&mut block, PARAMS_CYLINDERS_OFFSET, self.cylinders);
        block[PARAMS_HEADS_OFFSET] = self.heads;

        for (offset, option) in [
            (PARAMS_WRITE_PRECOMP_OFFSET, self.write_precomp),
            (PARAMS_RWC_OFFSET, self.reduced_write_current),
            (PARAMS_LANDING_ZONE_OFFSET, self.landing_zone),
        ] {
            block[offset] = option.flag;
            put16(&mut block, offset + 1, option.cylinder);
        }

        block[PARAMS_SEEK_TYPE_OFFSET] = self.seek_type.into();
        block[PARAMS_PARTIAL_IMAGE_OFFSET] = self.partial_image;
        put16(&mut block, PARAMS_PARTIAL_IMAGE_OFFSET + 1, self.partial_start_cylinder);
        put16(&mut block, PARAMS_PARTIAL_IMAGE_OFFSET + 3, self.partial_end_cylinder);

        block
    }

    /// Check whether the image holds only a cylinder range
    pub fn is_partial(&self) -> bool {
        self.partial_image != 0
    }
}

impl Default for DriveParameters {
    /// A full image of a 615-cylinder, 4-head MFM drive (ST-225 class)
    fn default() -> Self {
        Self {
            data_mode: DataMode::Mfm,
            verify_mode: VerifyMode::Crc16,
            cylinders: 615,
            heads: 4,
            write_precomp: CylinderOption::enabled_from(300),
            reduced_write_current: CylinderOption::default(),
            landing_zone: CylinderOption::default(),
            seek_type: SeekType::Buffered,
            partial_image: 0,
            partial_start_cylinder: 0,
            partial_end_cylinder: 0,
        }
    }
}
