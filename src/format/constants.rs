/// WDI format magic bytes and constants

/// WDI file signature
pub const WDI_SIGNATURE: &[u8] = b"WDI ";

/// ASCII end-of-file, terminates the description and marks the end of track data
pub const ASCII_EOF: u8 = 0x1A;

/// Signature plus reserved bytes preceding the description
pub const HEADER_PREFIX_SIZE: usize = 51;

/// Creator banner written after the signature by this library
pub const CREATOR_BANNER: &[u8] = b"file created by wdinspect";

/// Size of the drive parameter block
pub const DRIVE_PARAMS_SIZE: usize = 32;

/// Highest physical cylinder number
pub const MAX_PHYSICAL_CYLINDER: u16 = 2047;

/// Highest physical head number
pub const MAX_PHYSICAL_HEAD: u8 = 15;

/// Maximum number of sectors per track
pub const MAX_SECTORS_PER_TRACK: u8 = 64;

/// SDH bits selecting the sector size
pub const SDH_SIZE_MASK: u8 = 0x60;

/// Data type flag for a single-byte compressed payload
pub const DATA_COMPRESSED_FLAG: u8 = 0x80;

/// Data type bits selecting the sector outcome
pub const DATA_TYPE_MASK: u8 = 0x7F;

/// Highest legal sector outcome
pub const MAX_DATA_TYPE: u8 = 2;

/// Convert an SDH byte to the sector size in bytes
///
/// Only bits 5-6 are significant.
#[inline]
pub fn sdh_to_sector_size(sdh: u8) -> usize {
    match sdh & SDH_SIZE_MASK {
        0x60 => 128,
        0x40 => 1024,
        0x20 => 512,
        _ => 256,
    }
}

/// Convert a sector size to the SDH size bits
#[inline]
pub fn sector_size_to_sdh(bytes: usize) -> Option<u8> {
    match bytes {
        128 => Some(0x60),
        256 => Some(0x00),
        512 => Some(0x20),
        1024 => Some(0x40),
        _ => None,
    }
}

/// Offset of data mode in drive parameter block
pub const PARAMS_DATA_MODE_OFFSET: usize = 0;

/// Offset of verify mode in drive parameter block
pub const PARAMS_VERIFY_MODE_OFFSET: usize = 1;

/// Offset of cylinder count in drive parameter block
pub const PARAMS_CYLINDERS_OFFSET: usize = 2;

/// Offset of head count in drive parameter block
pub const PARAMS_HEADS_OFFSET: usize = 4;

/// Offset of write precompensation flag in drive parameter block
pub const PARAMS_WRITE_PRECOMP_OFFSET: usize = 5;

/// Offset of reduced write current flag in drive parameter block
pub const PARAMS_RWC_OFFSET: usize = 8;

/// Offset of landing zone flag in drive parameter block
pub const PARAMS_LANDING_ZONE_OFFSET: usize = 11;

/// Offset of seek type in drive parameter block
pub const PARAMS_SEEK_TYPE_OFFSET: usize = 14;

/// Offset of partial image flag in drive parameter block
pub const PARAMS_PARTIAL_IMAGE_OFFSET: usize = 15;
