/// WDI header reader

use crate::error::{Result, WdiError};
use crate::format::constants::*;
use crate::format::{has_signature, DriveParameters, WdiHeader};
use crate::io::cursor::ByteCursor;

/// Check the signature and that a sentinel follows it somewhere
///
/// This is a coarse well-formedness check. The description boundary is
/// found separately by [`read_description`].
pub fn verify_header(data: &[u8]) -> Result<()> {
    if !has_signature(data) {
        return Err(WdiError::header("signature mismatch"));
    }

    let mut cursor = ByteCursor::at(data, WDI_SIGNATURE.len());
    match cursor.read_until(ASCII_EOF) {
        (_, true) => Ok(()),
        (_, false) => Err(WdiError::header("no end-of-header marker found")),
    }
}

/// Read the description following the fixed header prefix
///
/// Returns the text and the offset just past its terminator.
pub fn read_description(data: &[u8]) -> Result<(String, usize)> {
    let mut cursor = ByteCursor::at(data, HEADER_PREFIX_SIZE);
    let (text, _) = cursor.read_until(ASCII_EOF);

    if !text.is_ascii() {
        return Err(WdiError::header("description is not ASCII text"));
    }

    // ASCII is valid UTF-8
    let description = String::from_utf8_lossy(text).into_owned();
    Ok((description, cursor.offset()))
}

/// Read the full header
///
/// Returns the header and the offset where track data begins.
pub fn read_header(data: &[u8]) -> Result<(WdiHeader, usize)> {
    verify_header(data)?;

    let (description, params_offset) = read_description(data)?;
    log::trace!(
        "read_header: description of {} bytes, drive parameters at {:#x}",
        description.len(),
        params_offset
    );

    let mut cursor = ByteCursor::at(data, params_offset);
    if cursor.remaining() < DRIVE_PARAMS_SIZE {
        return Err(WdiError::header(format!(
            "drive parameter table truncated, {} of {} bytes present",
            cursor.remaining(),
            DRIVE_PARAMS_SIZE
        )));
    }

    let block: [u8; DRIVE_PARAMS_SIZE] = cursor
        .expect_bytes(DRIVE_PARAMS_SIZE, "drive parameter table")?
        .try_into()
        .map_err(|_| WdiError::header("drive parameter table truncated"))?;
    let params = DriveParameters::from_bytes(&block);
    log::debug!("read_header: {:?}", params);

    Ok((
        WdiHeader {
            description,
            params,
        },
        cursor.offset(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix() -> Vec<u8> {
        let data = b"WDI file created by Winchesterduino, (c) J. Bogin\r\n".to_vec();
        assert_eq!(data.len(), HEADER_PREFIX_SIZE);
        data
    }

    #[test]
    fn test_verify_header() {
        let mut data = prefix();
        data.push(ASCII_EOF);
        assert!(verify_header(&data).is_ok());
    }

    #[test]
    fn test_verify_header_bad_signature() {
        let mut data = b"WDX ".to_vec();
        data.push(ASCII_EOF);
        assert!(matches!(verify_header(&data), Err(WdiError::HeaderInvalid(_))));
    }

    #[test]
    fn test_verify_header_no_sentinel() {
        assert!(matches!(verify_header(&prefix()), Err(WdiError::HeaderInvalid(_))));
        assert!(verify_header(b"WDI").is_err());
    }

    #[test]
    fn test_read_description() {
        let mut data = prefix();
        data.extend_from_slice(b"Seagate ST-225\r\n");
        data.push(ASCII_EOF);

        let (description, offset) = read_description(&data).unwrap();
        assert_eq!(description, "Seagate ST-225\r\n");
        assert_eq!(offset, data.len());
    }

    #[test]
    fn test_read_empty_description() {
        let mut data = prefix();
        data.push(ASCII_EOF);

        let (description, offset) = read_description(&data).unwrap();
        assert!(description.is_empty());
        assert_eq!(offset, HEADER_PREFIX_SIZE + 1);
    }

    #[test]
    fn test_description_not_ascii() {
        let mut data = prefix();
        data.extend_from_slice(&[0xC3, 0xA9, ASCII_EOF]);
        assert!(read_description(&data).is_err());
    }

    #[test]
    fn test_sentinel_in_reserved_bytes_is_not_description_end() {
        // The reserved area may hold the sentinel, the description still
        // starts at the fixed prefix
        let mut data = prefix();
        data[20] = ASCII_EOF;
        data.extend_from_slice(b"text");
        data.push(ASCII_EOF);

        assert!(verify_header(&data).is_ok());
        assert_eq!(read_description(&data).unwrap().0, "text");
    }

    #[test]
    fn test_read_header() {
        let mut data = prefix();
        data.push(ASCII_EOF);
        let mut block = [0u8; DRIVE_PARAMS_SIZE];
        block[PARAMS_CYLINDERS_OFFSET] = 0x67;
        block[PARAMS_CYLINDERS_OFFSET + 1] = 0x02;
        block[PARAMS_HEADS_OFFSET] = 4;
        data.extend_from_slice(&block);

        let (header, data_start) = read_header(&data).unwrap();
        assert!(header.description.is_empty());
        assert_eq!(header.params.cylinders, 615);
        assert_eq!(header.params.heads, 4);
        assert_eq!(data_start, data.len());
    }

    #[test]
    fn test_read_header_truncated_params() {
        let mut data = prefix();
        data.push(ASCII_EOF);
        data.extend_from_slice(&[0u8; DRIVE_PARAMS_SIZE - 1]);

        assert!(matches!(read_header(&data), Err(WdiError::HeaderInvalid(_))));
    }
}
