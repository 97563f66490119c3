/// Offset-tracking cursor over an in-memory WDI stream

use crate::error::{Result, WdiError};

/// Sequential reader that always knows its byte offset
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a cursor positioned at `offset`, clamped to the end
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            pos: offset.min(data.len()),
        }
    }

    /// Current byte offset
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Number of bytes left
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Check whether the whole stream has been consumed
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Read one byte, `None` at end of stream
    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// Read one byte or fail with an end-of-stream error naming `expected`
    pub fn expect_u8(&mut self, expected: &str) -> Result<u8> {
        self.read_u8()
            .ok_or_else(|| WdiError::eof(self.pos, expected))
    }

    /// Read a little-endian 16-bit value or fail naming `expected`
    pub fn expect_u16_le(&mut self, expected: &str) -> Result<u16> {
        let lsb = self.expect_u8(&format!("{} LSB", expected))?;
        let msb = self.expect_u8(&format!("{} MSB", expected))?;
        Ok(u16::from_le_bytes([lsb, msb]))
    }

    /// Read exactly `len` bytes or fail naming `expected`
    ///
    /// A short read consumes what is left so the error reports where the
    /// stream actually ended.
    pub fn expect_bytes(&mut self, len: usize, expected: &str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            self.pos = self.data.len();
            return Err(WdiError::eof(self.pos, expected));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read bytes up to `sentinel`, consuming it
    ///
    /// Returns the bytes before the sentinel and whether it was found. When
    /// it is missing, everything up to the end of the stream is returned.
    pub fn read_until(&mut self, sentinel: u8) -> (&'a [u8], bool) {
        let rest = &self.data[self.pos..];
        match rest.iter().position(|&b| b == sentinel) {
            Some(idx) => {
                self.pos += idx + 1;
                (&rest[..idx], true)
            }
            None => {
                self.pos = self.data.len();
                (rest, false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u8_tracks_offset() {
        let mut cursor = ByteCursor::new(&[1, 2]);
        assert_eq!(cursor.read_u8(), Some(1));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.read_u8(), Some(2));
        assert!(cursor.is_at_end());
        assert_eq!(cursor.read_u8(), None);
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_expect_u16_le() {
        let mut cursor = ByteCursor::new(&[0xFF, 0x07, 0x01]);
        assert_eq!(cursor.expect_u16_le("cylinder").unwrap(), 2047);

        let err = cursor.expect_u16_le("cylinder").unwrap_err();
        assert!(matches!(
            err,
            WdiError::UnexpectedEof { offset: 3, ref expected } if expected == "cylinder MSB"
        ));
    }

    #[test]
    fn test_short_read_reports_stream_end() {
        let data = [0u8; 10];
        let mut cursor = ByteCursor::at(&data, 4);
        let err = cursor.expect_bytes(256, "256B sector data").unwrap_err();
        assert_eq!(err.offset(), Some(10));
    }

    #[test]
    fn test_read_until() {
        let data = b"abc\x1Adef";
        let mut cursor = ByteCursor::new(data);
        assert_eq!(cursor.read_until(0x1A), (&b"abc"[..], true));
        assert_eq!(cursor.offset(), 4);
        assert_eq!(cursor.read_until(0x1A), (&b"def"[..], false));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_at_clamps_offset() {
        let cursor = ByteCursor::at(&[0u8; 4], 51);
        assert_eq!(cursor.offset(), 4);
        assert_eq!(cursor.remaining(), 0);
    }
}
