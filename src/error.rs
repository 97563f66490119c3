use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for WDI operations
pub type Result<T> = std::result::Result<T, WdiError>;

/// Errors that can occur when working with WDI files
#[derive(Debug, Error)]
pub enum WdiError {
    /// I/O error occurred while reading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source or destination file could not be opened
    #[error("Cannot open {}: {source}", path.display())]
    FileOpen {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing signature, missing sentinel or truncated drive parameters
    #[error("Invalid WDI header: {0}")]
    HeaderInvalid(String),

    /// A track or sector field holds a value outside its legal range
    #[error("Invalid {field} value {value}, must be 0-{max} at offset {offset:#x}")]
    FieldOutOfRange {
        /// Byte offset of the offending field
        offset: usize,
        /// Field name
        field: &'static str,
        /// Value found in the stream
        value: u32,
        /// Largest legal value
        max: u32,
    },

    /// The stream ended in the middle of a record
    #[error("Expected {expected}, got end-of-file at offset {offset:#x}")]
    UnexpectedEof {
        /// Byte offset where the data ran out
        offset: usize,
        /// Description of the field being read
        expected: String,
    },

    /// Writing the raw output image failed
    #[error("Error writing binary disk image: {0}")]
    Write(#[source] std::io::Error),

    /// Expected track geometry is missing or out of range
    #[error("Invalid track geometry: {0}")]
    InvalidGeometry(String),
}

impl WdiError {
    /// Create a header error
    pub fn header<S: Into<String>>(message: S) -> Self {
        WdiError::HeaderInvalid(message.into())
    }

    /// Create an end-of-stream error with context
    pub fn eof<S: Into<String>>(offset: usize, expected: S) -> Self {
        WdiError::UnexpectedEof {
            offset,
            expected: expected.into(),
        }
    }

    /// Create an out-of-range field error
    pub fn out_of_range(offset: usize, field: &'static str, value: u32, max: u32) -> Self {
        WdiError::FieldOutOfRange {
            offset,
            field,
            value,
            max,
        }
    }

    /// Create a geometry error
    pub fn geometry<S: Into<String>>(message: S) -> Self {
        WdiError::InvalidGeometry(message.into())
    }

    /// Byte offset of a structural error, if it has one
    pub fn offset(&self) -> Option<usize> {
        match self {
            WdiError::FieldOutOfRange { offset, .. } | WdiError::UnexpectedEof { offset, .. } => {
                Some(*offset)
            }
            _ => None,
        }
    }
}
