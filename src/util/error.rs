//! Error types for the PRC encoder.

use thiserror::Error;

/// Main error type for PRC serialization.
#[derive(Error, Debug)]
pub enum Error {
    /// Reader ran past the last written bit
    #[error("Unexpected end of bit-stream at bit {0}")]
    UnexpectedEof(u64),

    /// Value does not fit in an explicit-width field
    #[error("Value {value} does not fit in {bits} bits")]
    BitWidthOverflow { value: u64, bits: u32 },

    /// Entity violates a structural precondition of its layout
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    /// Representation item points at a body that does not exist
    #[error("Dangling body reference: context {context}, body {body}")]
    DanglingReference { context: u32, body: u32 },

    /// Patch cannot be expressed by the compressed NURBS encoding
    #[error("Unsupported compressed patch: {0}")]
    UnsupportedPatch(String),

    /// Session configuration is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Decoder found data it cannot interpret
    #[error("Invalid bit-stream: {0}")]
    InvalidStream(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid entity error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidEntity(msg.into())
    }

    /// Create an invalid stream error.
    pub fn stream(msg: impl Into<String>) -> Self {
        Self::InvalidStream(msg.into())
    }
}

/// Result type alias for PRC operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::BitWidthOverflow { value: 9, bits: 3 };
        assert!(e.to_string().contains("9"));
        assert!(e.to_string().contains("3 bits"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
