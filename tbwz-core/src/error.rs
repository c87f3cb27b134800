//! Error types for tbwz operations.
//!
//! A single error enum covers the whole stack: header framing, block
//! dispatch, transform validation, second-stage codec failures and I/O.

use std::io;
use thiserror::Error;

/// The main error type for tbwz operations.
#[derive(Debug, Error)]
pub enum TbwzError {
    /// I/O error from an underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Block-offset header is truncated or not strictly increasing.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header defect.
        message: String,
    },

    /// A block decoder consumed fewer or more bytes than its declared end.
    #[error("Block decode mismatch: consumed {consumed} bytes of a {expected}-byte block")]
    BlockDecodeMismatch {
        /// Bytes actually consumed by the block decoder.
        consumed: usize,
        /// Declared block payload size.
        expected: usize,
    },

    /// A size, index or alphabet is out of its allowed range.
    #[error("Invalid argument: {message}")]
    InvalidArg {
        /// Description of the offending value.
        message: String,
    },

    /// The tunneling aux structure is inconsistent with the tunneled BWT.
    #[error("Invalid aux structure: {message}")]
    InvalidAux {
        /// Description of the inconsistency.
        message: String,
    },

    /// The second-stage codec hit exhausted or corrupt input.
    #[error("Codec failure: {message}")]
    CodecFailure {
        /// Description of the failure.
        message: String,
    },
}

/// Result type alias for tbwz operations.
pub type Result<T> = std::result::Result<T, TbwzError>;

impl TbwzError {
    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a block decode mismatch error.
    pub fn block_decode_mismatch(consumed: usize, expected: usize) -> Self {
        Self::BlockDecodeMismatch { consumed, expected }
    }

    /// Create an invalid argument error.
    pub fn invalid_arg(message: impl Into<String>) -> Self {
        Self::InvalidArg {
            message: message.into(),
        }
    }

    /// Create an invalid aux error.
    pub fn invalid_aux(message: impl Into<String>) -> Self {
        Self::InvalidAux {
            message: message.into(),
        }
    }

    /// Create a codec failure error.
    pub fn codec_failure(message: impl Into<String>) -> Self {
        Self::CodecFailure {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TbwzError::invalid_header("offset 3 not increasing");
        assert!(err.to_string().contains("Invalid header"));

        let err = TbwzError::block_decode_mismatch(10, 12);
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("12"));

        let err = TbwzError::invalid_aux("terminator missing");
        assert!(err.to_string().contains("terminator missing"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "short read");
        let err: TbwzError = io_err.into();
        assert!(matches!(err, TbwzError::Io(_)));
    }
}
