//! Error types for the miner core
//!
//! This module provides the crate-wide error taxonomy using `thiserror`
//! for automatic error trait implementations. Every variant carries enough
//! context (type tag, expected vs. actual byte, field name) to be
//! actionable without re-decoding the offending input. None of these are
//! retried inside the core; retry policy belongs to the I/O layers above.

use thiserror::Error;

/// Main error type for the miner core
#[derive(Error, Debug)]
pub enum Error {
    /// Frame is shorter than the minimal envelope for its type
    #[error("truncated frame: need at least {expected} bytes, got {actual}")]
    TruncatedFrame {
        /// Minimal frame length for the packet type
        expected: usize,
        /// Actual frame length received
        actual: usize,
    },

    /// Preamble bytes do not match the protocol constant
    #[error("bad preamble byte at offset {offset}: expected {expected:#04x}, got {actual:#04x}")]
    BadPreamble {
        /// Offset of the mismatching byte within the frame
        offset: usize,
        /// Expected preamble byte
        expected: u8,
        /// Byte actually present
        actual: u8,
    },

    /// Finalizer bytes do not match the protocol constant
    #[error("bad finalizer byte at offset {offset}: expected {expected:#04x}, got {actual:#04x}")]
    BadFinalizer {
        /// Offset of the mismatching byte, counted from the frame end
        offset: usize,
        /// Expected finalizer byte
        expected: u8,
        /// Byte actually present
        actual: u8,
    },

    /// Type byte does not match the decoder's packet type
    #[error("packet type mismatch: expected {expected:#04x}, got {actual:#04x}")]
    TypeMismatch {
        /// Type tag the decoder handles
        expected: u8,
        /// Type tag found in the frame
        actual: u8,
    },

    /// Version byte does not match the protocol version
    #[error("packet version mismatch: expected {expected:#04x}, got {actual:#04x}")]
    VersionMismatch {
        /// Supported protocol version
        expected: u8,
        /// Version found in the frame
        actual: u8,
    },

    /// Dispatch found no decoder for the type tag
    #[error("unknown packet type {tag:#04x} in frame {}", hex::encode(frame))]
    UnknownPacketType {
        /// The unrecognized type tag
        tag: u8,
        /// Raw frame, kept for diagnostics
        frame: Vec<u8>,
    },

    /// Operation is not supported for this packet or variant
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A field or buffer has the wrong fixed width
    #[error("invalid length for {field}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Name of the field or buffer
        field: &'static str,
        /// Mandated width in bytes
        expected: usize,
        /// Width actually supplied
        actual: usize,
    },

    /// Hex decoding failed
    #[error("invalid hex in {field}: {source}")]
    Hex {
        /// Name of the field being decoded
        field: &'static str,
        /// Underlying hex error
        source: hex::FromHexError,
    },

    /// Difficulty of zero would divide by zero
    #[error("difficulty must be positive")]
    ZeroDifficulty,
}

/// Result type alias for the miner core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an unsupported-operation error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create an invalid-length error for a named field
    pub fn invalid_length(field: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            field,
            expected,
            actual,
        }
    }

    /// Create a hex-decoding error for a named field
    pub fn hex(field: &'static str, source: hex::FromHexError) -> Self {
        Self::Hex { field, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_length("previous_hash", 32, 31);
        assert_eq!(
            err.to_string(),
            "invalid length for previous_hash: expected 32 bytes, got 31"
        );

        let err = Error::TypeMismatch {
            expected: 0x52,
            actual: 0x51,
        };
        assert_eq!(
            err.to_string(),
            "packet type mismatch: expected 0x52, got 0x51"
        );
    }

    #[test]
    fn test_unknown_type_carries_frame() {
        let err = Error::UnknownPacketType {
            tag: 0x99,
            frame: vec![0xA5, 0x3C, 0x96, 0x99],
        };
        let msg = err.to_string();
        assert!(msg.contains("0x99"));
        assert!(msg.contains("a53c9699"));
    }
}
