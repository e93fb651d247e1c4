//! Error taxonomy returned by the encode/decode pipelines.
//!
//! Each stage has its own error type; they are folded into [`CodecError`]
//! so callers can tell a wrong password from an empty carrier from a
//! carrier that is too small.

use thiserror::Error;

use crate::crypto::{CompressionError, SymmetricError};
use crate::stego::StegoError;

/// Errors surfaced by the public pipeline entry points.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Payload too large for carrier: need {required} bytes, capacity is {capacity} bytes")]
    CapacityExceeded { required: usize, capacity: usize },

    #[error("Authentication failed: incorrect password or corrupted data")]
    AuthenticationFailure,

    #[error("No hidden data found in carrier")]
    NoHiddenDataFound,

    #[error("Unsupported carrier format: {0}")]
    UnsupportedCarrierFormat(String),

    #[error("Invalid bits per unit {bits}: {reason}")]
    InvalidBitsPerUnit { bits: u8, reason: &'static str },

    #[error("IO error: {0}")]
    Io(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Compression error: {0}")]
    Compression(String),

    /// Every sealed envelope contained the end-of-data sentinel, so a
    /// sentinel-terminated carrier could not hold it intact.
    #[error("Envelope kept colliding with the end-of-data sentinel after {attempts} attempts")]
    SentinelCollision { attempts: usize },
}

impl From<StegoError> for CodecError {
    fn from(err: StegoError) -> Self {
        match err {
            StegoError::CapacityExceeded {
                needed_bits,
                available_bits,
            } => CodecError::CapacityExceeded {
                required: needed_bits.div_ceil(8),
                capacity: available_bits / 8,
            },
            StegoError::NoHiddenData => CodecError::NoHiddenDataFound,
            StegoError::UnsupportedChannelLayout(msg)
            | StegoError::UnsupportedFormat(msg)
            | StegoError::LoadError(msg) => CodecError::UnsupportedCarrierFormat(msg),
            StegoError::InvalidBitsPerUnit { bits, reason } => {
                CodecError::InvalidBitsPerUnit { bits, reason }
            }
            StegoError::SaveError(msg) => CodecError::Io(msg),
            StegoError::IoError(e) => CodecError::Io(e.to_string()),
        }
    }
}

impl From<SymmetricError> for CodecError {
    fn from(err: SymmetricError) -> Self {
        match err {
            SymmetricError::AuthenticationFailed => CodecError::AuthenticationFailure,
            // Anything shorter than salt + nonce + tag cannot be an envelope.
            SymmetricError::EnvelopeTooShort { .. } => CodecError::NoHiddenDataFound,
            other => CodecError::Encryption(other.to_string()),
        }
    }
}

impl From<CompressionError> for CodecError {
    fn from(err: CompressionError) -> Self {
        CodecError::Compression(err.to_string())
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::Io(err.to_string())
    }
}
