//! Error type shared by the image, audio and video codecs.

use thiserror::Error;

/// Errors that can occur while embedding into or extracting from a carrier.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Carrier too small to hide data: need {needed_bits} bits, have {available_bits}")]
    CapacityExceeded {
        needed_bits: usize,
        available_bits: usize,
    },

    #[error("No hidden data found in carrier")]
    NoHiddenData,

    #[error("Unsupported channel layout: {0}")]
    UnsupportedChannelLayout(String),

    #[error("Unsupported carrier format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid bits per unit {bits}: {reason}")]
    InvalidBitsPerUnit { bits: u8, reason: &'static str },

    #[error("Carrier load error: {0}")]
    LoadError(String),

    #[error("Carrier save error: {0}")]
    SaveError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
