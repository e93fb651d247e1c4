//! Payload decoding.
//!
//! The mirror of [`crate::encoder`]: extract the envelope from the carrier's
//! LSBs, open it with the password, then try to decompress. A payload that is
//! not a valid zlib stream is returned as-is.

use std::path::Path;

use tracing::debug;

use crate::analysis;
use crate::crypto::{decompress, open};
use crate::error::CodecError;
use crate::stego::{Carrier, MediaCodec};

/// Configuration for the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Must match the value used when encoding.
    pub bits_per_unit: u8,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { bits_per_unit: 1 }
    }
}

/// Result of decoding a carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeResult {
    pub payload: Vec<u8>,
    /// True when the opened envelope held a zlib stream.
    pub was_compressed: bool,
    pub security_score: f64,
    pub bits_per_unit: u8,
}

impl DecodeResult {
    /// The payload as UTF-8 text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Decodes the payload hidden in an in-memory carrier.
pub fn decode_carrier(
    carrier: &Carrier,
    password: &str,
    config: &DecoderConfig,
) -> Result<DecodeResult, CodecError> {
    let bits_per_unit = config.bits_per_unit;

    let envelope = carrier.extract(bits_per_unit)?;
    debug!(size = envelope.len(), "extracted envelope");

    let opened = open(&envelope, password)?;
    debug!(size = opened.len(), "opened envelope");

    let (payload, was_compressed) = match decompress(&opened) {
        Ok(payload) => {
            debug!(from = opened.len(), to = payload.len(), "decompressed payload");
            (payload, true)
        }
        Err(e) => {
            debug!(reason = %e, "payload is not compressed; using raw bytes");
            (opened, false)
        }
    };

    Ok(DecodeResult {
        payload,
        was_compressed,
        security_score: analysis::score(carrier),
        bits_per_unit,
    })
}

/// Decodes the payload hidden in the carrier file at `carrier_path`.
pub fn decode<P: AsRef<Path>>(
    carrier_path: P,
    password: &str,
    config: &DecoderConfig,
) -> Result<DecodeResult, CodecError> {
    let carrier_path = carrier_path.as_ref();

    let carrier = Carrier::from_file(carrier_path)?;
    debug!(path = %carrier_path.display(), kind = %carrier.kind(), "loaded carrier");

    decode_carrier(&carrier, password, config)
}
