//! Payload encoding.
//!
//! This module orchestrates the encoding process:
//! 1. Check the payload (plus safety margin) fits the carrier
//! 2. Compress the payload (optional, zlib)
//! 3. Seal it into a password-protected envelope (scrypt + AES-256-GCM),
//!    resealing if a sentinel-terminated carrier could not frame it
//! 4. Embed the envelope into the carrier's LSBs
//! 5. Write the stego carrier and score it

use std::path::Path;

use tracing::debug;

use crate::analysis;
use crate::capacity::capacity_used_percent;
use crate::crypto::{compress, compression_ratio, seal, SymmetricError};
use crate::error::CodecError;
use crate::stego::bits::contains_sentinel;
use crate::stego::{check_output_kind, Carrier, CarrierKind, MediaCodec, Terminator};

/// Reseal budget for sentinel-terminated carriers. Each attempt draws a fresh
/// salt and nonce, so a collision repeats with probability about `len / 65536`.
const MAX_SEAL_ATTEMPTS: usize = 32;

/// Configuration for the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Low bits used per carrier sample (1-4 for images, 1 for audio and video).
    pub bits_per_unit: u8,
    /// Whether to zlib-compress the payload before sealing.
    pub use_compression: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            bits_per_unit: 1,
            use_compression: true,
        }
    }
}

/// Result of encoding a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeResult {
    pub original_size: usize,
    /// Size after the compression stage (equals `original_size` when skipped).
    pub compressed_size: usize,
    /// Size of the sealed envelope that was embedded.
    pub sealed_size: usize,
    pub compression_ratio: f64,
    pub capacity_used_percent: f64,
    pub security_score: f64,
    pub bits_per_unit: u8,
    pub compression_used: bool,
}

/// Encodes `payload` into an in-memory carrier.
///
/// Returns the stego carrier and the encode statistics. The input carrier is
/// left untouched.
pub fn encode_carrier(
    carrier: &Carrier,
    payload: &[u8],
    password: &str,
    config: &EncoderConfig,
) -> Result<(Carrier, EncodeResult), CodecError> {
    let bits_per_unit = config.bits_per_unit;

    // Step 1: capacity check before any work
    let report = carrier.capacity(bits_per_unit)?;
    report.ensure_fits(payload.len())?;
    debug!(
        kind = %report.kind,
        capacity = report.capacity_bytes,
        payload = payload.len(),
        "capacity check passed"
    );

    // Step 2: compression
    let compressed = if config.use_compression {
        let compressed = compress(payload)?;
        debug!(from = payload.len(), to = compressed.len(), "compressed payload");
        Some(compressed)
    } else {
        None
    };
    let body = compressed.as_deref().unwrap_or(payload);

    // Step 3: sealing
    let envelope = seal_for_terminator(carrier.terminator(), || seal(body, password))?;
    debug!(size = envelope.len(), "sealed envelope");

    // Step 4: embedding
    let stego = carrier.hide(&envelope, bits_per_unit)?;
    debug!(terminator = ?stego.terminator(), "embedded envelope");

    let result = EncodeResult {
        original_size: payload.len(),
        compressed_size: body.len(),
        sealed_size: envelope.len(),
        compression_ratio: compression_ratio(payload.len(), body.len()),
        capacity_used_percent: capacity_used_percent(envelope.len(), report.capacity_bytes),
        security_score: analysis::score(&stego),
        bits_per_unit,
        compression_used: config.use_compression,
    };

    Ok((stego, result))
}

/// Seals until the envelope can be framed by `terminator`.
///
/// A sentinel-terminated envelope must not contain the sentinel byte-aligned,
/// otherwise extraction would stop inside the ciphertext.
fn seal_for_terminator<F>(terminator: Terminator, mut seal_once: F) -> Result<Vec<u8>, CodecError>
where
    F: FnMut() -> Result<Vec<u8>, SymmetricError>,
{
    if terminator == Terminator::LengthPrefixed {
        return Ok(seal_once()?);
    }

    for attempt in 1..=MAX_SEAL_ATTEMPTS {
        let envelope = seal_once()?;
        if !contains_sentinel(&envelope) {
            return Ok(envelope);
        }
        debug!(attempt, "envelope contains the sentinel, resealing");
    }

    Err(CodecError::SentinelCollision {
        attempts: MAX_SEAL_ATTEMPTS,
    })
}

/// Encodes `payload` into the carrier at `carrier_path` and writes the stego
/// carrier to `output_path`.
///
/// Nothing is written unless embedding succeeds.
pub fn encode<P: AsRef<Path>, Q: AsRef<Path>>(
    carrier_path: P,
    payload: &[u8],
    password: &str,
    output_path: Q,
    config: &EncoderConfig,
) -> Result<EncodeResult, CodecError> {
    let carrier_path = carrier_path.as_ref();
    let output_path = output_path.as_ref();

    // The output must be the same medium as the carrier.
    check_output_kind(output_path, CarrierKind::from_path(carrier_path)?)?;

    let carrier = Carrier::from_file(carrier_path)?;
    debug!(path = %carrier_path.display(), kind = %carrier.kind(), "loaded carrier");

    let (stego, result) = encode_carrier(&carrier, payload, password, config)?;

    stego.save(output_path)?;
    debug!(path = %output_path.display(), "wrote stego carrier");

    Ok(result)
}
