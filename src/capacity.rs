//! Capacity model: how many payload bytes a carrier can hold.
//!
//! - Image: `width * height * channels * bits - 32` usable bits (32 bits
//!   hold the length header)
//! - Audio: one bit per sample per channel
//! - Video: one bit per color byte per pixel per frame
//!
//! An encode needs `payload + 100` bytes of capacity; the margin covers the
//! envelope and header overhead.

use std::fmt;
use std::path::Path;

use crate::error::CodecError;
use crate::stego::{Carrier, CarrierKind, MediaCodec};

/// Bits reserved for the image length header.
pub const LENGTH_HEADER_BITS: usize = 32;

/// Bytes reserved on top of the payload for envelope and header overhead.
pub const SAFETY_MARGIN: usize = 100;

/// Derived capacity of a carrier at a given bit depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityReport {
    pub kind: CarrierKind,
    /// Frame width in pixels (image and video).
    pub width: Option<u32>,
    /// Frame height in pixels (image and video).
    pub height: Option<u32>,
    /// Number of frames: 1 for images, sample frames for audio, video frames.
    pub frames: usize,
    /// Channels used for embedding (alpha never counts).
    pub channels: usize,
    pub bits_per_unit: u8,
    pub total_bits: usize,
    pub usable_bits: usize,
    pub capacity_bytes: usize,
}

impl CapacityReport {
    pub fn image(width: u32, height: u32, channels: usize, bits_per_unit: u8) -> Self {
        let total_bits = width as usize * height as usize * channels * bits_per_unit as usize;
        let usable_bits = total_bits.saturating_sub(LENGTH_HEADER_BITS);
        Self {
            kind: CarrierKind::Image,
            width: Some(width),
            height: Some(height),
            frames: 1,
            channels,
            bits_per_unit,
            total_bits,
            usable_bits,
            capacity_bytes: usable_bits / 8,
        }
    }

    pub fn audio(frames: usize, channels: usize) -> Self {
        let total_bits = frames * channels;
        Self {
            kind: CarrierKind::Audio,
            width: None,
            height: None,
            frames,
            channels,
            bits_per_unit: 1,
            total_bits,
            usable_bits: total_bits,
            capacity_bytes: total_bits / 8,
        }
    }

    pub fn video(frame_count: usize, width: u32, height: u32) -> Self {
        let total_bits = frame_count * width as usize * height as usize * 3;
        Self {
            kind: CarrierKind::Video,
            width: Some(width),
            height: Some(height),
            frames: frame_count,
            channels: 3,
            bits_per_unit: 1,
            total_bits,
            usable_bits: total_bits,
            capacity_bytes: total_bits / 8,
        }
    }

    pub fn capacity_kb(&self) -> usize {
        self.capacity_bytes / 1024
    }

    /// Fails with [`CodecError::CapacityExceeded`] if a payload of
    /// `payload_len` bytes plus the safety margin does not fit.
    pub fn ensure_fits(&self, payload_len: usize) -> Result<(), CodecError> {
        let required = required_space(payload_len);
        if required > self.capacity_bytes {
            return Err(CodecError::CapacityExceeded {
                required,
                capacity: self.capacity_bytes,
            });
        }
        Ok(())
    }
}

impl fmt::Display for CapacityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Capacity: {} bytes ({} KB) using {} LSB bit(s)",
            self.capacity_bytes,
            self.capacity_kb(),
            self.bits_per_unit
        )
    }
}

/// Space an encode of `payload_len` bytes requires.
pub fn required_space(payload_len: usize) -> usize {
    payload_len.saturating_add(SAFETY_MARGIN)
}

/// Share of the capacity taken by an embedded envelope, in percent,
/// rounded to one decimal.
pub fn capacity_used_percent(embedded_len: usize, capacity_bytes: usize) -> f64 {
    if capacity_bytes == 0 {
        return 100.0;
    }
    let percent = embedded_len as f64 / capacity_bytes as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

/// Computes the capacity of the carrier file at `path`.
pub fn capacity<P: AsRef<Path>>(path: P, bits_per_unit: u8) -> Result<CapacityReport, CodecError> {
    let carrier = Carrier::from_file(path)?;
    Ok(carrier.capacity(bits_per_unit)?)
}
