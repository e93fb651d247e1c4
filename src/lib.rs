//! # lsbvault - password-sealed LSB steganography
//!
//! lsbvault hides an arbitrary payload in the least significant bits of a
//! still image, a 16-bit PCM WAV file or a raw YUV4MPEG2 video.
//!
//! ## Overview
//!
//! Encoding runs a fixed pipeline:
//! - The payload is optionally **compressed** (zlib)
//! - It is **sealed** with a password: scrypt derives a key from a fresh
//!   random salt, AES-256-GCM encrypts and authenticates
//! - The envelope (`salt || nonce || ciphertext || tag`) is **embedded** in
//!   the carrier's LSBs
//! - The output carrier is **scored** for statistical stealth
//!
//! Decoding extracts the envelope, opens it, and decompresses when the
//! payload turns out to be a zlib stream.
//!
//! ## Security Model
//!
//! - **Password-only**: nothing but the password is needed to decode
//! - **Authenticated**: a wrong password or any flipped bit is reported as
//!   [`CodecError::AuthenticationFailure`], never as garbage plaintext
//! - **Fresh salt and nonce** per encode, so keys are never reused
//!
//! ## Example Usage
//!
//! ```no_run
//! use lsbvault::{decode, encode, DecoderConfig, EncoderConfig};
//!
//! let stats = encode(
//!     "cover.png",
//!     b"meet at dawn",
//!     "hunter2",
//!     "stego.png",
//!     &EncoderConfig::default(),
//! )?;
//! println!("used {}% of capacity", stats.capacity_used_percent);
//!
//! let decoded = decode("stego.png", "hunter2", &DecoderConfig::default())?;
//! assert_eq!(decoded.payload, b"meet at dawn");
//! # Ok::<(), lsbvault::CodecError>(())
//! ```
//!
//! ## Modules
//!
//! - [`crypto`]: Key derivation, envelope sealing, compression
//! - [`stego`]: LSB codecs for images, audio and video
//! - [`capacity`]: How much a carrier can hold
//! - [`analysis`]: Stealth score and image comparison
//! - [`encoder`] / [`decoder`]: The two pipelines

pub mod analysis;
pub mod capacity;
pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod stego;

// Re-export commonly used types at the crate root
pub use analysis::{
    compare_images, security_analysis, ImageComparison, SecurityAnalysis, SecurityLevel,
    Visibility,
};
pub use capacity::{capacity, CapacityReport};
pub use decoder::{decode, decode_carrier, DecodeResult, DecoderConfig};
pub use encoder::{encode, encode_carrier, EncodeResult, EncoderConfig};
pub use error::CodecError;
pub use stego::{Carrier, CarrierKind, MediaCodec, Terminator};
