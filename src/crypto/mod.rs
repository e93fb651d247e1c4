//! Cryptographic operations for lsbvault.
//!
//! This module provides:
//! - Password-based key derivation (scrypt)
//! - Authenticated envelope encryption (AES-256-GCM)
//! - Payload compression (zlib)

pub mod compression;
pub mod kdf;
pub mod symmetric;

pub use compression::{compress, compression_ratio, decompress, CompressionError};
pub use kdf::{derive_key, generate_salt, DerivedKey, KdfError, KEY_SIZE, SALT_SIZE};
pub use symmetric::{open, seal, SymmetricError, ENVELOPE_OVERHEAD, NONCE_SIZE, TAG_SIZE};
