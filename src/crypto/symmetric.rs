//! Password-based authenticated encryption.
//!
//! This module seals payloads into a self-describing envelope using:
//! - scrypt for key derivation (fresh salt per call)
//! - AES-256-GCM for authenticated encryption
//!
//! Envelope layout: salt (16) || nonce (12) || ciphertext || tag (16)

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use super::kdf::{derive_key, KdfError, SALT_SIZE};

/// Nonce size for AES-GCM.
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size appended by AES-GCM.
pub const TAG_SIZE: usize = 16;

/// Bytes an envelope adds on top of the plaintext.
pub const ENVELOPE_OVERHEAD: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE;

/// Errors that can occur during symmetric encryption.
#[derive(Error, Debug)]
pub enum SymmetricError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed: wrong password or corrupted data")]
    AuthenticationFailed,

    #[error("Invalid envelope: {len} bytes is shorter than the 44 byte minimum")]
    EnvelopeTooShort { len: usize },

    #[error("Key derivation failed: {0}")]
    KeyDerivation(#[from] KdfError),
}

/// Encrypts data under a password.
///
/// Every call derives a new salt and nonce, so sealing the same plaintext
/// twice produces unrelated envelopes.
pub fn seal(plaintext: &[u8], password: &str) -> Result<Vec<u8>, SymmetricError> {
    let derived = derive_key(password, None)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(derived.key())
        .map_err(|e| SymmetricError::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| SymmetricError::EncryptionFailed(e.to_string()))?;

    let mut envelope = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    envelope.extend_from_slice(derived.salt());
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ciphertext);

    Ok(envelope)
}

/// Decrypts an envelope produced by [`seal`].
///
/// Any tag mismatch, whether from a wrong password or a corrupted salt,
/// nonce, ciphertext or tag, is reported as
/// [`SymmetricError::AuthenticationFailed`].
pub fn open(envelope: &[u8], password: &str) -> Result<Vec<u8>, SymmetricError> {
    if envelope.len() < ENVELOPE_OVERHEAD {
        return Err(SymmetricError::EnvelopeTooShort { len: envelope.len() });
    }

    let (salt_bytes, rest) = envelope.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(salt_bytes);
    let derived = derive_key(password, Some(salt))?;

    let cipher = Aes256Gcm::new_from_slice(derived.key())
        .map_err(|e| SymmetricError::EncryptionFailed(e.to_string()))?;

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| SymmetricError::AuthenticationFailed)
}
