//! Password-based key derivation for the envelope cipher.
//!
//! Keys are derived with scrypt using fixed, public work factors so that any
//! two implementations agree on the key for a given `(password, salt)` pair
//! without exchanging parameters.

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

/// Salt size in bytes.
pub const SALT_SIZE: usize = 16;

/// Derived key size in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// scrypt cost parameter as a power of two (N = 2^14).
pub const SCRYPT_LOG_N: u8 = 14;

/// scrypt block size parameter.
pub const SCRYPT_R: u32 = 8;

/// scrypt parallelization parameter.
pub const SCRYPT_P: u32 = 1;

/// Errors that can occur during key derivation.
#[derive(Error, Debug)]
pub enum KdfError {
    #[error("Invalid scrypt parameters: {0}")]
    InvalidParams(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),
}

/// A derived key together with the salt it was derived from.
pub struct DerivedKey {
    key: Zeroizing<[u8; KEY_SIZE]>,
    salt: [u8; SALT_SIZE],
}

impl DerivedKey {
    /// Returns the raw key bytes.
    pub fn key(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// Returns the salt used for this key.
    pub fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }
}

/// Generates a fresh random salt from the OS CSPRNG.
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derives a 256-bit key from a password.
///
/// When `salt` is `None` a fresh random salt is generated. The same
/// `(password, salt)` pair always yields the same key.
pub fn derive_key(password: &str, salt: Option<[u8; SALT_SIZE]>) -> Result<DerivedKey, KdfError> {
    let salt = salt.unwrap_or_else(generate_salt);

    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_SIZE)
        .map_err(|e| KdfError::InvalidParams(e.to_string()))?;

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    scrypt::scrypt(password.as_bytes(), &salt, &params, &mut key[..])
        .map_err(|e| KdfError::DerivationFailed(e.to_string()))?;

    Ok(DerivedKey { key, salt })
}
