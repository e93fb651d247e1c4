//! Payload compression.
//!
//! Uses zlib (DEFLATE with a zlib header and Adler-32 trailer) so that a
//! decoder can tell a compressed payload from a raw one by attempting to
//! decompress it. No marker byte is stored.

use flate2::read::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;
use std::io::Read;
use thiserror::Error;

/// Compression errors.
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("Decompression failed: {0} trailing bytes after zlib stream")]
    TrailingData(usize),
}

/// Compresses data into a zlib stream at the default level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = ZlibEncoder::new(data, Compression::default());
    let mut compressed = Vec::new();

    encoder
        .read_to_end(&mut compressed)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?;

    Ok(compressed)
}

/// Decompresses a zlib stream produced by [`compress`].
///
/// The whole input must be one complete stream with a valid checksum.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();

    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| CompressionError::DecompressionFailed(e.to_string()))?;

    let consumed = decoder.total_in() as usize;
    if consumed < data.len() {
        return Err(CompressionError::TrailingData(data.len() - consumed));
    }

    Ok(decompressed)
}

/// Returns compression ratio (original_size / compressed_size).
/// Values > 1.0 mean compression helped.
pub fn compression_ratio(original_len: usize, compressed_len: usize) -> f64 {
    if original_len == 0 || compressed_len == 0 {
        return 1.0;
    }
    original_len as f64 / compressed_len as f64
}
