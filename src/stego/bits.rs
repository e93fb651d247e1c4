//! Bit packing shared by the LSB codecs.
//!
//! All codecs write payload bits most-significant-bit first.

/// End-of-data marker used by the sentinel-terminated codecs
/// (bit pattern `1111111111111110`).
pub const SENTINEL: [u8; 2] = [0xFF, 0xFE];

/// Sentinel length in bits.
pub const SENTINEL_BITS: usize = SENTINEL.len() * 8;

/// Iterates over the bits of `data`, MSB first.
pub fn bits_msb_first(data: &[u8]) -> impl Iterator<Item = u8> + '_ {
    data.iter()
        .flat_map(|byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
}

/// Collects bits (MSB first) into whole bytes.
#[derive(Debug, Default)]
pub struct ByteAssembler {
    current: u8,
    filled: u8,
    bytes: Vec<u8>,
}

impl ByteAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes one bit. Returns true when the push completed a byte.
    pub fn push_bit(&mut self, bit: u8) -> bool {
        self.current = (self.current << 1) | (bit & 1);
        self.filled += 1;

        if self.filled == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.filled = 0;
            true
        } else {
            false
        }
    }

    /// Pushes the low `count` bits of `value`, MSB first. Returns true if
    /// at least one byte was completed.
    pub fn push_bits(&mut self, value: u8, count: u8) -> bool {
        let mut completed = false;
        for shift in (0..count).rev() {
            completed |= self.push_bit((value >> shift) & 1);
        }
        completed
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Appends the sentinel to `data`.
pub fn with_sentinel(data: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(data.len() + SENTINEL.len());
    framed.extend_from_slice(data);
    framed.extend_from_slice(&SENTINEL);
    framed
}

/// True if the sentinel occurs byte-aligned inside `data`, which would end
/// extraction early.
pub fn contains_sentinel(data: &[u8]) -> bool {
    data.windows(SENTINEL.len()).any(|pair| pair == SENTINEL)
}

/// Reassembles bytes from a stream of LSBs until the first byte-aligned
/// sentinel. Returns `None` if the stream ends first.
pub fn read_until_sentinel<I>(lsbs: I) -> Option<Vec<u8>>
where
    I: IntoIterator<Item = u8>,
{
    let mut assembler = ByteAssembler::new();

    for bit in lsbs {
        if assembler.push_bit(bit) && assembler.bytes().ends_with(&SENTINEL) {
            let mut bytes = assembler.into_bytes();
            bytes.truncate(bytes.len() - SENTINEL.len());
            return Some(bytes);
        }
    }

    None
}
