use crate::error::{Error, Result};

/// Bit width used by the addition task.
pub const DEFAULT_WIDTH: usize = 8;

const MAX_WIDTH: usize = 32;

/// Fixed-width integer <-> bit vector conversion.
///
/// Bit vectors are in natural order: index 0 is the most significant bit,
/// so `decode(bits) = Σ bits[i] · 2^(width-1-i)`. Use [`reversed`] to get the
/// least-significant-bit-first order the recurrent model consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryCodec {
    width: usize,
}

impl BinaryCodec {
    pub fn new(width: usize) -> Result<BinaryCodec> {
        if width == 0 || width > MAX_WIDTH {
            return Err(Error::InvalidWidth(width));
        }
        Ok(BinaryCodec { width })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of representable values, `2^width`.
    pub fn capacity(&self) -> u64 {
        1u64 << self.width
    }

    pub fn max_value(&self) -> u64 {
        self.capacity() - 1
    }

    pub fn encode(&self, n: u64) -> Result<Vec<u8>> {
        if n >= self.capacity() {
            return Err(Error::ValueOutOfRange { value: n, width: self.width });
        }
        Ok(self.encode_masked(n))
    }

    /// Encodes the low `width` bits of `n` without a range check.
    /// Callers must already know that `n < 2^width`.
    pub(crate) fn encode_masked(&self, n: u64) -> Vec<u8> {
        (0..self.width)
            .rev()
            .map(|shift| ((n >> shift) & 1) as u8)
            .collect()
    }

    /// Decodes a natural-order bit vector. Non-zero entries count as 1.
    pub fn decode(&self, bits: &[u8]) -> u64 {
        bits.iter()
            .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit != 0))
    }
}

impl Default for BinaryCodec {
    fn default() -> Self {
        BinaryCodec { width: DEFAULT_WIDTH }
    }
}

/// Flips between natural (MSB-first) and LSB-first order.
pub fn reversed(bits: &[u8]) -> Vec<u8> {
    bits.iter().rev().copied().collect()
}
