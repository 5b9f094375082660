//! Finished bit buffers with an explicit logical length.

use std::fmt;

use crate::error::{BitError, BitResult};
use crate::reader::BitReader;

/// An immutable sequence of bits.
///
/// The bytes are zero-padded to a whole byte; `bit_len` records how many of
/// those bits are meaningful. Bits past `bit_len` are always zero, so two
/// buffers with the same logical bits compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitBuffer {
    /// Wraps whole bytes; every bit is logical.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let bit_len = bytes.len() * 8;
        Self { bytes, bit_len }
    }

    /// Builds a buffer from bytes and a logical bit length.
    ///
    /// The length is clamped to the bytes provided, surplus bytes are dropped
    /// and bits past the logical end are cleared.
    #[must_use]
    pub fn from_raw_parts(mut bytes: Vec<u8>, bit_len: usize) -> Self {
        let bit_len = bit_len.min(bytes.len() * 8);
        bytes.truncate(bit_len.div_ceil(8));
        let tail = bit_len % 8;
        if tail != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFF << (8 - tail);
            }
        }
        Self { bytes, bit_len }
    }

    /// Parses a string of `'0'` and `'1'` characters.
    pub fn from_bit_str(bits: &str) -> BitResult<Self> {
        let mut bytes = Vec::with_capacity(bits.len().div_ceil(8));
        let mut current = 0u8;
        let mut bit_len = 0usize;
        for (position, ch) in bits.chars().enumerate() {
            let bit = match ch {
                '0' => 0,
                '1' => 1,
                _ => return Err(BitError::InvalidBitChar { ch, position }),
            };
            current = (current << 1) | bit;
            bit_len += 1;
            if bit_len % 8 == 0 {
                bytes.push(current);
                current = 0;
            }
        }
        let tail = bit_len % 8;
        if tail != 0 {
            bytes.push(current << (8 - tail));
        }
        Ok(Self { bytes, bit_len })
    }

    /// Returns the logical length in bits.
    #[must_use]
    pub const fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Returns `true` if the buffer holds no bits.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Returns the zero-padded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the buffer, returning the zero-padded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the bit at `idx`, or `None` past the logical end.
    #[must_use]
    pub fn bit(&self, idx: usize) -> Option<bool> {
        if idx >= self.bit_len {
            return None;
        }
        let byte = self.bytes.get(idx / 8)?;
        Some((byte >> (7 - idx % 8)) & 1 == 1)
    }

    /// Returns a reader bounded by the logical length.
    #[must_use]
    pub fn reader(&self) -> BitReader<'_> {
        BitReader::with_bit_len(&self.bytes, self.bit_len)
    }

    /// Renders the logical bits as a string of `'0'` and `'1'`.
    #[must_use]
    pub fn to_bit_string(&self) -> String {
        (0..self.bit_len)
            .map(|idx| if self.bit(idx) == Some(true) { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}
