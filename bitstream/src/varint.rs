//! Variable-length integers packed into 6-bit groups.
//!
//! Each group is five data bits followed by a continuation bit, written
//! most-significant-bit first. Groups are emitted low-order first. Values are
//! bounded by [`MAX_SAFE_INTEGER`] so that every encoded number survives a
//! round trip through an IEEE-754 double.

use crate::error::{BitError, BitResult};
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Width of one varint group in bits.
pub const VARINT_GROUP_BITS: u8 = 6;

/// Data bits carried by each group.
pub const VARINT_DATA_BITS: u8 = 5;

/// Largest integer a varint may carry (`2^53 - 1`).
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Longest group chain that can stay within [`MAX_SAFE_INTEGER`].
pub const MAX_VARINT_GROUPS: usize = 11;

const DATA_MASK: u64 = (1 << VARINT_DATA_BITS) - 1;

/// Maps a signed integer onto the naturals: `n >= 0` to `2n`, `n < 0` to `-2n - 1`.
///
/// Returns `None` when the mapped value would exceed [`MAX_SAFE_INTEGER`].
#[must_use]
pub const fn zigzag_encode(value: i64) -> Option<u64> {
    if value.unsigned_abs() > MAX_SAFE_INTEGER / 2 + 1 {
        return None;
    }
    let mapped = ((value << 1) ^ (value >> 63)) as u64;
    if mapped > MAX_SAFE_INTEGER {
        return None;
    }
    Some(mapped)
}

/// Inverse of [`zigzag_encode`].
#[must_use]
pub const fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Number of groups needed to encode `value`.
#[must_use]
pub const fn varint_groups(value: u64) -> usize {
    let significant = 64 - value.leading_zeros() as usize;
    if significant == 0 {
        1
    } else {
        significant.div_ceil(VARINT_DATA_BITS as usize)
    }
}

/// Number of bits needed to encode `value` as an unsigned varint.
#[must_use]
pub const fn varint_bits(value: u64) -> usize {
    varint_groups(value) * VARINT_GROUP_BITS as usize
}

impl BitWriter {
    /// Writes an unsigned varint.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::IntegerRange`] if `value > MAX_SAFE_INTEGER`.
    pub fn write_varint(&mut self, value: u64) -> BitResult<()> {
        if value > MAX_SAFE_INTEGER {
            return Err(BitError::IntegerRange {
                groups: varint_groups(value),
            });
        }
        let mut rest = value;
        loop {
            let data = rest & DATA_MASK;
            rest >>= VARINT_DATA_BITS;
            let more = rest != 0;
            self.write_bits((data << 1) | u64::from(more), VARINT_GROUP_BITS)?;
            if !more {
                return Ok(());
            }
        }
    }

    /// Writes a zig-zag mapped signed varint.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::IntegerRange`] if the mapped value exceeds
    /// `MAX_SAFE_INTEGER`, i.e. outside `-2^52..2^52`.
    pub fn write_svarint(&mut self, value: i64) -> BitResult<()> {
        let mapped = zigzag_encode(value).ok_or(BitError::IntegerRange {
            groups: MAX_VARINT_GROUPS + 1,
        })?;
        self.write_varint(mapped)
    }
}

impl BitReader<'_> {
    /// Reads an unsigned varint.
    pub fn read_varint(&mut self) -> BitResult<u64> {
        let mut value = 0u64;
        for group in 0..MAX_VARINT_GROUPS {
            let raw = self.read_bits(VARINT_GROUP_BITS)?;
            value |= (raw >> 1) << (group * VARINT_DATA_BITS as usize);
            if value > MAX_SAFE_INTEGER {
                return Err(BitError::IntegerRange { groups: group + 1 });
            }
            if raw & 1 == 0 {
                return Ok(value);
            }
        }
        Err(BitError::IntegerRange {
            groups: MAX_VARINT_GROUPS + 1,
        })
    }

    /// Reads a zig-zag mapped signed varint.
    pub fn read_svarint(&mut self) -> BitResult<i64> {
        self.read_varint().map(zigzag_decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitBuffer;

    fn read_unsigned(bits: &str) -> BitResult<u64> {
        let buffer = BitBuffer::from_bit_str(bits).unwrap();
        buffer.reader().read_varint()
    }

    fn read_signed(bits: &str) -> BitResult<i64> {
        let buffer = BitBuffer::from_bit_str(bits).unwrap();
        buffer.reader().read_svarint()
    }

    fn write_unsigned(value: u64) -> String {
        let mut writer = BitWriter::new();
        writer.write_varint(value).unwrap();
        writer.finish().to_bit_string()
    }

    #[test]
    fn unsigned_fixtures() {
        assert_eq!(read_unsigned("000000").unwrap(), 0);
        assert_eq!(read_unsigned("000010").unwrap(), 1);
        assert_eq!(read_unsigned("000001000010").unwrap(), 32);
    }

    #[test]
    fn signed_fixtures() {
        assert_eq!(read_signed("111110").unwrap(), -16);
        assert_eq!(read_signed("000100").unwrap(), 1);
    }

    #[test]
    fn writer_matches_fixtures() {
        assert_eq!(write_unsigned(0), "000000");
        assert_eq!(write_unsigned(1), "000010");
        assert_eq!(write_unsigned(32), "000001000010");
        assert_eq!(write_unsigned(31), "111110");
    }

    #[test]
    fn zigzag_mapping() {
        assert_eq!(zigzag_encode(0), Some(0));
        assert_eq!(zigzag_encode(-1), Some(1));
        assert_eq!(zigzag_encode(1), Some(2));
        assert_eq!(zigzag_encode(-16), Some(31));
        assert_eq!(zigzag_decode(31), -16);
        assert_eq!(zigzag_decode(2), 1);
    }

    #[test]
    fn zigzag_safe_range_edges() {
        let min = -(1i64 << 52);
        let max = (1i64 << 52) - 1;
        assert_eq!(zigzag_encode(min), Some(MAX_SAFE_INTEGER));
        assert_eq!(zigzag_encode(max), Some(MAX_SAFE_INTEGER - 1));
        assert_eq!(zigzag_encode(max + 1), None);
        assert_eq!(zigzag_encode(min - 1), None);
        assert_eq!(zigzag_encode(i64::MIN), None);
        assert_eq!(zigzag_encode(i64::MAX), None);
    }

    #[test]
    fn max_safe_integer_roundtrip() {
        let mut writer = BitWriter::new();
        writer.write_varint(MAX_SAFE_INTEGER).unwrap();
        let buffer = writer.finish();
        assert_eq!(buffer.bit_len(), MAX_VARINT_GROUPS * 6);
        let mut reader = buffer.reader();
        assert_eq!(reader.read_varint().unwrap(), MAX_SAFE_INTEGER);
        assert!(reader.ended());
    }

    #[test]
    fn write_rejects_unsafe_integer() {
        let mut writer = BitWriter::new();
        let err = writer.write_varint(MAX_SAFE_INTEGER + 1).unwrap_err();
        assert!(matches!(err, BitError::IntegerRange { .. }));
        assert_eq!(writer.bits_written(), 0);
    }

    #[test]
    fn read_rejects_overlong_chain() {
        // Twelve continuation groups of zero data.
        let bits = "000001".repeat(12);
        let err = read_unsigned(&bits).unwrap_err();
        assert!(matches!(err, BitError::IntegerRange { groups: 12 }));
    }

    #[test]
    fn read_rejects_overflowing_last_group() {
        // Ten full groups then an eleventh carrying bits above 2^53.
        let mut bits = "111111".repeat(10);
        bits.push_str("111110");
        let err = read_unsigned(&bits).unwrap_err();
        assert!(matches!(err, BitError::IntegerRange { groups: 11 }));
    }

    #[test]
    fn truncated_chain_is_underrun() {
        let err = read_unsigned("000001").unwrap_err();
        assert!(matches!(err, BitError::EndOfBuffer { .. }));
    }

    #[test]
    fn group_count() {
        assert_eq!(varint_groups(0), 1);
        assert_eq!(varint_groups(31), 1);
        assert_eq!(varint_groups(32), 2);
        assert_eq!(varint_groups(MAX_SAFE_INTEGER), 11);
        assert_eq!(varint_bits(32), 12);
    }
}
