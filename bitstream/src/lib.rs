//! Bit packing and varint primitives for the mapstate codec.
//!
//! This crate provides [`BitWriter`], [`BitReader`] and [`BitBuffer`] for
//! bit-level encoding and decoding, plus the 6-bit-group varints every higher
//! encoding is built from.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are checked against the logical bit length.
//! - **No domain knowledge** - This crate knows nothing about maps, points, or styles.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::BitWriter;
//!
//! let mut writer = BitWriter::new();
//! writer.write_bit(true);
//! writer.write_varint(32).unwrap();
//!
//! let buffer = writer.finish();
//! assert_eq!(buffer.to_bit_string(), "1000001000010");
//!
//! let mut reader = buffer.reader();
//! assert!(reader.read_bit().unwrap());
//! assert_eq!(reader.read_varint().unwrap(), 32);
//! assert!(reader.ended());
//! ```

mod buffer;
mod error;
mod reader;
mod varint;
mod writer;

pub use buffer::BitBuffer;
pub use error::{BitError, BitResult};
pub use reader::BitReader;
pub use varint::{
    varint_bits, varint_groups, zigzag_decode, zigzag_encode, MAX_SAFE_INTEGER,
    MAX_VARINT_GROUPS, VARINT_DATA_BITS, VARINT_GROUP_BITS,
};
pub use writer::BitWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        let writer = BitWriter::new();
        let buffer = writer.finish();
        assert!(buffer.is_empty());

        let reader = buffer.reader();
        assert!(reader.ended());
    }

    #[test]
    fn multiple_bits_roundtrip() {
        let mut writer = BitWriter::new();
        for bit in [true, false, true, true, false] {
            writer.write_bit(bit);
        }
        let buffer = writer.finish();

        let mut reader = buffer.reader();
        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert!(reader.ended());
    }

    #[test]
    fn bits_roundtrip_various_sizes() {
        let test_cases = [
            (0b1010u64, 4),
            (0xFFu64, 8),
            (0xABCDu64, 16),
            (0x1234_5678u64, 32),
            (u64::MAX, 64),
        ];

        for (value, bits) in test_cases {
            let mut writer = BitWriter::new();
            writer.write_bits(value, bits).unwrap();
            let buffer = writer.finish();

            let mut reader = buffer.reader();
            let read_value = reader.read_bits(bits).unwrap();
            assert_eq!(
                read_value, value,
                "roundtrip failed for {bits}-bit value {value}"
            );
            assert!(reader.ended());
        }
    }

    #[test]
    fn mixed_roundtrip() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.write_bits(0b1010, 4).unwrap();
        writer.write_varint(1000).unwrap();
        writer.write_svarint(-77).unwrap();
        writer.write_bits(42, 7).unwrap();
        let buffer = writer.finish();

        let mut reader = buffer.reader();
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(4).unwrap(), 0b1010);
        assert_eq!(reader.read_varint().unwrap(), 1000);
        assert_eq!(reader.read_svarint().unwrap(), -77);
        assert_eq!(reader.read_bits(7).unwrap(), 42);
        assert!(reader.ended());
    }

    #[test]
    fn doctest_example() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.write_varint(32).unwrap();

        let buffer = writer.finish();
        assert_eq!(buffer.bit_len(), 13);

        let mut reader = buffer.reader();
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_varint().unwrap(), 32);
    }
}
