//! Error types for bitstream operations.

use std::fmt;

/// Result type for bitstream operations.
pub type BitResult<T> = Result<T, BitError>;

/// Errors that can occur during bit-level encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// Attempted to read past the logical end of the buffer.
    EndOfBuffer {
        /// Number of bits requested.
        requested: usize,
        /// Number of bits available.
        available: usize,
    },

    /// Invalid bit count for the operation.
    InvalidBitCount {
        /// The invalid bit count provided.
        bits: u8,
        /// Maximum allowed bits for this operation.
        max_bits: u8,
    },

    /// Value exceeds the range representable by the specified number of bits.
    ValueOutOfRange {
        /// The value that was out of range.
        value: u64,
        /// Number of bits available.
        bits: u8,
    },

    /// A varint value lies outside the safe-integer range.
    ///
    /// Raised on write for values above [`MAX_SAFE_INTEGER`](crate::MAX_SAFE_INTEGER)
    /// and on read when a group chain would decode past it.
    IntegerRange {
        /// Number of varint groups consumed or required.
        groups: usize,
    },

    /// A bit string contained something other than `'0'` or `'1'`.
    InvalidBitChar {
        /// The offending character.
        ch: char,
        /// Character index within the bit string.
        position: usize,
    },
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfBuffer {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bits but only {available} bits available"
                )
            }
            Self::InvalidBitCount { bits, max_bits } => {
                write!(f, "invalid bit count {bits}, maximum allowed is {max_bits}")
            }
            Self::ValueOutOfRange { value, bits } => {
                write!(f, "value {value} cannot be represented in {bits} bits")
            }
            Self::IntegerRange { groups } => {
                write!(
                    f,
                    "varint of {groups} groups exceeds the safe integer range"
                )
            }
            Self::InvalidBitChar { ch, position } => {
                write!(f, "invalid bit character {ch:?} at position {position}")
            }
        }
    }
}

impl std::error::Error for BitError {}
