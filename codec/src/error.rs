//! Error types for codec operations.

use std::fmt;

use bitstream::BitError;

use crate::style::StyleField;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding map state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Bitstream error.
    Bitstream(BitError),

    /// Transport decoding error.
    Wire(wire::DecodeError),

    /// Transport encoding error.
    Encode(wire::EncodeError),

    /// A tag or type code with no meaning in this format version.
    UnknownTag { record: RecordKind, tag: u8 },

    /// A record repeated a tag or left canonical ascending order.
    TagOutOfOrder {
        record: RecordKind,
        previous: u8,
        current: u8,
    },

    /// Bits left over after the root record that are not zero padding.
    TrailingData { remaining_bits: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// A value that cannot be represented in the format.
    InvalidValue {
        field: ValueField,
        reason: ValueReason,
    },

    /// A color string that is not `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`.
    InvalidColor { input: String },

    /// A decoded label that is not valid UTF-16.
    InvalidString { reason: StringReason },
}

/// The record being decoded when a tag error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Root,
    Element,
    Style,
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Elements,
    Points,
    LabelUnits,
}

/// The value an [`CodecError::InvalidValue`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    Coordinate,
    Radius,
    Style(StyleField),
}

/// Details for invalid value errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueReason {
    /// NaN or infinite.
    NonFinite,
    /// Negative value for a field stored unsigned.
    Negative,
    /// Too large for the safe-integer range or the target type.
    OutOfRange,
    /// Decoded from a form the encoder never writes.
    NonCanonical,
}

/// Details for invalid string errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringReason {
    CodeUnitOutOfRange { value: u64 },
    UnpairedSurrogate,
}

/// Coarse classification of failures, for callers that only need to know
/// what went wrong rather than exactly where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input ended before the state was complete.
    BufferUnderrun,
    /// A character outside the transport alphabet.
    InvalidCharacter,
    /// Corrupt or future-incompatible structure.
    ProtocolViolation,
    /// An integer beyond the safe range.
    IntegerRange,
    /// A configured decode limit was hit.
    LimitExceeded,
    /// The state handed to the encoder cannot be represented.
    InvalidInput,
}

impl CodecError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Bitstream(BitError::EndOfBuffer { .. }) => ErrorKind::BufferUnderrun,
            Self::Bitstream(BitError::IntegerRange { .. })
            | Self::InvalidValue {
                reason: ValueReason::OutOfRange,
                ..
            } => ErrorKind::IntegerRange,
            Self::Wire(wire::DecodeError::InvalidCharacter { .. }) => ErrorKind::InvalidCharacter,
            Self::Wire(wire::DecodeError::LimitsExceeded { .. }) | Self::LimitsExceeded { .. } => {
                ErrorKind::LimitExceeded
            }
            Self::Wire(
                wire::DecodeError::MalformedBase64 { .. } | wire::DecodeError::Decompress { .. },
            )
            | Self::UnknownTag { .. }
            | Self::TagOutOfOrder { .. }
            | Self::TrailingData { .. }
            | Self::InvalidValue {
                reason: ValueReason::NonCanonical,
                ..
            }
            | Self::InvalidString { .. } => ErrorKind::ProtocolViolation,
            _ => ErrorKind::InvalidInput,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::Wire(e) => write!(f, "transport error: {e}"),
            Self::Encode(e) => write!(f, "transport encode error: {e}"),
            Self::UnknownTag { record, tag } => {
                write!(f, "unknown {record} tag {tag}")
            }
            Self::TagOutOfOrder {
                record,
                previous,
                current,
            } => {
                write!(f, "{record} tag {current} follows tag {previous}")
            }
            Self::TrailingData { remaining_bits } => {
                write!(f, "trailing data after root record: {remaining_bits} bits")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid {field}: {reason}")
            }
            Self::InvalidColor { input } => write!(f, "invalid color {input:?}"),
            Self::InvalidString { reason } => write!(f, "invalid label: {reason}"),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Root => "root",
            Self::Element => "element",
            Self::Style => "style",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Elements => "elements",
            Self::Points => "points",
            Self::LabelUnits => "label units",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ValueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinate => write!(f, "coordinate"),
            Self::Radius => write!(f, "radius"),
            Self::Style(field) => write!(f, "style field {}", field.name()),
        }
    }
}

impl fmt::Display for ValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => write!(f, "value is not finite"),
            Self::Negative => write!(f, "value must not be negative"),
            Self::OutOfRange => write!(f, "value is out of range"),
            Self::NonCanonical => write!(f, "value is not in canonical form"),
        }
    }
}

impl fmt::Display for StringReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeUnitOutOfRange { value } => {
                write!(f, "code unit {value} exceeds 0xFFFF")
            }
            Self::UnpairedSurrogate => write!(f, "unpaired surrogate"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(e) => Some(e),
            Self::Wire(e) => Some(e),
            Self::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BitError> for CodecError {
    fn from(err: BitError) -> Self {
        Self::Bitstream(err)
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::Encode(err)
    }
}
