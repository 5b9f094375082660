//! Error types for transport operations.

use std::fmt;

/// Result type for transport decoding.
pub type WireResult<T> = Result<T, DecodeError>;

/// Errors raised while turning a hash string back into bits or bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// A character outside the 64-symbol alphabet.
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Character index within the input.
        position: usize,
    },

    /// Alphabet characters that do not form a valid unpadded byte encoding.
    MalformedBase64 { message: String },

    /// The compressed payload is not a valid DEFLATE stream.
    Decompress { message: String },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific transport limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    HashChars,
    InflatedBytes,
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    Compress { message: String },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter { ch, position } => {
                write!(f, "invalid character {ch:?} at position {position}")
            }
            Self::MalformedBase64 { message } => {
                write!(f, "malformed base64 payload: {message}")
            }
            Self::Decompress { message } => {
                write!(f, "failed to inflate payload: {message}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HashChars => "hash characters",
            Self::InflatedBytes => "inflated bytes",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compress { message } => write!(f, "failed to deflate payload: {message}"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}
