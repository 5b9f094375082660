//! Limits and options for codec-level decoding.

/// Codec-specific limits enforced while decoding untrusted hashes.
///
/// Counts are checked as soon as they are read, before anything is allocated
/// for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum number of elements in a root record.
    pub max_elements: usize,
    /// Maximum number of points in one line or polygon.
    pub max_points: usize,
    /// Maximum label length in UTF-16 code units.
    pub max_label_units: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_elements: 4096,
            max_points: 100_000,
            max_label_units: 4096,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_elements: 64,
            max_points: 1024,
            max_label_units: 256,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_elements: usize::MAX,
            max_points: usize::MAX,
            max_label_units: usize::MAX,
        }
    }
}

/// Everything the top-level decoders need to bound their work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Limits on the decoded state tree.
    pub limits: CodecLimits,
    /// Limits on the transport string.
    pub wire: wire::Limits,
}

impl DecodeOptions {
    /// Creates options suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            limits: CodecLimits::for_testing(),
            wire: wire::Limits::for_testing(),
        }
    }
}
