//! Configurable limits for bounded decoding.

/// Transport-level limits for hash decoding.
///
/// Hash strings come from URLs and local history, so they are untrusted.
/// These limits are checked before any allocation proportional to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum hash length in characters.
    pub max_hash_chars: usize,

    /// Maximum size of an inflated auto-save payload in bytes.
    pub max_inflated_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // Auto-save payloads live in local storage, not the address bar.
            max_hash_chars: 1024 * 1024,
            max_inflated_bytes: 4 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_hash_chars: 4096,
            max_inflated_bytes: 16 * 1024,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_hash_chars: usize::MAX,
            max_inflated_bytes: usize::MAX,
        }
    }
}
