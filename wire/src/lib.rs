//! URL-safe transport encodings for the mapstate codec.
//!
//! This crate turns finished bit buffers into strings that can live in a URL
//! fragment or local history entry, and back. It knows nothing about the map
//! state carried inside.
//!
//! - [`to_base64`] / [`from_base64`] map the bit stream six bits per symbol.
//!   Used for shareable hashes, where every saved character counts.
//! - [`to_base64_compressed`] / [`from_base64_compressed`] deflate whole bytes
//!   first. Used for larger auto-save payloads.
//!
//! # Design Principles
//!
//! - **Stable alphabet** - [`ALPHABET`] is part of the format and never changes.
//! - **Bounded decoding** - Input length and inflated size are checked against [`Limits`].
//! - **No domain knowledge** - This crate handles transport, not map state.
//!
//! See `FORMAT.md` for the complete specification.

mod alphabet;
mod compress;
mod error;
mod limits;

pub use alphabet::{from_base64, symbol_value, to_base64, validate_symbols, ALPHABET, SYMBOL_BITS};
pub use compress::{from_base64_compressed, to_base64_compressed};
pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use limits::Limits;
