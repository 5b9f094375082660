//! The 64-symbol URL-safe alphabet and bit-granular base64 mapping.

use bitstream::{BitBuffer, BitWriter};

use crate::error::{DecodeError, LimitKind, WireResult};
use crate::limits::Limits;

/// Symbols in value order. Identical to the RFC 4648 URL-safe alphabet.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Bits carried by one symbol.
pub const SYMBOL_BITS: usize = 6;

const INVALID: u8 = 0xFF;

const DECODE_TABLE: [u8; 128] = build_decode_table();

const fn build_decode_table() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut value = 0;
    while value < ALPHABET.len() {
        table[ALPHABET[value] as usize] = value as u8;
        value += 1;
    }
    table
}

/// Returns the 6-bit value of an alphabet symbol.
#[must_use]
pub fn symbol_value(ch: char) -> Option<u8> {
    let idx = usize::try_from(u32::from(ch)).ok()?;
    match DECODE_TABLE.get(idx) {
        Some(&value) if value != INVALID => Some(value),
        _ => None,
    }
}

/// Maps the logical bits of `buffer` to symbols, six bits per character.
///
/// Only the final group is zero-padded, so the output has
/// `ceil(bit_len / 6)` characters and no padding symbol.
#[must_use]
pub fn to_base64(buffer: &BitBuffer) -> String {
    let bit_len = buffer.bit_len();
    let mut out = String::with_capacity(bit_len.div_ceil(SYMBOL_BITS));
    for start in (0..bit_len).step_by(SYMBOL_BITS) {
        let mut value = 0usize;
        for offset in 0..SYMBOL_BITS {
            let bit = buffer.bit(start + offset) == Some(true);
            value = (value << 1) | usize::from(bit);
        }
        out.push(char::from(ALPHABET[value]));
    }
    out
}

/// Maps symbols back to bits. The logical length is six bits per character.
pub fn from_base64(input: &str, limits: &Limits) -> WireResult<BitBuffer> {
    check_hash_len(input, limits)?;
    let mut writer = BitWriter::with_capacity((input.len() * SYMBOL_BITS).div_ceil(8));
    for (position, ch) in input.chars().enumerate() {
        let value = symbol_value(ch).ok_or(DecodeError::InvalidCharacter { ch, position })?;
        for shift in (0..SYMBOL_BITS).rev() {
            writer.write_bit((value >> shift) & 1 == 1);
        }
    }
    Ok(writer.finish())
}

/// Rejects the first character outside the alphabet.
pub fn validate_symbols(input: &str) -> WireResult<()> {
    match input
        .chars()
        .enumerate()
        .find(|&(_, ch)| symbol_value(ch).is_none())
    {
        Some((position, ch)) => Err(DecodeError::InvalidCharacter { ch, position }),
        None => Ok(()),
    }
}

pub(crate) fn check_hash_len(input: &str, limits: &Limits) -> WireResult<()> {
    if input.len() > limits.max_hash_chars {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::HashChars,
            limit: limits.max_hash_chars,
            actual: input.len(),
        });
    }
    Ok(())
}
