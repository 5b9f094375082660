//! Top-level encoders and decoders for shareable hashes and auto-saves.

use bitstream::{BitBuffer, BitReader, BitWriter};
use wire::SYMBOL_BITS;

use crate::error::{CodecError, CodecResult};
use crate::limits::{CodecLimits, DecodeOptions};
use crate::state::{read_root, write_root};
use crate::types::StateRoot;

/// Padding unit of a raw state buffer and of an inflated auto-save.
pub const STATE_PAD_BITS: usize = 8;

/// Padding unit of an uncompressed hash.
pub const HASH_PAD_BITS: usize = SYMBOL_BITS;

/// Encodes `root` into a bit buffer.
pub fn encode_state(root: &StateRoot) -> CodecResult<BitBuffer> {
    let mut writer = BitWriter::new();
    write_root(&mut writer, root)?;
    Ok(writer.finish())
}

/// Decodes a bit buffer holding one root record.
///
/// Up to seven zero bits of byte padding may follow the record.
pub fn decode_state(buffer: &BitBuffer, limits: &CodecLimits) -> CodecResult<StateRoot> {
    decode_padded(buffer, limits, STATE_PAD_BITS)
}

fn decode_padded(
    buffer: &BitBuffer,
    limits: &CodecLimits,
    pad_width: usize,
) -> CodecResult<StateRoot> {
    let mut reader = buffer.reader();
    let root = read_root(&mut reader, limits)?;
    expect_padding(&mut reader, pad_width)?;
    Ok(root)
}

/// Requires the rest of the input to be shorter than one pad unit and all zero.
pub fn expect_padding(reader: &mut BitReader<'_>, pad_width: usize) -> CodecResult<()> {
    let remaining_bits = reader.bits_remaining();
    if remaining_bits >= pad_width {
        return Err(CodecError::TrailingData { remaining_bits });
    }
    if reader.read_bits(remaining_bits as u8)? != 0 {
        return Err(CodecError::TrailingData { remaining_bits });
    }
    Ok(())
}

/// Encodes `root` as an uncompressed URL-safe hash.
pub fn encode_hash(root: &StateRoot) -> CodecResult<String> {
    let buffer = encode_state(root)?;
    let hash = wire::to_base64(&buffer);
    tracing::debug!(
        target: "mapstate::codec",
        bits = buffer.bit_len(),
        chars = hash.len(),
        elements = root.elements.len(),
        "encoded hash"
    );
    Ok(hash)
}

/// Decodes a hash produced by [`encode_hash`].
pub fn decode_hash(input: &str, options: &DecodeOptions) -> CodecResult<StateRoot> {
    let buffer = wire::from_base64(input, &options.wire)?;
    decode_padded(&buffer, &options.limits, HASH_PAD_BITS)
}

/// Encodes `root` as a compressed auto-save string.
pub fn encode_autosave(root: &StateRoot) -> CodecResult<String> {
    let buffer = encode_state(root)?;
    let bits = buffer.bit_len();
    let encoded = wire::to_base64_compressed(&buffer.into_bytes())?;
    tracing::debug!(
        target: "mapstate::codec",
        bits,
        chars = encoded.len(),
        elements = root.elements.len(),
        "encoded autosave"
    );
    Ok(encoded)
}

/// Decodes a string produced by [`encode_autosave`].
pub fn decode_autosave(input: &str, options: &DecodeOptions) -> CodecResult<StateRoot> {
    let bytes = wire::from_base64_compressed(input, &options.wire)?;
    decode_state(&BitBuffer::from_bytes(bytes), &options.limits)
}

/// Decodes a hash, falling back to an empty state on any failure.
///
/// An empty input is the normal "nothing shared" case and is not logged as
/// a failure.
pub fn decode_hash_or_default(input: &str, options: &DecodeOptions) -> StateRoot {
    or_default(input, "hash", decode_hash(input, options))
}

/// Decodes an auto-save, falling back to an empty state on any failure.
pub fn decode_autosave_or_default(input: &str, options: &DecodeOptions) -> StateRoot {
    or_default(input, "autosave", decode_autosave(input, options))
}

fn or_default(input: &str, source: &str, result: CodecResult<StateRoot>) -> StateRoot {
    if input.is_empty() {
        tracing::debug!(target: "mapstate::codec", source, "empty input, using default state");
        return StateRoot::default();
    }
    match result {
        Ok(root) => {
            if root.is_empty() {
                tracing::debug!(target: "mapstate::codec", source, "decoded an empty state");
            }
            root
        }
        Err(err) => {
            tracing::warn!(
                target: "mapstate::codec",
                error = %err,
                kind = ?err.kind(),
                source,
                len = input.len(),
                "failed to decode map state, using default"
            );
            StateRoot::default()
        }
    }
}
