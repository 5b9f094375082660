//! DEFLATE envelope for larger auto-save payloads.
//!
//! The compressed bytes are carried in the same URL-safe alphabet, in the
//! ordinary unpadded byte-oriented form.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use libflate::deflate::{Decoder, Encoder};

use crate::alphabet::{check_hash_len, validate_symbols};
use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::limits::Limits;

/// Deflates `bytes` and encodes the result with the URL-safe alphabet.
pub fn to_base64_compressed(bytes: &[u8]) -> Result<String, EncodeError> {
    let mut encoder = Encoder::new(Vec::with_capacity(bytes.len() / 2 + 16));
    encoder.write_all(bytes).map_err(compress_error)?;
    let compressed = encoder.finish().into_result().map_err(compress_error)?;
    tracing::debug!(
        target: "mapstate::wire",
        raw_bytes = bytes.len(),
        compressed_bytes = compressed.len(),
        "payload deflated"
    );
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Reverses [`to_base64_compressed`].
pub fn from_base64_compressed(input: &str, limits: &Limits) -> WireResult<Vec<u8>> {
    check_hash_len(input, limits)?;
    validate_symbols(input)?;
    let compressed =
        URL_SAFE_NO_PAD
            .decode(input)
            .map_err(|err| DecodeError::MalformedBase64 {
                message: err.to_string(),
            })?;

    let cap = u64::try_from(limits.max_inflated_bytes)
        .unwrap_or(u64::MAX)
        .saturating_add(1);
    let mut inflated = Vec::new();
    Decoder::new(compressed.as_slice())
        .take(cap)
        .read_to_end(&mut inflated)
        .map_err(|err| DecodeError::Decompress {
            message: err.to_string(),
        })?;
    if inflated.len() > limits.max_inflated_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::InflatedBytes,
            limit: limits.max_inflated_bytes,
            actual: inflated.len(),
        });
    }
    Ok(inflated)
}

fn compress_error(err: std::io::Error) -> EncodeError {
    EncodeError::Compress {
        message: err.to_string(),
    }
}
