//! Label strings as UTF-16 code units.

use bitstream::{BitReader, BitWriter};

use crate::error::{CodecError, CodecResult, LimitKind, StringReason};
use crate::geometry::read_count;
use crate::limits::CodecLimits;

/// Writes the UTF-16 length followed by one varint per code unit.
///
/// ASCII costs 12 bits per character and other scripts more. The layout is
/// fixed by existing shared links.
pub fn write_string(writer: &mut BitWriter, value: &str) -> CodecResult<()> {
    let units: Vec<u16> = value.encode_utf16().collect();
    writer.write_varint(units.len() as u64)?;
    for unit in units {
        writer.write_varint(u64::from(unit))?;
    }
    Ok(())
}

/// Reads a string written by [`write_string`].
pub fn read_string(reader: &mut BitReader<'_>, limits: &CodecLimits) -> CodecResult<String> {
    let count = read_count(reader, LimitKind::LabelUnits, limits.max_label_units)?;
    let mut units = Vec::with_capacity(count.min(reader.bits_remaining() / 6));
    for _ in 0..count {
        let value = reader.read_varint()?;
        let unit = u16::try_from(value).map_err(|_| CodecError::InvalidString {
            reason: StringReason::CodeUnitOutOfRange { value },
        })?;
        units.push(unit);
    }
    String::from_utf16(&units).map_err(|_| CodecError::InvalidString {
        reason: StringReason::UnpairedSurrogate,
    })
}
