//! Record tags and element type codes.

use bitstream::{BitReader, BitWriter};

use crate::error::{CodecError, CodecResult, RecordKind};

/// Width of a record tag in bits.
pub const TAG_BITS: u8 = 4;

/// Tag that closes a root or style record.
pub const END_TAG: u8 = 0;

/// Width of an element type code in bits.
pub const ELEMENT_TYPE_BITS: u8 = 3;

pub(crate) fn write_tag(writer: &mut BitWriter, tag: u8) -> CodecResult<()> {
    writer.write_bits(u64::from(tag), TAG_BITS)?;
    Ok(())
}

/// Reads one record tag.
pub fn read_tag(reader: &mut BitReader<'_>) -> CodecResult<u8> {
    Ok(reader.read_bits(TAG_BITS)? as u8)
}

/// Enforces strictly ascending tags within one record.
#[derive(Debug)]
pub struct TagOrder {
    record: RecordKind,
    previous: u8,
}

impl TagOrder {
    #[must_use]
    pub const fn new(record: RecordKind) -> Self {
        Self {
            record,
            previous: END_TAG,
        }
    }

    /// Records `tag`, failing unless it is greater than every tag seen so far.
    pub fn accept(&mut self, tag: u8) -> CodecResult<()> {
        if tag <= self.previous {
            return Err(CodecError::TagOutOfOrder {
                record: self.record,
                previous: self.previous,
                current: tag,
            });
        }
        self.previous = tag;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip() {
        let mut writer = BitWriter::new();
        write_tag(&mut writer, 10).unwrap();
        write_tag(&mut writer, END_TAG).unwrap();
        let buffer = writer.finish();
        assert_eq!(buffer.to_bit_string(), "10100000");
        let mut reader = buffer.reader();
        assert_eq!(read_tag(&mut reader).unwrap(), 10);
        assert_eq!(read_tag(&mut reader).unwrap(), END_TAG);
    }

    #[test]
    fn tag_wider_than_field_rejected() {
        let mut writer = BitWriter::new();
        assert!(write_tag(&mut writer, 16).is_err());
    }

    #[test]
    fn order_accepts_ascending() {
        let mut order = TagOrder::new(RecordKind::Style);
        order.accept(1).unwrap();
        order.accept(3).unwrap();
        order.accept(10).unwrap();
    }

    #[test]
    fn order_rejects_repeat_and_regression() {
        let mut order = TagOrder::new(RecordKind::Style);
        order.accept(3).unwrap();
        assert_eq!(
            order.accept(3).unwrap_err(),
            CodecError::TagOutOfOrder {
                record: RecordKind::Style,
                previous: 3,
                current: 3,
            }
        );
        assert!(order.accept(2).is_err());
    }
}
