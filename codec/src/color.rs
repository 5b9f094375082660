//! RGB and RGBA colors.

use std::fmt;
use std::str::FromStr;

use bitstream::{BitReader, BitWriter};

use crate::error::{CodecError, CodecResult, ValueField, ValueReason};
use crate::style::StyleField;

/// An 8-bit-per-channel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Creates a color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns `true` if alpha is 255.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 0xFF
    }

    /// Parses `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`, in either case.
    pub fn parse_hex(input: &str) -> CodecResult<Self> {
        let invalid = || CodecError::InvalidColor {
            input: input.to_string(),
        };
        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        let nibbles = digits
            .chars()
            .map(|ch| ch.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(invalid)?;

        let channels: Vec<u8> = match nibbles.len() {
            3 | 4 => nibbles.iter().map(|&n| (n << 4) | n).collect(),
            6 | 8 => nibbles
                .chunks_exact(2)
                .map(|pair| (pair[0] << 4) | pair[1])
                .collect(),
            _ => return Err(invalid()),
        };
        match channels.as_slice() {
            &[r, g, b] => Ok(Self::rgb(r, g, b)),
            &[r, g, b, a] => Ok(Self::rgba(r, g, b, a)),
            _ => Err(invalid()),
        }
    }

    /// Renders the canonical form: `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl FromStr for Color {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Writes an alpha-present bit, the three color channels, then alpha if present.
pub fn write_color(writer: &mut BitWriter, color: Color) -> CodecResult<()> {
    let has_alpha = !color.is_opaque();
    writer.write_bit(has_alpha);
    for channel in [color.r, color.g, color.b] {
        writer.write_bits(u64::from(channel), 8)?;
    }
    if has_alpha {
        writer.write_bits(u64::from(color.a), 8)?;
    }
    Ok(())
}

/// Reads a color written by [`write_color`].
///
/// An explicit alpha of `0xFF` is rejected; opaque colors are written
/// without the alpha byte.
pub fn read_color(reader: &mut BitReader<'_>) -> CodecResult<Color> {
    let has_alpha = reader.read_bit()?;
    let r = reader.read_bits(8)? as u8;
    let g = reader.read_bits(8)? as u8;
    let b = reader.read_bits(8)? as u8;
    let a = if has_alpha {
        reader.read_bits(8)? as u8
    } else {
        0xFF
    };
    let color = Color { r, g, b, a };
    if has_alpha && color.is_opaque() {
        return Err(CodecError::InvalidValue {
            field: ValueField::Style(StyleField::Color),
            reason: ValueReason::NonCanonical,
        });
    }
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(color: Color) -> (Color, usize) {
        let mut writer = BitWriter::new();
        write_color(&mut writer, color).unwrap();
        let buffer = writer.finish();
        let mut reader = buffer.reader();
        let decoded = read_color(&mut reader).unwrap();
        assert!(reader.ended());
        (decoded, buffer.bit_len())
    }

    #[test]
    fn parse_long_forms() {
        assert_eq!(Color::parse_hex("#FF0000").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(
            Color::parse_hex("#12345678").unwrap(),
            Color::rgba(0x12, 0x34, 0x56, 0x78)
        );
        assert_eq!(Color::parse_hex("#abcdef").unwrap(), Color::rgb(0xAB, 0xCD, 0xEF));
    }

    #[test]
    fn parse_short_forms() {
        assert_eq!(Color::parse_hex("#F00").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(
            Color::parse_hex("#f008").unwrap(),
            Color::rgba(255, 0, 0, 0x88)
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["", "FF0000", "#", "#FF000", "#GG0000", "#FF00000", "red"] {
            let err = Color::parse_hex(input).unwrap_err();
            assert!(
                matches!(err, CodecError::InvalidColor { .. }),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn canonical_hex() {
        assert_eq!(Color::rgb(255, 0, 0).to_hex(), "#FF0000");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
        assert_eq!(Color::parse_hex("#ff0000ff").unwrap().to_hex(), "#FF0000");
        assert_eq!(Color::rgb(0xAB, 0, 0x0C).to_string(), "#AB000C");
    }

    #[test]
    fn from_str_matches_parse() {
        let color: Color = "#00ff00".parse().unwrap();
        assert_eq!(color, Color::rgb(0, 255, 0));
    }

    #[test]
    fn opaque_color_is_25_bits() {
        let (decoded, bits) = roundtrip(Color::rgb(255, 0, 0));
        assert_eq!(decoded, Color::rgb(255, 0, 0));
        assert_eq!(bits, 25);
    }

    #[test]
    fn translucent_color_is_33_bits() {
        let color = Color::rgba(10, 20, 30, 40);
        let (decoded, bits) = roundtrip(color);
        assert_eq!(decoded, color);
        assert_eq!(bits, 33);
    }

    #[test]
    fn explicit_opaque_alpha_rejected() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.write_bits(0x00FF_0000, 24).unwrap();
        writer.write_bits(0xFF, 8).unwrap();
        let buffer = writer.finish();
        let err = read_color(&mut buffer.reader()).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidValue {
                field: ValueField::Style(StyleField::Color),
                reason: ValueReason::NonCanonical,
            }
        );
        assert_eq!(err.kind(), crate::error::ErrorKind::ProtocolViolation);
    }

    #[test]
    fn truncated_color_fails() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.write_bits(0xFF, 8).unwrap();
        let buffer = writer.finish();
        let err = read_color(&mut buffer.reader()).unwrap_err();
        assert!(matches!(err, CodecError::Bitstream(_)));
    }
}
