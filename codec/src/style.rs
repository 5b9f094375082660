//! Sparse style records.
//!
//! A style names only the fields that differ from its component's defaults.
//! On the wire each present field is a 4-bit tag followed by its value, in
//! ascending tag order, closed by [`END_TAG`](crate::END_TAG).

use bitstream::{BitReader, BitWriter};

use crate::color::{read_color, write_color, Color};
use crate::error::{CodecError, CodecResult, RecordKind, ValueField, ValueReason};
use crate::geometry::{quantize_signed, quantize_unsigned};
use crate::limits::CodecLimits;
use crate::tag::{read_tag, write_tag, TagOrder, END_TAG};
use crate::text::{read_string, write_string};

/// Largest scaled value of an unsigned numeric field.
const MAX_UNSIGNED_UNITS: u64 = u32::MAX as u64;

/// Largest scaled magnitude of a signed numeric field.
const MAX_SIGNED_UNITS: i64 = i32::MAX as i64;

/// Per-feature styling. `None` means "use the component default".
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Style {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub color: Option<Color>,
    /// Outline thickness around markers and labels.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub halo: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub opacity: Option<f64>,
    /// Index into the renderer's symbol or dash table.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub pattern: Option<u32>,
    /// Degrees.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub rotation: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub size: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub width: Option<f64>,
    /// Index into the renderer's label placement table.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub align: Option<u32>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub label: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub visible: Option<bool>,
}

/// Style fields with their wire tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StyleField {
    Color = 1,
    Halo = 2,
    Opacity = 3,
    Pattern = 4,
    Rotation = 5,
    Size = 6,
    Width = 7,
    Align = 8,
    Label = 9,
    Visible = 10,
}

/// How a field's value is laid out.
#[derive(Debug, Clone, Copy)]
enum FieldCodec {
    Color,
    /// Unsigned varint of `round(value * scale)`.
    Unsigned(f64),
    /// Signed varint of `round(value * scale)`.
    Signed(f64),
    Index,
    Text,
    Flag,
}

impl StyleField {
    /// Every field in canonical (tag) order.
    pub const ALL: [Self; 10] = [
        Self::Color,
        Self::Halo,
        Self::Opacity,
        Self::Pattern,
        Self::Rotation,
        Self::Size,
        Self::Width,
        Self::Align,
        Self::Label,
        Self::Visible,
    ];

    /// Returns the wire tag.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Looks up a field by wire tag.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Color),
            2 => Some(Self::Halo),
            3 => Some(Self::Opacity),
            4 => Some(Self::Pattern),
            5 => Some(Self::Rotation),
            6 => Some(Self::Size),
            7 => Some(Self::Width),
            8 => Some(Self::Align),
            9 => Some(Self::Label),
            10 => Some(Self::Visible),
            _ => None,
        }
    }

    /// Returns the field name as used in JSON.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Halo => "halo",
            Self::Opacity => "opacity",
            Self::Pattern => "pattern",
            Self::Rotation => "rotation",
            Self::Size => "size",
            Self::Width => "width",
            Self::Align => "align",
            Self::Label => "label",
            Self::Visible => "visible",
        }
    }

    fn codec(self) -> FieldCodec {
        match self {
            Self::Color => FieldCodec::Color,
            Self::Halo | Self::Size | Self::Width => FieldCodec::Unsigned(10.0),
            Self::Opacity => FieldCodec::Unsigned(100.0),
            Self::Rotation => FieldCodec::Signed(1.0),
            Self::Pattern | Self::Align => FieldCodec::Index,
            Self::Label => FieldCodec::Text,
            Self::Visible => FieldCodec::Flag,
        }
    }
}

/// The component a style belongs to, which decides its defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Marker,
    Line,
    /// Polygon and circle interiors.
    Fill,
    /// Polygon and circle outlines.
    Stroke,
}

impl StyleKind {
    /// Returns a style with every field set to this component's default.
    #[must_use]
    pub fn defaults(self) -> Style {
        let mut style = Style {
            color: Some(Color::rgb(0, 0, 0)),
            halo: Some(0.0),
            opacity: Some(1.0),
            pattern: Some(0),
            rotation: Some(0.0),
            size: Some(1.0),
            width: Some(0.0),
            align: Some(0),
            label: Some(String::new()),
            visible: Some(true),
        };
        match self {
            Self::Marker => style.halo = Some(1.0),
            Self::Line | Self::Stroke => style.width = Some(2.0),
            Self::Fill => {
                style.color = Some(Color::rgb(0xFF, 0xFF, 0xFF));
                style.opacity = Some(0.4);
            }
        }
        style
    }
}

/// A field value in wire units.
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Color(Color),
    Unsigned(u64),
    Signed(i64),
    Index(u32),
    Text(String),
    Flag(bool),
}

impl Style {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }

    /// Returns `true` if `field` is set.
    #[must_use]
    pub const fn has(&self, field: StyleField) -> bool {
        match field {
            StyleField::Color => self.color.is_some(),
            StyleField::Halo => self.halo.is_some(),
            StyleField::Opacity => self.opacity.is_some(),
            StyleField::Pattern => self.pattern.is_some(),
            StyleField::Rotation => self.rotation.is_some(),
            StyleField::Size => self.size.is_some(),
            StyleField::Width => self.width.is_some(),
            StyleField::Align => self.align.is_some(),
            StyleField::Label => self.label.is_some(),
            StyleField::Visible => self.visible.is_some(),
        }
    }

    /// Iterates over the set fields in tag order.
    pub fn fields(&self) -> impl Iterator<Item = StyleField> + '_ {
        StyleField::ALL
            .into_iter()
            .filter(move |&field| self.has(field))
    }

    /// Fills every absent field from the defaults of `kind`.
    #[must_use]
    pub fn resolve(&self, kind: StyleKind) -> Self {
        let defaults = kind.defaults();
        Self {
            color: self.color.or(defaults.color),
            halo: self.halo.or(defaults.halo),
            opacity: self.opacity.or(defaults.opacity),
            pattern: self.pattern.or(defaults.pattern),
            rotation: self.rotation.or(defaults.rotation),
            size: self.size.or(defaults.size),
            width: self.width.or(defaults.width),
            align: self.align.or(defaults.align),
            label: self.label.clone().or(defaults.label),
            visible: self.visible.or(defaults.visible),
        }
    }

    /// Returns the style a decoder sees after encoding `self` as `kind`.
    ///
    /// Numeric fields are rounded to their wire scale and fields equal to the
    /// default are dropped.
    pub fn quantized(&self, kind: StyleKind) -> CodecResult<Self> {
        let defaults = kind.defaults();
        let mut out = Self::default();
        for field in StyleField::ALL {
            if let Some(value) = self.encoded_value(field, &defaults)? {
                out.assign(field, value);
            }
        }
        Ok(out)
    }

    /// The value to write for `field`, or `None` if it is absent or default.
    fn encoded_value(&self, field: StyleField, defaults: &Self) -> CodecResult<Option<FieldValue>> {
        let Some(value) = self.wire_value(field)? else {
            return Ok(None);
        };
        if defaults.wire_value(field)?.as_ref() == Some(&value) {
            return Ok(None);
        }
        Ok(Some(value))
    }

    fn wire_value(&self, field: StyleField) -> CodecResult<Option<FieldValue>> {
        let value_field = ValueField::Style(field);
        let value = match field.codec() {
            FieldCodec::Color => self.color.map(FieldValue::Color),
            FieldCodec::Unsigned(scale) => self
                .number(field)
                .map(|v| quantize_unsigned(v, scale, MAX_UNSIGNED_UNITS, value_field))
                .transpose()?
                .map(FieldValue::Unsigned),
            FieldCodec::Signed(scale) => self
                .number(field)
                .map(|v| quantize_signed(v, scale, MAX_SIGNED_UNITS, value_field))
                .transpose()?
                .map(FieldValue::Signed),
            FieldCodec::Index => self.index(field).map(FieldValue::Index),
            FieldCodec::Text => self.label.clone().map(FieldValue::Text),
            FieldCodec::Flag => self.visible.map(FieldValue::Flag),
        };
        Ok(value)
    }

    fn number(&self, field: StyleField) -> Option<f64> {
        match field {
            StyleField::Halo => self.halo,
            StyleField::Opacity => self.opacity,
            StyleField::Rotation => self.rotation,
            StyleField::Size => self.size,
            StyleField::Width => self.width,
            _ => None,
        }
    }

    const fn index(&self, field: StyleField) -> Option<u32> {
        match field {
            StyleField::Pattern => self.pattern,
            StyleField::Align => self.align,
            _ => None,
        }
    }

    fn number_slot(&mut self, field: StyleField) -> Option<&mut Option<f64>> {
        match field {
            StyleField::Halo => Some(&mut self.halo),
            StyleField::Opacity => Some(&mut self.opacity),
            StyleField::Rotation => Some(&mut self.rotation),
            StyleField::Size => Some(&mut self.size),
            StyleField::Width => Some(&mut self.width),
            _ => None,
        }
    }

    /// Stores a wire value, converting scaled units back to the field's unit.
    fn assign(&mut self, field: StyleField, value: FieldValue) {
        let scale = match field.codec() {
            FieldCodec::Unsigned(scale) | FieldCodec::Signed(scale) => scale,
            _ => 1.0,
        };
        match value {
            FieldValue::Color(color) => self.color = Some(color),
            FieldValue::Unsigned(units) => {
                if let Some(slot) = self.number_slot(field) {
                    *slot = Some(units as f64 / scale);
                }
            }
            FieldValue::Signed(units) => {
                if let Some(slot) = self.number_slot(field) {
                    *slot = Some(units as f64 / scale);
                }
            }
            FieldValue::Index(index) if field == StyleField::Pattern => {
                self.pattern = Some(index);
            }
            FieldValue::Index(index) => self.align = Some(index),
            FieldValue::Text(text) => self.label = Some(text),
            FieldValue::Flag(flag) => self.visible = Some(flag),
        }
    }
}

fn write_value(writer: &mut BitWriter, value: &FieldValue) -> CodecResult<()> {
    match value {
        FieldValue::Color(color) => write_color(writer, *color)?,
        FieldValue::Unsigned(units) => writer.write_varint(*units)?,
        FieldValue::Signed(units) => writer.write_svarint(*units)?,
        FieldValue::Index(index) => writer.write_varint(u64::from(*index))?,
        FieldValue::Text(text) => write_string(writer, text)?,
        FieldValue::Flag(flag) => writer.write_bit(*flag),
    }
    Ok(())
}

fn read_value(
    reader: &mut BitReader<'_>,
    field: StyleField,
    limits: &CodecLimits,
) -> CodecResult<FieldValue> {
    let out_of_range = || CodecError::InvalidValue {
        field: ValueField::Style(field),
        reason: ValueReason::OutOfRange,
    };
    let value = match field.codec() {
        FieldCodec::Color => FieldValue::Color(read_color(reader)?),
        FieldCodec::Unsigned(_) => {
            let units = reader.read_varint()?;
            if units > MAX_UNSIGNED_UNITS {
                return Err(out_of_range());
            }
            FieldValue::Unsigned(units)
        }
        FieldCodec::Signed(_) => {
            let units = reader.read_svarint()?;
            if units.abs() > MAX_SIGNED_UNITS {
                return Err(out_of_range());
            }
            FieldValue::Signed(units)
        }
        FieldCodec::Index => {
            let index = u32::try_from(reader.read_varint()?).map_err(|_| out_of_range())?;
            FieldValue::Index(index)
        }
        FieldCodec::Text => FieldValue::Text(read_string(reader, limits)?),
        FieldCodec::Flag => FieldValue::Flag(reader.read_bit()?),
    };
    Ok(value)
}

/// Writes the fields of `style` that differ from the defaults of `kind`.
pub fn write_style(writer: &mut BitWriter, style: &Style, kind: StyleKind) -> CodecResult<()> {
    let defaults = kind.defaults();
    for field in StyleField::ALL {
        if let Some(value) = style.encoded_value(field, &defaults)? {
            write_tag(writer, field.tag())?;
            write_value(writer, &value)?;
        }
    }
    write_tag(writer, END_TAG)
}

/// Reads a style record.
///
/// Tags must be known and strictly ascending.
pub fn read_style(reader: &mut BitReader<'_>, limits: &CodecLimits) -> CodecResult<Style> {
    let mut style = Style::default();
    let mut order = TagOrder::new(RecordKind::Style);
    loop {
        let tag = read_tag(reader)?;
        if tag == END_TAG {
            return Ok(style);
        }
        let field = StyleField::from_tag(tag).ok_or(CodecError::UnknownTag {
            record: RecordKind::Style,
            tag,
        })?;
        order.accept(tag)?;
        let value = read_value(reader, field, limits)?;
        style.assign(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn encode(style: &Style, kind: StyleKind) -> bitstream::BitBuffer {
        let mut writer = BitWriter::new();
        write_style(&mut writer, style, kind).unwrap();
        writer.finish()
    }

    fn roundtrip(style: &Style, kind: StyleKind) -> Style {
        let buffer = encode(style, kind);
        let mut reader = buffer.reader();
        let decoded = read_style(&mut reader, &CodecLimits::default()).unwrap();
        assert!(reader.ended());
        decoded
    }

    #[test]
    fn field_tags_roundtrip() {
        for field in StyleField::ALL {
            assert_eq!(StyleField::from_tag(field.tag()), Some(field));
        }
        assert_eq!(StyleField::from_tag(0), None);
        assert_eq!(StyleField::from_tag(11), None);
        assert_eq!(StyleField::Label.name(), "label");
    }

    #[test]
    fn empty_style_is_one_tag() {
        let buffer = encode(&Style::default(), StyleKind::Marker);
        assert_eq!(buffer.to_bit_string(), "0000");
    }

    #[test]
    fn defaults_encode_like_empty() {
        for kind in [
            StyleKind::Marker,
            StyleKind::Line,
            StyleKind::Fill,
            StyleKind::Stroke,
        ] {
            let buffer = encode(&kind.defaults(), kind);
            assert_eq!(buffer.bit_len(), 4, "{kind:?} defaults should cost nothing");
        }
    }

    #[test]
    fn near_default_values_are_dropped() {
        let style = Style {
            opacity: Some(0.996),
            halo: Some(1.04),
            ..Style::default()
        };
        assert_eq!(encode(&style, StyleKind::Marker).bit_len(), 4);
    }

    #[test]
    fn defaults_depend_on_kind() {
        let white = Style {
            color: Some(Color::rgb(0xFF, 0xFF, 0xFF)),
            ..Style::default()
        };
        assert_eq!(encode(&white, StyleKind::Fill).bit_len(), 4);
        assert!(encode(&white, StyleKind::Stroke).bit_len() > 4);
    }

    #[test]
    fn full_style_roundtrip() {
        let style = Style {
            color: Some(Color::rgba(1, 2, 3, 4)),
            halo: Some(2.5),
            opacity: Some(0.75),
            pattern: Some(7),
            rotation: Some(-45.0),
            size: Some(3.2),
            width: Some(0.5),
            align: Some(3),
            label: Some("Fuente".to_string()),
            visible: Some(false),
        };
        assert_eq!(roundtrip(&style, StyleKind::Marker), style);
    }

    #[test]
    fn numeric_fields_are_rounded() {
        let style = Style {
            halo: Some(1.234),
            opacity: Some(0.123),
            rotation: Some(10.6),
            ..Style::default()
        };
        let decoded = roundtrip(&style, StyleKind::Line);
        assert_eq!(decoded.halo, Some(1.2));
        assert_eq!(decoded.opacity, Some(0.12));
        assert_eq!(decoded.rotation, Some(11.0));
        assert_eq!(decoded, style.quantized(StyleKind::Line).unwrap());
    }

    #[test]
    fn canonical_order_on_wire() {
        let style = Style {
            visible: Some(false),
            halo: Some(2.0),
            ..Style::default()
        };
        let bits = encode(&style, StyleKind::Marker).to_bit_string();
        // halo tag, 20 as varint, visible tag, false, end.
        assert_eq!(bits, "0010101000101000000");
    }

    #[test]
    fn negative_unsigned_rejected() {
        let style = Style {
            width: Some(-1.0),
            ..Style::default()
        };
        let mut writer = BitWriter::new();
        let err = write_style(&mut writer, &style, StyleKind::Line).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidValue {
                field: ValueField::Style(StyleField::Width),
                reason: ValueReason::Negative,
            }
        );
    }

    #[test]
    fn unknown_tag_rejected() {
        let mut writer = BitWriter::new();
        writer.write_bits(11, 4).unwrap();
        let buffer = writer.finish();
        let err = read_style(&mut buffer.reader(), &CodecLimits::default()).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownTag {
                record: RecordKind::Style,
                tag: 11,
            }
        );
        assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
    }

    #[test]
    fn repeated_tag_rejected() {
        let mut writer = BitWriter::new();
        for _ in 0..2 {
            writer.write_bits(u64::from(StyleField::Visible.tag()), 4).unwrap();
            writer.write_bit(false);
        }
        writer.write_bits(0, 4).unwrap();
        let buffer = writer.finish();
        let err = read_style(&mut buffer.reader(), &CodecLimits::default()).unwrap_err();
        assert!(matches!(err, CodecError::TagOutOfOrder { .. }));
    }

    #[test]
    fn missing_end_tag_underruns() {
        let mut writer = BitWriter::new();
        writer.write_bits(u64::from(StyleField::Visible.tag()), 4).unwrap();
        writer.write_bit(false);
        let buffer = writer.finish();
        let err = read_style(&mut buffer.reader(), &CodecLimits::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferUnderrun);
    }

    #[test]
    fn resolve_fills_defaults() {
        let style = Style {
            width: Some(5.0),
            ..Style::default()
        };
        let resolved = style.resolve(StyleKind::Fill);
        assert_eq!(resolved.width, Some(5.0));
        assert_eq!(resolved.opacity, Some(0.4));
        assert_eq!(resolved.color, Some(Color::rgb(0xFF, 0xFF, 0xFF)));
        assert_eq!(resolved.fields().count(), StyleField::ALL.len());
    }

    #[test]
    fn fields_lists_present() {
        let style = Style {
            label: Some("x".to_string()),
            color: Some(Color::default()),
            ..Style::default()
        };
        let fields: Vec<_> = style.fields().collect();
        assert_eq!(fields, vec![StyleField::Color, StyleField::Label]);
        assert!(Style::default().is_empty());
    }
}
