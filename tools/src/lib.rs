//! Introspection and debugging tools for mapstate hashes.
//!
//! This crate provides utilities for understanding encoded map state:
//!
//! - Break a hash down into per-record bit spans ([`inspect_hash`])
//! - Render a decoded state for humans ([`format_state_pretty`])
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see where the bits go.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use bitstream::{BitBuffer, BitReader};
use codec::{
    expect_padding, read_element, read_element_count, read_tag, read_viewport, CodecError,
    CodecLimits, DecodeOptions, Point, RecordKind, StateElement, StateRoot, Style, StyleField,
    TagOrder, END_TAG, HASH_PAD_BITS, ROOT_TAG_ELEMENTS, ROOT_TAG_VIEWPORT, STATE_PAD_BITS,
};
use serde::Serialize;

/// Which transport an input string uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Uncompressed shareable hash.
    Hash,
    /// Deflated auto-save.
    Autosave,
}

/// Where the bits of one hash go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub transport: Transport,
    pub chars: usize,
    /// Logical bits carried by the transport.
    pub total_bits: usize,
    /// Bits used by the root record.
    pub root_bits: usize,
    /// Zero bits after the root record.
    pub padding_bits: usize,
    pub viewport: Option<BitSpan>,
    pub elements: Vec<ElementReport>,
}

/// A contiguous range of bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BitSpan {
    pub start: usize,
    pub len: usize,
}

/// One element of the root record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementReport {
    pub index: usize,
    pub element_type: &'static str,
    pub points: usize,
    /// Fields present in each style record, in wire order.
    pub style_fields: Vec<Vec<&'static str>>,
    pub span: BitSpan,
}

/// Decodes the transport of `input` and walks the root record, recording
/// the bit span of every part.
///
/// The walk applies the same tag-order, limit and padding checks as the
/// decoders, so any input reported here also decodes.
pub fn inspect_hash(
    input: &str,
    transport: Transport,
    options: &DecodeOptions,
) -> Result<InspectReport> {
    let (buffer, pad_width) = match transport {
        Transport::Hash => {
            let buffer = wire::from_base64(input, &options.wire).context("decode hash symbols")?;
            (buffer, HASH_PAD_BITS)
        }
        Transport::Autosave => {
            let bytes = wire::from_base64_compressed(input, &options.wire)
                .context("inflate autosave")?;
            (BitBuffer::from_bytes(bytes), STATE_PAD_BITS)
        }
    };

    let mut reader = buffer.reader();
    let mut report = InspectReport {
        transport,
        chars: input.chars().count(),
        total_bits: buffer.bit_len(),
        root_bits: 0,
        padding_bits: 0,
        viewport: None,
        elements: Vec::new(),
    };

    let mut order = TagOrder::new(RecordKind::Root);
    loop {
        let position = reader.bit_position();
        let tag = read_tag(&mut reader).context("read root tag")?;
        match tag {
            END_TAG => break,
            ROOT_TAG_VIEWPORT => {
                order.accept(tag).with_context(|| format!("root tag at bit {position}"))?;
                let start = reader.bit_position();
                read_viewport(&mut reader).context("read viewport")?;
                report.viewport = Some(span_from(start, &reader));
            }
            ROOT_TAG_ELEMENTS => {
                order.accept(tag).with_context(|| format!("root tag at bit {position}"))?;
                report.elements = inspect_elements(&mut reader, &options.limits)?;
            }
            _ => {
                return Err(CodecError::UnknownTag {
                    record: RecordKind::Root,
                    tag,
                })
                .with_context(|| format!("root tag at bit {position}"));
            }
        }
    }

    report.root_bits = reader.bit_position();
    report.padding_bits = reader.bits_remaining();
    expect_padding(&mut reader, pad_width)
        .with_context(|| format!("after root record at bit {}", report.root_bits))?;
    Ok(report)
}

fn inspect_elements(
    reader: &mut BitReader<'_>,
    limits: &CodecLimits,
) -> Result<Vec<ElementReport>> {
    let count = read_element_count(reader, limits).context("read element count")?;
    let mut elements = Vec::with_capacity(count.min(reader.bits_remaining()));
    for index in 0..count {
        let start = reader.bit_position();
        let element = read_element(reader, limits)
            .with_context(|| format!("read element {index} at bit {start}"))?;
        elements.push(describe_element(index, &element, span_from(start, reader)));
    }
    Ok(elements)
}

fn span_from(start: usize, reader: &BitReader<'_>) -> BitSpan {
    BitSpan {
        start,
        len: reader.bit_position() - start,
    }
}

fn describe_element(index: usize, element: &StateElement, span: BitSpan) -> ElementReport {
    let (points, styles): (usize, Vec<&Style>) = match element {
        StateElement::Marker(marker) => (1, vec![&marker.style]),
        StateElement::Line(line) => (line.points.len(), vec![&line.style]),
        StateElement::Polygon(polygon) => {
            (polygon.points.len(), vec![&polygon.fill, &polygon.stroke])
        }
        StateElement::Circle(circle) => (1, vec![&circle.fill, &circle.stroke]),
    };
    ElementReport {
        index,
        element_type: element.element_type().name(),
        points,
        style_fields: styles
            .into_iter()
            .map(|style| style.fields().map(StyleField::name).collect())
            .collect(),
        span,
    }
}

/// Renders an inspect report as indented text.
pub fn format_report_pretty(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:?}: {} chars, {} bits ({} root, {} padding)",
        report.transport, report.chars, report.total_bits, report.root_bits, report.padding_bits
    );
    match report.viewport {
        Some(span) => {
            let _ = writeln!(out, "viewport: {} bits at {}", span.len, span.start);
        }
        None => {
            let _ = writeln!(out, "viewport: none");
        }
    }
    let _ = writeln!(out, "elements: {}", report.elements.len());
    for element in &report.elements {
        let styles = element
            .style_fields
            .iter()
            .map(|fields| {
                if fields.is_empty() {
                    "-".to_string()
                } else {
                    fields.join(",")
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        let _ = writeln!(
            out,
            "  [{}] {} {} point(s), {} bits at {}, styles: {}",
            element.index,
            element.element_type,
            element.points,
            element.span.len,
            element.span.start,
            styles
        );
    }
    out
}

/// Renders a decoded state as indented text.
pub fn format_state_pretty(root: &StateRoot) -> String {
    let mut out = String::new();
    match &root.viewport {
        Some(viewport) => {
            let _ = writeln!(
                out,
                "viewport: {} radius {} m",
                format_point(viewport.center),
                viewport.radius
            );
        }
        None => {
            let _ = writeln!(out, "viewport: none");
        }
    }
    let _ = writeln!(out, "elements: {}", root.elements.len());
    for (index, element) in root.elements.iter().enumerate() {
        let kind = element.element_type();
        let _ = match element {
            StateElement::Marker(marker) => writeln!(
                out,
                "  [{index}] {} {} style: {}",
                kind.name(),
                format_point(marker.point),
                format_style(&marker.style)
            ),
            StateElement::Line(line) => writeln!(
                out,
                "  [{index}] {} {} point(s) style: {}",
                kind.name(),
                line.points.len(),
                format_style(&line.style)
            ),
            StateElement::Polygon(polygon) => writeln!(
                out,
                "  [{index}] {} {} point(s) fill: {} stroke: {}",
                kind.name(),
                polygon.points.len(),
                format_style(&polygon.fill),
                format_style(&polygon.stroke)
            ),
            StateElement::Circle(circle) => writeln!(
                out,
                "  [{index}] {} {} radius {} m fill: {} stroke: {}",
                kind.name(),
                format_point(circle.center),
                circle.radius,
                format_style(&circle.fill),
                format_style(&circle.stroke)
            ),
        };
    }
    out
}

fn format_point(point: Point) -> String {
    format!("[{:.6}, {:.6}]", point.lng, point.lat)
}

fn format_style(style: &Style) -> String {
    if style.is_empty() {
        return "(default)".to_string();
    }
    style
        .fields()
        .map(|field| format!("{}={}", field.name(), style_value(style, field)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn style_value(style: &Style, field: StyleField) -> String {
    let number = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    match field {
        StyleField::Color => style.color.map(|c| c.to_hex()).unwrap_or_default(),
        StyleField::Halo => number(style.halo),
        StyleField::Opacity => number(style.opacity),
        StyleField::Pattern => style.pattern.map(|v| v.to_string()).unwrap_or_default(),
        StyleField::Rotation => number(style.rotation),
        StyleField::Size => number(style.size),
        StyleField::Width => number(style.width),
        StyleField::Align => style.align.map(|v| v.to_string()).unwrap_or_default(),
        StyleField::Label => format!("{:?}", style.label.as_deref().unwrap_or_default()),
        StyleField::Visible => style.visible.map(|v| v.to_string()).unwrap_or_default(),
    }
}
