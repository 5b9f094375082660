//! Root and element records.

use bitstream::{BitReader, BitWriter};

use crate::error::{CodecError, CodecResult, LimitKind, RecordKind};
use crate::geometry::{quantize_radius, read_count, read_point, read_points, write_point, write_points};
use crate::limits::CodecLimits;
use crate::style::{read_style, write_style, StyleKind};
use crate::tag::{read_tag, write_tag, TagOrder, ELEMENT_TYPE_BITS, END_TAG};
use crate::types::{
    CircleElement, ElementType, Level, LineElement, MarkerElement, PolygonElement, StateElement,
    StateRoot, Viewport,
};

/// Root record tag for the viewport.
pub const ROOT_TAG_VIEWPORT: u8 = 1;

/// Root record tag for the element list.
pub const ROOT_TAG_ELEMENTS: u8 = 2;

/// Writes the root record: viewport, elements, end tag.
///
/// Absent parts are skipped, so an empty state is a single end tag.
pub fn write_root(writer: &mut BitWriter, root: &StateRoot) -> CodecResult<()> {
    if let Some(viewport) = &root.viewport {
        write_tag(writer, ROOT_TAG_VIEWPORT)?;
        write_viewport(writer, viewport)?;
    }
    if !root.elements.is_empty() {
        write_tag(writer, ROOT_TAG_ELEMENTS)?;
        writer.write_varint(root.elements.len() as u64)?;
        for element in &root.elements {
            write_element(writer, element)?;
        }
    }
    write_tag(writer, END_TAG)
}

/// Reads a root record written by [`write_root`].
pub fn read_root(reader: &mut BitReader<'_>, limits: &CodecLimits) -> CodecResult<StateRoot> {
    let mut root = StateRoot::default();
    let mut order = TagOrder::new(RecordKind::Root);
    loop {
        let tag = read_tag(reader)?;
        match tag {
            END_TAG => return Ok(root),
            ROOT_TAG_VIEWPORT => {
                order.accept(tag)?;
                root.viewport = Some(read_viewport(reader)?);
            }
            ROOT_TAG_ELEMENTS => {
                order.accept(tag)?;
                let count = read_element_count(reader, limits)?;
                // Each element needs at least its type code.
                let capacity = count.min(reader.bits_remaining() / usize::from(ELEMENT_TYPE_BITS));
                let mut elements = Vec::with_capacity(capacity);
                for _ in 0..count {
                    elements.push(read_element(reader, limits)?);
                }
                root.elements = elements;
            }
            _ => {
                return Err(CodecError::UnknownTag {
                    record: RecordKind::Root,
                    tag,
                })
            }
        }
    }
}

fn write_viewport(writer: &mut BitWriter, viewport: &Viewport) -> CodecResult<()> {
    write_point(writer, viewport.center, Level::DEFAULT)?;
    writer.write_varint(quantize_radius(viewport.radius)?)?;
    Ok(())
}

/// Reads the body of a viewport record, after its tag.
pub fn read_viewport(reader: &mut BitReader<'_>) -> CodecResult<Viewport> {
    let center = read_point(reader, Level::DEFAULT)?;
    let radius = reader.read_varint()? as f64;
    Ok(Viewport { center, radius })
}

/// Reads the element count that follows [`ROOT_TAG_ELEMENTS`].
pub fn read_element_count(reader: &mut BitReader<'_>, limits: &CodecLimits) -> CodecResult<usize> {
    read_count(reader, LimitKind::Elements, limits.max_elements)
}

/// Writes an element's type code and body.
pub fn write_element(writer: &mut BitWriter, element: &StateElement) -> CodecResult<()> {
    let level = Level::DEFAULT;
    writer.write_bits(
        u64::from(element.element_type().code()),
        ELEMENT_TYPE_BITS,
    )?;
    match element {
        StateElement::Marker(marker) => {
            write_point(writer, marker.point, level)?;
            write_style(writer, &marker.style, StyleKind::Marker)
        }
        StateElement::Line(line) => {
            write_points(writer, &line.points, level)?;
            write_style(writer, &line.style, StyleKind::Line)
        }
        StateElement::Polygon(polygon) => {
            write_points(writer, &polygon.points, level)?;
            write_style(writer, &polygon.fill, StyleKind::Fill)?;
            write_style(writer, &polygon.stroke, StyleKind::Stroke)
        }
        StateElement::Circle(circle) => {
            write_point(writer, circle.center, level)?;
            writer.write_varint(quantize_radius(circle.radius)?)?;
            write_style(writer, &circle.fill, StyleKind::Fill)?;
            write_style(writer, &circle.stroke, StyleKind::Stroke)
        }
    }
}

/// Reads an element written by [`write_element`].
pub fn read_element(reader: &mut BitReader<'_>, limits: &CodecLimits) -> CodecResult<StateElement> {
    let level = Level::DEFAULT;
    let raw = reader.read_bits(ELEMENT_TYPE_BITS)? as u8;
    let element_type = ElementType::from_raw(raw).ok_or(CodecError::UnknownTag {
        record: RecordKind::Element,
        tag: raw,
    })?;
    let element = match element_type {
        ElementType::Marker => StateElement::Marker(MarkerElement {
            point: read_point(reader, level)?,
            style: read_style(reader, limits)?,
        }),
        ElementType::Line => StateElement::Line(LineElement {
            points: read_points(reader, level, limits)?,
            style: read_style(reader, limits)?,
        }),
        ElementType::Polygon => StateElement::Polygon(PolygonElement {
            points: read_points(reader, level, limits)?,
            fill: read_style(reader, limits)?,
            stroke: read_style(reader, limits)?,
        }),
        ElementType::Circle => StateElement::Circle(CircleElement {
            center: read_point(reader, level)?,
            radius: reader.read_varint()? as f64,
            fill: read_style(reader, limits)?,
            stroke: read_style(reader, limits)?,
        }),
    };
    Ok(element)
}
