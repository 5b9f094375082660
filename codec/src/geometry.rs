//! Fixed-point coordinates and delta-encoded point sequences.

use bitstream::{BitReader, BitWriter, MAX_SAFE_INTEGER};

use crate::error::{CodecError, CodecResult, LimitKind, ValueField, ValueReason};
use crate::limits::CodecLimits;
use crate::types::{Level, Point};

/// Largest magnitude of a quantized coordinate.
///
/// Keeps the difference of any two coordinates within the signed varint range.
pub const MAX_COORD_UNITS: i64 = (1 << 51) - 1;

/// Snaps `value` degrees to the grid of `level`, rounding half up.
pub fn quantize_coord(value: f64, level: Level) -> CodecResult<i64> {
    let units = round_scaled(value, level.scale(), ValueField::Coordinate)?;
    if units.abs() > MAX_COORD_UNITS as f64 {
        return Err(out_of_range(ValueField::Coordinate));
    }
    Ok(units as i64)
}

/// Converts grid units back to degrees.
#[must_use]
pub fn dequantize_coord(units: i64, level: Level) -> f64 {
    units as f64 / level.scale()
}

/// Rounds a non-negative value scaled by `scale` to an integer no larger than `max`.
pub(crate) fn quantize_unsigned(
    value: f64,
    scale: f64,
    max: u64,
    field: ValueField,
) -> CodecResult<u64> {
    let units = round_scaled(value, scale, field)?;
    if units < 0.0 {
        return Err(CodecError::InvalidValue {
            field,
            reason: ValueReason::Negative,
        });
    }
    if units > max as f64 {
        return Err(out_of_range(field));
    }
    Ok(units as u64)
}

/// Rounds a value scaled by `scale` to an integer of magnitude at most `max_abs`.
pub(crate) fn quantize_signed(
    value: f64,
    scale: f64,
    max_abs: i64,
    field: ValueField,
) -> CodecResult<i64> {
    let units = round_scaled(value, scale, field)?;
    if units.abs() > max_abs as f64 {
        return Err(out_of_range(field));
    }
    Ok(units as i64)
}

/// Rounds a radius to whole meters.
pub(crate) fn quantize_radius(radius: f64) -> CodecResult<u64> {
    quantize_unsigned(radius, 1.0, MAX_SAFE_INTEGER, ValueField::Radius)
}

fn round_scaled(value: f64, scale: f64, field: ValueField) -> CodecResult<f64> {
    let units = (value * scale + 0.5).floor();
    if !units.is_finite() {
        return Err(CodecError::InvalidValue {
            field,
            reason: ValueReason::NonFinite,
        });
    }
    Ok(units)
}

const fn out_of_range(field: ValueField) -> CodecError {
    CodecError::InvalidValue {
        field,
        reason: ValueReason::OutOfRange,
    }
}

fn check_coord_units(units: i64) -> CodecResult<i64> {
    if units.abs() > MAX_COORD_UNITS {
        return Err(out_of_range(ValueField::Coordinate));
    }
    Ok(units)
}

/// Writes a point as two signed varints, longitude first.
pub fn write_point(writer: &mut BitWriter, point: Point, level: Level) -> CodecResult<()> {
    let lng = quantize_coord(point.lng, level)?;
    let lat = quantize_coord(point.lat, level)?;
    writer.write_svarint(lng)?;
    writer.write_svarint(lat)?;
    Ok(())
}

/// Reads a point written by [`write_point`].
pub fn read_point(reader: &mut BitReader<'_>, level: Level) -> CodecResult<Point> {
    let lng = check_coord_units(reader.read_svarint()?)?;
    let lat = check_coord_units(reader.read_svarint()?)?;
    Ok(Point::new(
        dequantize_coord(lng, level),
        dequantize_coord(lat, level),
    ))
}

/// Writes a point count, the first point absolute and every later point as a
/// delta from its predecessor in grid units.
pub fn write_points(writer: &mut BitWriter, points: &[Point], level: Level) -> CodecResult<()> {
    writer.write_varint(points.len() as u64)?;
    let mut previous = (0i64, 0i64);
    for point in points {
        let current = (
            quantize_coord(point.lng, level)?,
            quantize_coord(point.lat, level)?,
        );
        writer.write_svarint(current.0 - previous.0)?;
        writer.write_svarint(current.1 - previous.1)?;
        previous = current;
    }
    Ok(())
}

/// Reads a point sequence written by [`write_points`].
pub fn read_points(
    reader: &mut BitReader<'_>,
    level: Level,
    limits: &CodecLimits,
) -> CodecResult<Vec<Point>> {
    let count = read_count(reader, LimitKind::Points, limits.max_points)?;
    // Every point costs at least two groups, so the remaining input bounds the allocation.
    let mut points = Vec::with_capacity(count.min(reader.bits_remaining() / 12));
    let mut lng = 0i64;
    let mut lat = 0i64;
    for _ in 0..count {
        lng = accumulate(lng, reader.read_svarint()?)?;
        lat = accumulate(lat, reader.read_svarint()?)?;
        points.push(Point::new(
            dequantize_coord(lng, level),
            dequantize_coord(lat, level),
        ));
    }
    Ok(points)
}

fn accumulate(previous: i64, delta: i64) -> CodecResult<i64> {
    let next = previous
        .checked_add(delta)
        .ok_or_else(|| out_of_range(ValueField::Coordinate))?;
    check_coord_units(next)
}

/// Reads a varint count and checks it against `limit` before anything is allocated.
pub(crate) fn read_count(
    reader: &mut BitReader<'_>,
    kind: LimitKind,
    limit: usize,
) -> CodecResult<usize> {
    let raw = reader.read_varint()?;
    let count = usize::try_from(raw).unwrap_or(usize::MAX);
    if count > limit {
        return Err(CodecError::LimitsExceeded {
            kind,
            limit,
            actual: count,
        });
    }
    Ok(count)
}
