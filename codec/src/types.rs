//! The in-memory map state tree.
//!
//! Everything here is a plain value: encoders borrow it, decoders build a
//! fresh one per call.

use crate::error::CodecResult;
use crate::geometry::{quantize_coord, quantize_radius};
use crate::style::{Style, StyleKind};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "[f64; 2]", into = "[f64; 2]")
)]
pub struct Point {
    pub lng: f64,
    pub lat: f64,
}

impl Point {
    /// Creates a point from longitude and latitude.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Snaps both coordinates to the grid of `level`.
    pub fn quantized(self, level: Level) -> CodecResult<Self> {
        let scale = level.scale();
        Ok(Self {
            lng: quantize_coord(self.lng, level)? as f64 / scale,
            lat: quantize_coord(self.lat, level)? as f64 / scale,
        })
    }
}

impl From<[f64; 2]> for Point {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.lng, point.lat]
    }
}

/// Fixed-point precision of encoded coordinates.
///
/// A level `L` stores coordinates as integer multiples of `2^-(L+2)` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(i8);

impl Level {
    /// Coarsest supported level (one unit is 2^14 degrees).
    pub const MIN: Self = Self(-16);

    /// Finest supported level.
    pub const MAX: Self = Self(32);

    /// Roughly one meter at the equator.
    pub const DEFAULT: Self = Self(15);

    /// Creates a level, or `None` outside `MIN..=MAX`.
    #[must_use]
    pub const fn new(level: i8) -> Option<Self> {
        if level < Self::MIN.0 || level > Self::MAX.0 {
            None
        } else {
            Some(Self(level))
        }
    }

    /// Returns the raw level.
    #[must_use]
    pub const fn raw(self) -> i8 {
        self.0
    }

    /// Number of grid units per degree.
    #[must_use]
    pub fn scale(self) -> f64 {
        2f64.powi(i32::from(self.0) + 2)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The visible map area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub center: Point,
    /// View radius in meters.
    pub radius: f64,
}

/// A single point with a marker style.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerElement {
    pub point: Point,
    #[cfg_attr(feature = "serde", serde(default))]
    pub style: Style,
}

/// An open path.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineElement {
    pub points: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub style: Style,
}

/// A closed ring with separate fill and outline styles.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolygonElement {
    pub points: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fill: Style,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stroke: Style,
}

/// A circle given by center and radius in meters.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircleElement {
    pub center: Point,
    pub radius: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fill: Style,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stroke: Style,
}

/// One drawn feature.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum StateElement {
    Marker(MarkerElement),
    Line(LineElement),
    Polygon(PolygonElement),
    Circle(CircleElement),
}

impl StateElement {
    /// Returns the type code written before the element body.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Marker(_) => ElementType::Marker,
            Self::Line(_) => ElementType::Line,
            Self::Polygon(_) => ElementType::Polygon,
            Self::Circle(_) => ElementType::Circle,
        }
    }

    /// Applies the precision loss of an encode/decode round trip.
    pub fn quantized(&self) -> CodecResult<Self> {
        let level = Level::DEFAULT;
        Ok(match self {
            Self::Marker(marker) => Self::Marker(MarkerElement {
                point: marker.point.quantized(level)?,
                style: marker.style.quantized(StyleKind::Marker)?,
            }),
            Self::Line(line) => Self::Line(LineElement {
                points: quantize_points(&line.points, level)?,
                style: line.style.quantized(StyleKind::Line)?,
            }),
            Self::Polygon(polygon) => Self::Polygon(PolygonElement {
                points: quantize_points(&polygon.points, level)?,
                fill: polygon.fill.quantized(StyleKind::Fill)?,
                stroke: polygon.stroke.quantized(StyleKind::Stroke)?,
            }),
            Self::Circle(circle) => Self::Circle(CircleElement {
                center: circle.center.quantized(level)?,
                radius: quantize_radius(circle.radius)? as f64,
                fill: circle.fill.quantized(StyleKind::Fill)?,
                stroke: circle.stroke.quantized(StyleKind::Stroke)?,
            }),
        })
    }
}

fn quantize_points(points: &[Point], level: Level) -> CodecResult<Vec<Point>> {
    points.iter().map(|point| point.quantized(level)).collect()
}

/// Element type codes. The numbering is part of the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementType {
    Marker = 0,
    Line = 1,
    Polygon = 2,
    Circle = 3,
}

impl ElementType {
    /// Parses a type code.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Marker),
            1 => Some(Self::Line),
            2 => Some(Self::Polygon),
            3 => Some(Self::Circle),
            _ => None,
        }
    }

    /// Returns the type code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns a lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Line => "line",
            Self::Polygon => "polygon",
            Self::Circle => "circle",
        }
    }
}

/// The complete editable map state.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateRoot {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub viewport: Option<Viewport>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elements: Vec<StateElement>,
}

impl StateRoot {
    /// Returns `true` if there is neither a viewport nor any element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.viewport.is_none() && self.elements.is_empty()
    }

    /// Returns the state a decoder reconstructs after encoding `self`.
    ///
    /// Points snap to the level grid, radii round to whole meters, numeric
    /// style fields round to their scale and style fields equal to their
    /// component default are dropped.
    ///
    /// # Errors
    ///
    /// Fails exactly when encoding `self` would fail.
    pub fn quantized(&self) -> CodecResult<Self> {
        let viewport = match &self.viewport {
            Some(viewport) => Some(Viewport {
                center: viewport.center.quantized(Level::DEFAULT)?,
                radius: quantize_radius(viewport.radius)? as f64,
            }),
            None => None,
        };
        let elements = self
            .elements
            .iter()
            .map(StateElement::quantized)
            .collect::<CodecResult<Vec<_>>>()?;
        Ok(Self { viewport, elements })
    }
}
