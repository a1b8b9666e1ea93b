//! Shape definitions for the sketchpad.

mod stroke;

pub use stroke::{Stroke, StrokePoint};

use crate::error::{CoreError, CoreResult};
use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable RGBA8 color carried by shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// CSS named colors accepted by [`ShapeColor::parse`].
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("navy", [0, 0, 128]),
    ("teal", [0, 128, 128]),
];

impl ShapeColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse a hex (`#rgb`, `#rrggbb`, `#rrggbbaa`) or CSS named color.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        let invalid = || CoreError::InvalidColor(input.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
            return match hex.len() {
                3 => {
                    // #rgb -> #rrggbb
                    let r = channel(&hex[0..1])? * 17;
                    let g = channel(&hex[1..2])? * 17;
                    let b = channel(&hex[2..3])? * 17;
                    Ok(Self::rgb(r, g, b))
                }
                6 => Ok(Self::rgb(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                )),
                8 => Ok(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    channel(&hex[6..8])?,
                )),
                _ => Err(invalid()),
            };
        }

        let lower = trimmed.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, [r, g, b])| Self::rgb(*r, *g, *b))
            .ok_or_else(invalid)
    }

    /// Format as `#rrggbb` (or `#rrggbbaa` when not opaque).
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// A random opaque color for a fresh brush.
    pub fn random() -> Self {
        // The first bytes of a v4 uuid are fully random.
        let bytes = Uuid::new_v4().into_bytes();
        Self::rgb(bytes[0], bytes[1], bytes[2])
    }
}

impl Default for ShapeColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for ShapeColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<ShapeColor> for Color {
    fn from(color: ShapeColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by all shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub color: ShapeColor,
    /// Stroke thickness in world units.
    pub size: f64,
}

impl ShapeStyle {
    pub fn new(color: ShapeColor, size: f64) -> Self {
        Self { color, size }
    }

    /// Get the color as a peniko Color.
    pub fn color(&self) -> Color {
        self.color.into()
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: ShapeColor::black(),
            size: 2.0,
        }
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Bounding box in world coordinates, padded by half the stroke size.
    fn bounds(&self) -> Rect;

    /// Check if a world point falls inside the padded bounds grown by `tolerance`.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let bounds = self.bounds();
        point.x >= bounds.x0 - tolerance
            && point.x <= bounds.x1 + tolerance
            && point.y >= bounds.y0 - tolerance
            && point.y <= bounds.y1 + tolerance
    }

    /// Path used for rendering.
    fn to_path(&self) -> BezPath;

    fn style(&self) -> &ShapeStyle;

    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Move every point by `delta`.
    fn translate(&mut self, delta: Vec2);

    /// Number of geometry points.
    fn point_count(&self) -> usize;
}

/// Closed set of shape kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Stroke(Stroke),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Stroke(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Stroke(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Stroke(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Stroke(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Stroke(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Stroke(s) => s.style_mut(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Stroke(s) => s.translate(delta),
        }
    }

    pub fn point_count(&self) -> usize {
        match self {
            Shape::Stroke(s) => s.point_count(),
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Shape::Stroke(s) => Some(s),
        }
    }
}

impl From<Stroke> for Shape {
    fn from(stroke: Stroke) -> Self {
        Shape::Stroke(stroke)
    }
}
