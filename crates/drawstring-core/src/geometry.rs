//! Bounds and hit-testing over the shape store.

use crate::shapes::Shape;
use kurbo::{Point, Rect, Vec2};

/// Screen-space pick tolerance in pixels, divided by zoom before use.
pub const PICK_TOLERANCE: f64 = 5.0;

/// Axis-aligned bounds of a shape, padded by half its stroke size.
pub fn bounds(shape: &Shape) -> Rect {
    shape.bounds()
}

/// Convert a screen-space tolerance to world units at the given zoom.
pub fn world_tolerance(screen_tolerance: f64, zoom: f64) -> f64 {
    screen_tolerance / zoom
}

/// Find the top-most shape whose padded bounds, grown by `tolerance`
/// (world units), contain `point`.
///
/// Shapes are scanned from last-inserted to first so visually occluding
/// shapes win.
pub fn hit_test<'a>(shapes: &'a [Shape], point: Point, tolerance: f64) -> Option<&'a Shape> {
    if !is_finite_point(point) {
        return None;
    }
    shapes.iter().rev().find(|shape| shape.hit_test(point, tolerance))
}

pub fn is_finite_point(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

pub fn is_finite_vec(vec: Vec2) -> bool {
    vec.x.is_finite() && vec.y.is_finite()
}
