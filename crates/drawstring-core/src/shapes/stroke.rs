//! Freehand stroke shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::error::{CoreError, CoreResult};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sampled stroke point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    /// Input pressure in `[0, 1]`. Captured but not used for rendering.
    pub pressure: f64,
}

impl StrokePoint {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Point> for StrokePoint {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y, 1.0)
    }
}

/// A freehand poly-line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: ShapeId,
    /// Points in drawing order.
    points: Vec<StrokePoint>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Stroke {
    /// Create an empty stroke with the given style.
    pub fn new(style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            style,
        }
    }

    /// Create from existing world points with full pressure.
    pub fn from_points(points: impl IntoIterator<Item = Point>, style: ShapeStyle) -> Self {
        let mut stroke = Self::new(style);
        stroke.points = points
            .into_iter()
            .map(StrokePoint::from)
            .filter(StrokePoint::is_finite)
            .collect();
        stroke
    }

    /// Append a point. Non-finite points are rejected.
    pub fn add_point(&mut self, point: StrokePoint) -> CoreResult<()> {
        if !point.is_finite() {
            return Err(CoreError::NonFinitePoint {
                x: point.x,
                y: point.y,
            });
        }
        self.points.push(point);
        Ok(())
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A single-point stroke renders as a dot.
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    /// Bounds of the raw points, without stroke padding.
    fn point_bounds(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let mut rect = Rect::from_points(first.position(), first.position());
        for point in &self.points[1..] {
            rect = rect.union_pt(point.position());
        }
        Some(rect)
    }
}

/// Midpoint of two stroke points.
fn midpoint(a: &StrokePoint, b: &StrokePoint) -> Point {
    a.position().midpoint(b.position())
}

impl ShapeTrait for Stroke {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let Some(rect) = self.point_bounds() else {
            return Rect::ZERO;
        };
        let pad = self.style.size / 2.0;
        rect.inflate(pad, pad)
    }

    /// Smoothed path: a line to the first midpoint, quadratic segments through
    /// each interior point to the next midpoint, then a line into the last point.
    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let points = &self.points;

        let Some(first) = points.first() else {
            return path;
        };
        path.move_to(first.position());
        if points.len() == 1 {
            return path;
        }

        path.line_to(midpoint(&points[0], &points[1]));
        for i in 1..points.len() - 1 {
            path.quad_to(points[i].position(), midpoint(&points[i], &points[i + 1]));
        }
        path.line_to(points[points.len() - 1].position());

        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            point.x += delta.x;
            point.y += delta.y;
        }
    }

    fn point_count(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    fn stroke(points: &[(f64, f64)], size: f64) -> Stroke {
        Stroke::from_points(
            points.iter().map(|&(x, y)| Point::new(x, y)),
            ShapeStyle::new(Default::default(), size),
        )
    }

    #[test]
    fn test_stroke_creation() {
        let stroke = Stroke::new(ShapeStyle::default());
        assert!(stroke.is_empty());
        assert!(!stroke.is_dot());
    }

    #[test]
    fn test_add_points() {
        let mut stroke = Stroke::new(ShapeStyle::default());
        stroke.add_point(StrokePoint::new(0.0, 0.0, 0.5)).unwrap();
        assert!(stroke.is_dot());
        stroke.add_point(StrokePoint::new(10.0, 10.0, 1.0)).unwrap();
        assert_eq!(stroke.len(), 2);
        assert!((stroke.points()[0].pressure - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_non_finite_points() {
        let mut stroke = Stroke::new(ShapeStyle::default());
        let err = stroke.add_point(StrokePoint::new(f64::NAN, 1.0, 1.0));
        assert!(matches!(err, Err(CoreError::NonFinitePoint { .. })));
        assert!(stroke
            .add_point(StrokePoint::new(1.0, f64::INFINITY, 1.0))
            .is_err());
        assert!(stroke.is_empty());

        let filtered = stroke_with_nan();
        assert_eq!(filtered.len(), 1);
    }

    fn stroke_with_nan() -> Stroke {
        Stroke::from_points(
            [Point::new(1.0, 1.0), Point::new(f64::NAN, 0.0)],
            ShapeStyle::default(),
        )
    }

    #[test]
    fn test_bounds_padded_by_half_size() {
        let stroke = stroke(&[(0.0, 0.0), (100.0, 50.0), (50.0, 100.0)], 4.0);

        let bounds = stroke.bounds();
        assert!((bounds.x0 + 2.0).abs() < f64::EPSILON);
        assert!((bounds.y0 + 2.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 102.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 102.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dot_bounds() {
        let stroke = stroke(&[(5.0, 5.0)], 10.0);
        assert_eq!(stroke.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_hit_test_uses_padded_bounds() {
        let stroke = stroke(&[(0.0, 0.0), (100.0, 0.0)], 2.0);

        assert!(stroke.hit_test(Point::new(50.0, 0.0), 0.0));
        assert!(stroke.hit_test(Point::new(50.0, 1.0), 0.0));
        assert!(!stroke.hit_test(Point::new(50.0, 3.0), 0.0));
        assert!(stroke.hit_test(Point::new(50.0, 3.0), 5.0));
    }

    #[test]
    fn test_translate() {
        let mut stroke = stroke(&[(0.0, 0.0), (10.0, 0.0)], 2.0);
        stroke.translate(Vec2::new(3.0, 4.0));
        let positions: Vec<_> = stroke.points().iter().map(StrokePoint::position).collect();
        assert_eq!(positions, vec![Point::new(3.0, 4.0), Point::new(13.0, 4.0)]);
    }

    #[test]
    fn test_two_point_path() {
        let path = stroke(&[(0.0, 0.0), (10.0, 0.0)], 2.0).to_path();
        let els: Vec<PathEl> = path.elements().to_vec();
        assert_eq!(
            els,
            vec![
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(5.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_smoothed_path_uses_midpoints() {
        let path = stroke(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], 2.0).to_path();
        let els: Vec<PathEl> = path.elements().to_vec();
        assert_eq!(
            els,
            vec![
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(5.0, 0.0)),
                PathEl::QuadTo(Point::new(10.0, 0.0), Point::new(10.0, 5.0)),
                PathEl::QuadTo(Point::new(10.0, 10.0), Point::new(5.0, 10.0)),
                PathEl::LineTo(Point::new(0.0, 10.0)),
            ]
        );
    }
}
