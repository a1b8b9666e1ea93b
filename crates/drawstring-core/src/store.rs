//! Shape store: the ordered shapes of the canvas and the current selection.

use crate::error::{CoreError, CoreResult};
use crate::geometry;
use crate::shapes::{Shape, ShapeColor, ShapeId};
use kurbo::{Point, Vec2};

/// Ordered collection of persisted shapes plus the selected shape ids.
///
/// Z-order is insertion order: later shapes draw on top and are hit-tested
/// first. The selection is always a subset of the ids present in the store.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    /// Shapes back to front.
    shapes: Vec<Shape>,
    /// Selected shape ids, in selection order.
    selection: Vec<ShapeId>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape at the top of the z-order.
    pub fn add_shape(&mut self, shape: Shape) -> CoreResult<ShapeId> {
        if shape.point_count() == 0 {
            return Err(CoreError::EmptyShape);
        }
        let id = shape.id();
        self.shapes.push(shape);
        Ok(id)
    }

    /// Shapes back to front.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get_shape(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Top-most shape under a world point.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<&Shape> {
        geometry::hit_test(&self.shapes, point, tolerance)
    }

    /// Replace the selection with a single shape. Unknown ids clear it.
    pub fn select(&mut self, id: ShapeId) {
        self.clear_selection();
        self.add_to_selection(id);
    }

    /// Add a shape to the selection. Unknown ids are ignored.
    pub fn add_to_selection(&mut self, id: ShapeId) {
        if self.contains(id) && !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    pub fn selection(&self) -> &[ShapeId] {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Selected shapes, back to front.
    pub fn selected_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|shape| self.selection.contains(&shape.id()))
    }

    fn selected_shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        let selection = &self.selection;
        self.shapes
            .iter_mut()
            .filter(move |shape| selection.contains(&shape.id()))
    }

    /// Remove every selected shape and clear the selection.
    /// Returns the number of shapes removed.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.shapes.len();
        let selection = std::mem::take(&mut self.selection);
        self.shapes.retain(|shape| !selection.contains(&shape.id()));
        before - self.shapes.len()
    }

    /// Set the color of every selected shape.
    pub fn recolor_selected(&mut self, color: ShapeColor) -> usize {
        let mut count = 0;
        for shape in self.selected_shapes_mut() {
            shape.style_mut().color = color;
            count += 1;
        }
        count
    }

    /// Set the stroke size of every selected shape.
    pub fn resize_selected(&mut self, size: f64) -> CoreResult<usize> {
        if !size.is_finite() || size <= 0.0 {
            return Err(CoreError::InvalidSize(size));
        }
        let mut count = 0;
        for shape in self.selected_shapes_mut() {
            shape.style_mut().size = size;
            count += 1;
        }
        Ok(count)
    }

    /// Move every point of every selected shape by `delta`.
    pub fn translate_selected(&mut self, delta: Vec2) -> usize {
        if !geometry::is_finite_vec(delta) {
            return 0;
        }
        let mut count = 0;
        for shape in self.selected_shapes_mut() {
            shape.translate(delta);
            count += 1;
        }
        count
    }

    /// Overwrite shapes that share an id with one of `originals`.
    pub(crate) fn restore_shapes(&mut self, originals: &[Shape]) {
        for original in originals {
            if let Some(shape) = self.shapes.iter_mut().find(|s| s.id() == original.id()) {
                *shape = original.clone();
            }
        }
    }

    /// Remove all shapes and the selection.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.selection.clear();
    }

    /// Replace the shape sequence, e.g. from a history snapshot.
    /// Selected ids that no longer exist are dropped.
    pub fn replace_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        let shapes = &self.shapes;
        self.selection
            .retain(|id| shapes.iter().any(|shape| shape.id() == *id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ShapeStyle, Stroke, StrokePoint};

    fn stroke(points: &[(f64, f64)]) -> Shape {
        Shape::Stroke(Stroke::from_points(
            points.iter().map(|&(x, y)| Point::new(x, y)),
            ShapeStyle::default(),
        ))
    }

    fn positions(shape: &Shape) -> Vec<Point> {
        shape
            .as_stroke()
            .map(|s| s.points().iter().map(StrokePoint::position).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_add_shape() {
        let mut store = ShapeStore::new();
        let id = store.add_shape(stroke(&[(0.0, 0.0)])).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get_shape(id).is_some());
    }

    #[test]
    fn test_add_empty_shape_rejected() {
        let mut store = ShapeStore::new();
        let err = store.add_shape(Shape::Stroke(Stroke::new(ShapeStyle::default())));
        assert!(matches!(err, Err(CoreError::EmptyShape)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_z_order_is_insertion_order() {
        let mut store = ShapeStore::new();
        let id1 = store.add_shape(stroke(&[(0.0, 0.0)])).unwrap();
        let id2 = store.add_shape(stroke(&[(1.0, 1.0)])).unwrap();
        let ids: Vec<_> = store.shapes().iter().map(Shape::id).collect();
        assert_eq!(ids, vec![id1, id2]);
    }

    #[test]
    fn test_selection() {
        let mut store = ShapeStore::new();
        let id1 = store.add_shape(stroke(&[(0.0, 0.0)])).unwrap();
        let id2 = store.add_shape(stroke(&[(1.0, 1.0)])).unwrap();

        store.select(id1);
        assert!(store.is_selected(id1));
        store.add_to_selection(id2);
        store.add_to_selection(id2);
        assert_eq!(store.selection(), &[id1, id2]);

        store.select(id2);
        assert_eq!(store.selection(), &[id2]);

        store.add_to_selection(uuid::Uuid::new_v4());
        assert_eq!(store.selection(), &[id2]);

        store.clear_selection();
        assert!(!store.has_selection());
    }

    #[test]
    fn test_delete_selected() {
        let mut store = ShapeStore::new();
        let id1 = store.add_shape(stroke(&[(0.0, 0.0)])).unwrap();
        let id2 = store.add_shape(stroke(&[(1.0, 1.0)])).unwrap();
        let id3 = store.add_shape(stroke(&[(2.0, 2.0)])).unwrap();

        store.select(id1);
        store.add_to_selection(id3);
        assert_eq!(store.delete_selected(), 2);

        assert_eq!(store.len(), 1);
        assert!(store.contains(id2));
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_delete_with_empty_selection() {
        let mut store = ShapeStore::new();
        store.add_shape(stroke(&[(0.0, 0.0)])).unwrap();
        assert_eq!(store.delete_selected(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_recolor_and_resize_selected() {
        let mut store = ShapeStore::new();
        let id1 = store.add_shape(stroke(&[(0.0, 0.0)])).unwrap();
        let id2 = store.add_shape(stroke(&[(1.0, 1.0)])).unwrap();
        store.select(id2);

        let red = ShapeColor::rgb(255, 0, 0);
        assert_eq!(store.recolor_selected(red), 1);
        assert_eq!(store.resize_selected(8.0).unwrap(), 1);

        let s2 = store.get_shape(id2).unwrap();
        assert_eq!(s2.style().color, red);
        assert!((s2.style().size - 8.0).abs() < f64::EPSILON);
        let s1 = store.get_shape(id1).unwrap();
        assert_eq!(s1.style(), &ShapeStyle::default());

        assert!(matches!(store.resize_selected(0.0), Err(CoreError::InvalidSize(_))));
        assert!(matches!(store.resize_selected(f64::NAN), Err(CoreError::InvalidSize(_))));
    }

    #[test]
    fn test_edits_without_selection_are_noops() {
        let mut store = ShapeStore::new();
        store.add_shape(stroke(&[(0.0, 0.0)])).unwrap();
        assert_eq!(store.recolor_selected(ShapeColor::white()), 0);
        assert_eq!(store.resize_selected(3.0).unwrap(), 0);
        assert_eq!(store.translate_selected(Vec2::new(1.0, 1.0)), 0);
        assert_eq!(positions(&store.shapes()[0]), vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_translate_selected() {
        let mut store = ShapeStore::new();
        let id = store.add_shape(stroke(&[(0.0, 0.0), (10.0, 0.0)])).unwrap();
        store.select(id);
        store.translate_selected(Vec2::new(3.0, 4.0));
        assert_eq!(
            positions(store.get_shape(id).unwrap()),
            vec![Point::new(3.0, 4.0), Point::new(13.0, 4.0)]
        );

        assert_eq!(store.translate_selected(Vec2::new(f64::NAN, 0.0)), 0);
        assert_eq!(
            positions(store.get_shape(id).unwrap()),
            vec![Point::new(3.0, 4.0), Point::new(13.0, 4.0)]
        );
    }

    #[test]
    fn test_clear() {
        let mut store = ShapeStore::new();
        let id = store.add_shape(stroke(&[(0.0, 0.0)])).unwrap();
        store.select(id);
        store.clear();
        assert!(store.is_empty());
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_replace_shapes_reconciles_selection() {
        let mut store = ShapeStore::new();
        let kept = stroke(&[(0.0, 0.0)]);
        let kept_id = kept.id();
        store.add_shape(kept.clone()).unwrap();
        let gone = store.add_shape(stroke(&[(5.0, 5.0)])).unwrap();
        store.select(kept_id);
        store.add_to_selection(gone);

        store.replace_shapes(vec![kept]);
        assert_eq!(store.selection(), &[kept_id]);
    }

    #[test]
    fn test_restore_shapes() {
        let mut store = ShapeStore::new();
        let original = stroke(&[(0.0, 0.0), (1.0, 0.0)]);
        let id = store.add_shape(original.clone()).unwrap();
        store.select(id);
        store.translate_selected(Vec2::new(5.0, 5.0));
        store.restore_shapes(&[original.clone()]);
        assert_eq!(store.get_shape(id), Some(&original));
    }
}
