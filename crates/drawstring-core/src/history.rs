//! Linear undo history of shape snapshots.

use crate::shapes::Shape;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Ordered, capacity-bounded snapshots of the shape sequence plus a cursor.
///
/// Each snapshot holds the state *after* a committed action, so undoing the
/// first stored snapshot lands on the empty canvas. Snapshots are shared
/// immutably and handed out as owned copies.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Arc<[Shape]>>,
    /// Index of the active snapshot; `None` is before the first one.
    step: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// Create an empty history. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            step: None,
            capacity: capacity.max(1),
        }
    }

    /// Record the current shape sequence as the newest snapshot.
    ///
    /// Anything after the cursor (undone snapshots) is discarded first.
    pub fn snapshot(&mut self, shapes: &[Shape]) {
        let keep = self.step.map_or(0, |step| step + 1);
        self.snapshots.truncate(keep);

        self.snapshots.push_back(Arc::from(shapes));
        self.step = Some(self.snapshots.len() - 1);

        if self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            self.step = self.step.and_then(|step| step.checked_sub(1));
        }
        log::debug!(
            "history snapshot: {} shapes, step {:?} of {}",
            shapes.len(),
            self.step,
            self.snapshots.len()
        );
    }

    /// Step back one snapshot and return the shapes to restore.
    ///
    /// From the first snapshot this returns an empty sequence (the canvas
    /// before any action). Before that it returns `None`.
    pub fn undo(&mut self) -> Option<Vec<Shape>> {
        match self.step? {
            0 => {
                self.step = None;
                Some(Vec::new())
            }
            step => {
                self.step = Some(step - 1);
                self.snapshots.get(step - 1).map(|snapshot| snapshot.to_vec())
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.step.is_some()
    }

    /// The shapes of the active snapshot, if any.
    pub fn current(&self) -> Option<&[Shape]> {
        self.step
            .and_then(|step| self.snapshots.get(step))
            .map(|snapshot| &**snapshot)
    }

    pub fn step(&self) -> Option<usize> {
        self.step
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.step = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ShapeStyle, Stroke};
    use kurbo::{Point, Vec2};

    fn stroke(x: f64) -> Shape {
        Shape::Stroke(Stroke::from_points([Point::new(x, 0.0)], ShapeStyle::default()))
    }

    /// Simulate N committed additions, snapshotting after each.
    fn build(n: usize, capacity: usize) -> (History, Vec<Shape>) {
        let mut history = History::new(capacity);
        let mut shapes = Vec::new();
        for i in 0..n {
            shapes.push(stroke(i as f64));
            history.snapshot(&shapes);
        }
        (history, shapes)
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::default();
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_undo_walks_back_to_empty() {
        let (mut history, shapes) = build(3, 50);
        assert_eq!(history.len(), 3);
        assert_eq!(history.step(), Some(2));

        assert_eq!(history.undo().unwrap(), shapes[..2].to_vec());
        assert_eq!(history.undo().unwrap(), shapes[..1].to_vec());
        assert_eq!(history.undo().unwrap(), Vec::<Shape>::new());
        assert_eq!(history.step(), None);

        // One past the empty state is a no-op.
        assert!(history.undo().is_none());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_new_action_discards_redo_branch() {
        let (mut history, shapes) = build(3, 50);
        history.undo();
        history.undo();

        let mut branch = shapes[..1].to_vec();
        branch.push(stroke(99.0));
        history.snapshot(&branch);

        assert_eq!(history.len(), 2);
        assert_eq!(history.step(), Some(1));
        assert_eq!(history.current().unwrap(), &branch[..]);

        // Walking back never reaches the discarded future.
        assert_eq!(history.undo().unwrap(), shapes[..1].to_vec());
        assert_eq!(history.undo().unwrap(), Vec::<Shape>::new());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_snapshot_after_undo_to_empty() {
        let (mut history, _) = build(2, 50);
        history.undo();
        history.undo();
        assert_eq!(history.step(), None);

        let fresh = vec![stroke(7.0)];
        history.snapshot(&fresh);
        assert_eq!(history.len(), 1);
        assert_eq!(history.step(), Some(0));
    }

    #[test]
    fn test_capacity_bound() {
        let (mut history, shapes) = build(60, 50);
        assert_eq!(history.len(), 50);
        assert_eq!(history.step(), Some(49));
        assert_eq!(history.current().unwrap(), &shapes[..]);

        // 49 undos reach the oldest retained snapshot; the first 10 were evicted.
        for _ in 0..49 {
            history.undo();
        }
        assert_eq!(history.current().unwrap().len(), 11);
        assert_eq!(history.undo().unwrap(), Vec::<Shape>::new());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut history = History::new(5);
        let mut shapes = Vec::new();
        for i in 0..20 {
            shapes.push(stroke(i as f64));
            history.snapshot(&shapes);
            assert!(history.len() <= 5);
        }
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let (history, _) = build(3, 0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.step(), Some(0));
    }

    #[test]
    fn test_restored_copy_does_not_alias_snapshot() {
        let (mut history, shapes) = build(2, 50);
        let mut restored = history.undo().unwrap();
        if let Some(Shape::Stroke(s)) = restored.first_mut() {
            crate::shapes::ShapeTrait::translate(s, Vec2::new(100.0, 100.0));
        }
        assert_eq!(history.current().unwrap(), &shapes[..1]);
    }

    #[test]
    fn test_clear() {
        let (mut history, _) = build(2, 50);
        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_undo());
    }
}
