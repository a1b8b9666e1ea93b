//! Recording surface that keeps the draw calls instead of pixels.

use crate::surface::{PixelBuffer, Surface};
use kurbo::{Affine, BezPath, Stroke};
use peniko::Color;

/// One recorded draw call, with the transform that was active.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Color),
    Fill {
        path: BezPath,
        color: Color,
        transform: Affine,
    },
    Stroke {
        path: BezPath,
        style: Stroke,
        color: Color,
        transform: Affine,
    },
}

/// A [`Surface`] that records the commands of the last frame.
///
/// Useful for hosts that replay drawing on their own backend, and for tests.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    size: (u32, u32),
    transform: Affine,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Recorded fills, in drawing order.
    pub fn fills(&self) -> impl Iterator<Item = (&BezPath, Color)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Fill { path, color, .. } => Some((path, *color)),
            _ => None,
        })
    }

    /// Recorded strokes, in drawing order.
    pub fn strokes(&self) -> impl Iterator<Item = (&BezPath, &Stroke, Color)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Stroke {
                path, style, color, ..
            } => Some((path, style, *color)),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn set_pixel_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.commands.clear();
    }

    fn pixel_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    /// Clearing starts a new frame.
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            color,
            transform: self.transform,
        });
    }

    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            style: style.clone(),
            color,
            transform: self.transform,
        });
    }

    fn read_pixels(&self) -> Option<PixelBuffer> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Shape as _};

    #[test]
    fn test_clear_starts_new_frame() {
        let mut list = DisplayList::new();
        let black = Color::from_rgba8(0, 0, 0, 255);
        list.fill(&Rect::new(0.0, 0.0, 1.0, 1.0).to_path(0.1), black);
        list.clear(Color::from_rgba8(255, 255, 255, 255));
        assert_eq!(list.len(), 1);
        assert!(matches!(list.commands()[0], DrawCommand::Clear(_)));
    }

    #[test]
    fn test_records_transform() {
        let mut list = DisplayList::new();
        list.set_transform(Affine::scale(2.0));
        list.stroke(&BezPath::new(), &Stroke::new(1.0), Color::from_rgba8(0, 0, 0, 255));
        match &list.commands()[0] {
            DrawCommand::Stroke { transform, .. } => assert_eq!(*transform, Affine::scale(2.0)),
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(list.strokes().count(), 1);
        assert_eq!(list.fills().count(), 0);
        assert!(list.read_pixels().is_none());
    }
}
