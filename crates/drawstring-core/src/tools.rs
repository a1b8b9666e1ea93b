//! Tool system for the sketchpad.

use crate::error::{CoreError, CoreResult};
use crate::shapes::{ShapeColor, ShapeStyle, Stroke, StrokePoint};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Freehand drawing.
    #[default]
    Draw,
    /// Select and move existing strokes.
    Select,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Draw => "draw",
            ToolKind::Select => "select",
        }
    }
}

/// Manages the current tool, the brush style and the in-progress stroke.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Style applied to new strokes.
    pub current_style: ShapeStyle,
    /// The stroke being drawn, not yet committed.
    active: Option<Stroke>,
}

impl ToolManager {
    pub fn new(style: ShapeStyle) -> Self {
        Self {
            current_tool: ToolKind::default(),
            current_style: style,
            active: None,
        }
    }

    /// Set the current tool. Any in-progress stroke is discarded.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.active = None;
    }

    pub fn set_color(&mut self, color: ShapeColor) {
        self.current_style.color = color;
    }

    pub fn set_size(&mut self, size: f64) -> CoreResult<()> {
        if !size.is_finite() || size <= 0.0 {
            return Err(CoreError::InvalidSize(size));
        }
        self.current_style.size = size;
        Ok(())
    }

    /// Start a new stroke seeded with one world point.
    pub fn begin(&mut self, point: Point, pressure: f64) -> CoreResult<()> {
        let mut stroke = Stroke::new(self.current_style.clone());
        stroke.add_point(StrokePoint::new(point.x, point.y, pressure))?;
        self.active = Some(stroke);
        Ok(())
    }

    /// Append a world point to the active stroke.
    ///
    /// Returns `Ok(false)` when no stroke is in progress.
    pub fn update(&mut self, point: Point, pressure: f64) -> CoreResult<bool> {
        match &mut self.active {
            Some(stroke) => {
                stroke.add_point(StrokePoint::new(point.x, point.y, pressure))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Finish the interaction and hand over the stroke for committing.
    pub fn end(&mut self) -> Option<Stroke> {
        self.active.take().filter(|stroke| !stroke.is_empty())
    }

    /// Drop the in-progress stroke.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The in-progress stroke, for rendering.
    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }
}
