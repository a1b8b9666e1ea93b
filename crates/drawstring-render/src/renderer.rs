//! Renderer trait abstraction and the full-redraw canvas renderer.

use crate::surface::Surface;
use drawstring_core::shapes::{Shape, ShapeId, ShapeTrait, Stroke};
use drawstring_core::{Camera, Engine};
use kurbo::{Affine, BezPath, Cap, Circle, Join, Shape as _, Size};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Surface has no pixels to export")]
    EmptySurface,
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Selection outline width in screen pixels.
pub const SELECTION_LINE_WIDTH: f64 = 1.0;
const SELECTION_DASH: f64 = 4.0;
/// Tolerance for converting circles and rects to paths, in world units.
const PATH_TOLERANCE: f64 = 0.05;

/// Frame-independent render settings.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub background_color: Color,
    pub selection_color: Color,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background_color: Color::from_rgba8(255, 255, 255, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            scale_factor: 1.0,
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Persisted shapes, back to front.
    pub shapes: &'a [Shape],
    pub selection: &'a [ShapeId],
    pub camera: &'a Camera,
    /// In-progress stroke, drawn on top without selection decoration.
    pub active_stroke: Option<&'a Stroke>,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    pub options: RenderOptions,
}

impl<'a> RenderContext<'a> {
    pub fn new(shapes: &'a [Shape], camera: &'a Camera, viewport_size: Size) -> Self {
        Self {
            shapes,
            selection: &[],
            camera,
            active_stroke: None,
            viewport_size,
            options: RenderOptions::default(),
        }
    }

    /// Everything the engine currently shows.
    pub fn from_engine(engine: &'a Engine) -> Self {
        let viewport = engine.viewport();
        Self::new(
            engine.shapes(),
            engine.camera(),
            Size::new(viewport.width, viewport.height),
        )
        .with_selection(engine.selection())
        .with_active_stroke(engine.active_stroke())
        .with_scale_factor(viewport.scale_factor)
    }

    pub fn with_selection(mut self, selection: &'a [ShapeId]) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_active_stroke(mut self, stroke: Option<&'a Stroke>) -> Self {
        self.active_stroke = stroke;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.options.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.options.background_color = color;
        self
    }

    /// Device scale factor, falling back to 1 for unusable values.
    pub fn scale_factor(&self) -> f64 {
        let scale = self.options.scale_factor;
        if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
    }

    /// Backing-store size in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let scale = self.scale_factor();
        let px = |v: f64| {
            if v.is_finite() {
                (v * scale).round().max(0.0) as u32
            } else {
                0
            }
        };
        (px(self.viewport_size.width), px(self.viewport_size.height))
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Redraw the whole frame onto `surface`.
    fn render(&mut self, ctx: &RenderContext, surface: &mut dyn Surface);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.options.background_color
    }
}

/// Draws strokes as smoothed round-capped paths, with selection decoration.
#[derive(Debug, Clone)]
pub struct CanvasRenderer {
    selection_color: Color,
    /// Camera zoom of the frame being drawn; decoration widths divide by it.
    zoom: f64,
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self {
            selection_color: RenderOptions::default().selection_color,
            zoom: 1.0,
        }
    }
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn render_shape(&self, surface: &mut dyn Surface, shape: &Shape, selected: bool) {
        match shape {
            Shape::Stroke(stroke) => self.render_stroke(surface, stroke),
        }
        if selected {
            self.render_selection(surface, shape);
        }
    }

    fn render_stroke(&self, surface: &mut dyn Surface, stroke: &Stroke) {
        let color = stroke.style.color();
        if let Some(point) = dot_center(stroke) {
            let disc = Circle::new(point, stroke.style.size / 2.0).to_path(PATH_TOLERANCE);
            surface.fill(&disc, color);
        } else if !stroke.is_empty() {
            let style = kurbo::Stroke::new(stroke.style.size)
                .with_caps(Cap::Round)
                .with_join(Join::Round);
            surface.stroke(&stroke.to_path(), &style, color);
        }
    }

    /// Outline along the shape plus its padded bounds, constant on screen.
    fn render_selection(&self, surface: &mut dyn Surface, shape: &Shape) {
        let width = SELECTION_LINE_WIDTH / self.zoom;
        let outline = shape_path(shape);
        let line = kurbo::Stroke::new(width)
            .with_caps(Cap::Round)
            .with_join(Join::Round);
        surface.stroke(&outline, &line, self.selection_color);

        let dash = SELECTION_DASH / self.zoom;
        let bbox = shape.bounds().to_path(PATH_TOLERANCE);
        let dashed = kurbo::Stroke::new(width).with_dashes(0.0, &[dash, dash]);
        surface.stroke(&bbox, &dashed, self.selection_color);
    }
}

/// The point of a single-point stroke.
fn dot_center(stroke: &Stroke) -> Option<kurbo::Point> {
    match stroke.points() {
        [only] => Some(only.position()),
        _ => None,
    }
}

impl Renderer for CanvasRenderer {
    fn render(&mut self, ctx: &RenderContext, surface: &mut dyn Surface) {
        self.selection_color = ctx.options.selection_color;
        self.zoom = ctx.camera.zoom;

        let (width, height) = ctx.pixel_size();
        if width > 0 && height > 0 && surface.pixel_size() != (width, height) {
            surface.set_pixel_size(width, height);
        }

        surface.set_transform(Affine::IDENTITY);
        surface.clear(self.background_color(ctx));

        let transform = Affine::scale(ctx.scale_factor()) * ctx.camera.transform();
        surface.set_transform(transform);

        // Draw all shapes in z-order
        for shape in ctx.shapes {
            let is_selected = ctx.selection.contains(&shape.id());
            self.render_shape(surface, shape, is_selected);
        }

        if let Some(stroke) = ctx.active_stroke {
            self.render_stroke(surface, stroke);
        }
    }
}

/// Path used to draw a shape, as the renderer would emit it.
pub fn shape_path(shape: &Shape) -> BezPath {
    match shape.as_stroke().and_then(dot_center) {
        Some(center) => Circle::new(center, shape.style().size / 2.0).to_path(PATH_TOLERANCE),
        None => shape.to_path(),
    }
}
