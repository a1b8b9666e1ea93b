//! Software raster surface backed by tiny-skia.
//!
//! Paths and strokes arrive as kurbo types and are converted at the boundary;
//! tiny-skia does the anti-aliased fill, stroking and compositing.

use crate::surface::{PixelBuffer, Surface};
use kurbo::{Affine, BezPath, Cap, Join, PathEl, Stroke};
use peniko::Color;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, StrokeDash, Transform,
};

/// An in-memory anti-aliased RGBA8 surface.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    /// `None` while the surface has no pixels.
    pixmap: Option<Pixmap>,
    transform: Affine,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
            transform: Affine::IDENTITY,
        }
    }

    /// Straight-alpha RGBA at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let px = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([px.red(), px.green(), px.blue(), px.alpha()])
    }

    fn paint(color: Color) -> Paint<'static> {
        let c = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(c.r, c.g, c.b, c.a);
        paint.anti_alias = true;
        paint
    }
}

fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Convert a kurbo path. `None` for empty or non-finite paths.
fn to_path(path: &BezPath) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

fn to_stroke(style: &Stroke) -> tiny_skia::Stroke {
    let line_cap = match style.start_cap {
        Cap::Butt => LineCap::Butt,
        Cap::Square => LineCap::Square,
        Cap::Round => LineCap::Round,
    };
    let line_join = match style.join {
        Join::Bevel => LineJoin::Bevel,
        Join::Miter => LineJoin::Miter,
        Join::Round => LineJoin::Round,
    };
    let dash = if style.dash_pattern.is_empty() {
        None
    } else {
        let pattern = style.dash_pattern.iter().map(|&v| v as f32).collect();
        StrokeDash::new(pattern, style.dash_offset as f32)
    };
    tiny_skia::Stroke {
        width: style.width as f32,
        miter_limit: style.miter_limit as f32,
        line_cap,
        line_join,
        dash,
    }
}

impl Surface for RasterSurface {
    fn set_pixel_size(&mut self, width: u32, height: u32) {
        log::debug!("raster surface resized to {width}x{height}");
        self.pixmap = Pixmap::new(width, height);
    }

    fn pixel_size(&self) -> (u32, u32) {
        self.pixmap
            .as_ref()
            .map_or((0, 0), |pixmap| (pixmap.width(), pixmap.height()))
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn clear(&mut self, color: Color) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            let c = color.to_rgba8();
            pixmap.fill(tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a));
        }
    }

    fn fill(&mut self, path: &BezPath, color: Color) {
        let (Some(pixmap), Some(path)) = (self.pixmap.as_mut(), to_path(path)) else {
            return;
        };
        pixmap.fill_path(
            &path,
            &Self::paint(color),
            FillRule::Winding,
            to_transform(self.transform),
            None,
        );
    }

    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color) {
        let (Some(pixmap), Some(path)) = (self.pixmap.as_mut(), to_path(path)) else {
            return;
        };
        pixmap.stroke_path(
            &path,
            &Self::paint(color),
            &to_stroke(style),
            to_transform(self.transform),
            None,
        );
    }

    fn read_pixels(&self) -> Option<PixelBuffer> {
        let pixmap = self.pixmap.as_ref()?;
        let data = pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Some(PixelBuffer {
            width: pixmap.width(),
            height: pixmap.height(),
            data,
        })
    }
}
