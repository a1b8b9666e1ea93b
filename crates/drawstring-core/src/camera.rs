//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower zoom bound.
pub const ZOOM_MIN: f64 = 0.1;
/// Default upper zoom bound.
pub const ZOOM_MAX: f64 = 10.0;

/// Camera manages the view transform for the canvas.
///
/// `screen = world * zoom + offset`. Pan is a screen-space translation,
/// zoom a uniform scale bounded to `[min_zoom, max_zoom]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level.
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::with_limits(ZOOM_MIN, ZOOM_MAX)
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity camera with custom zoom bounds.
    pub fn with_limits(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
        }
    }

    /// World-to-screen transform, used for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen-to-world transform, used for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.zoom,
            (screen_point.y - self.offset.y) / self.zoom,
        )
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.zoom + self.offset.x,
            world_point.y * self.zoom + self.offset.y,
        )
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the world point under `screen_point` fixed.
    ///
    /// The zoom is clamped first and the offset is derived from the clamped
    /// value, so the anchor stays exact at the bounds. Returns whether the
    /// zoom level changed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;
        self.offset = Vec2::new(
            screen_point.x - world_point.x * new_zoom,
            screen_point.y - world_point.y * new_zoom,
        );
        true
    }

    /// Reset camera to identity.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
    }
}
