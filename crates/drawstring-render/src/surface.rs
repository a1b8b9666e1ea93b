//! Drawing surface abstraction.

use kurbo::{Affine, BezPath, Stroke};
use peniko::Color;

/// RGBA8 pixels (straight alpha), row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// A buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The RGBA value at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// A 2D target the renderer draws on.
///
/// Paths are given in user space and mapped through the current transform.
/// `clear` always covers the whole backing store.
pub trait Surface {
    /// Resize the backing store, in device pixels. Content is discarded.
    fn set_pixel_size(&mut self, width: u32, height: u32);

    fn pixel_size(&self) -> (u32, u32);

    /// Replace the user-to-device transform.
    fn set_transform(&mut self, transform: Affine);

    fn clear(&mut self, color: Color);

    fn fill(&mut self, path: &BezPath, color: Color);

    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color);

    /// Snapshot of the current pixels, when the surface keeps any.
    fn read_pixels(&self) -> Option<PixelBuffer>;
}
