//! PNG export of a rendered canvas.

use crate::raster::RasterSurface;
use crate::renderer::{CanvasRenderer, RenderContext, RenderResult, Renderer, RendererError};
use crate::surface::{PixelBuffer, Surface};
use drawstring_core::Engine;

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// An encoded image ready to be handed to the host's download mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Download name for an export taken at `timestamp_millis` since the epoch.
pub fn export_filename(timestamp_millis: u128) -> String {
    format!("drawstring-{timestamp_millis}.png")
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}

/// Encode RGBA8 pixels as PNG.
pub fn encode_png(pixels: &PixelBuffer) -> RenderResult<Vec<u8>> {
    if pixels.is_empty() {
        return Err(RendererError::EmptySurface);
    }
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixels.width, pixels.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels.data)?;
    }
    Ok(png_data)
}

/// Encode whatever `surface` currently shows.
pub fn export_surface(surface: &dyn Surface) -> RenderResult<PngExport> {
    let pixels = surface.read_pixels().ok_or(RendererError::EmptySurface)?;
    let bytes = encode_png(&pixels)?;
    Ok(PngExport {
        filename: export_filename(unix_millis()),
        bytes,
    })
}

/// Render the engine's canvas off-screen and encode it.
pub fn render_png(engine: &Engine) -> RenderResult<PngExport> {
    let mut surface = RasterSurface::default();
    CanvasRenderer::new().render(&RenderContext::from_engine(engine), &mut surface);
    export_surface(&surface)
}

/// [`render_png`], logging instead of failing. Export errors are not fatal.
pub fn try_export(engine: &Engine) -> Option<PngExport> {
    match render_png(engine) {
        Ok(export) => {
            log::info!("exported {} ({} bytes)", export.filename, export.bytes.len());
            Some(export)
        }
        Err(err) => {
            log::warn!("export failed: {err}");
            None
        }
    }
}
