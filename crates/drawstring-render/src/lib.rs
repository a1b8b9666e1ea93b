//! Drawstring Render Library
//!
//! Surface abstraction, the full-redraw canvas renderer, a recording and a
//! software raster surface, and PNG export.

pub mod display_list;
pub mod export;
pub mod raster;
mod renderer;
pub mod surface;

pub use display_list::{DisplayList, DrawCommand};
pub use export::{PngExport, encode_png, export_filename, export_surface, render_png, try_export};
pub use raster::RasterSurface;
pub use renderer::{
    CanvasRenderer, RenderContext, RenderOptions, RenderResult, Renderer, RendererError,
    SELECTION_LINE_WIDTH, shape_path,
};
pub use surface::{PixelBuffer, Surface};
