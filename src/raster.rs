//! SVG rasterization collaborator
//!
//! Renders vector markup into an RGBA buffer of the requested pixel
//! dimensions using usvg/resvg. The pipeline consumes only the raw pixel
//! output; no vector semantics leak past this module.

use image::{Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::error::PipelineError;

/// Render `svg` into an RGBA buffer of exactly `width` x `height` pixels.
///
/// The document's intrinsic size is scaled (non-uniformly if necessary) to
/// fill the requested dimensions. Fails with [`PipelineError::Rasterize`]
/// when the markup cannot be parsed or the target dimensions are zero.
pub fn rasterize_svg(svg: &str, width: u32, height: u32) -> Result<RgbaImage, PipelineError> {
    if width == 0 || height == 0 {
        return Err(PipelineError::Rasterize(format!(
            "target dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }

    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| PipelineError::Rasterize(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        PipelineError::Rasterize(format!("cannot allocate {}x{} pixmap", width, height))
    })?;

    let size = tree.size();
    let scale_x = width as f32 / size.width();
    let scale_y = height as f32 / size.height();
    let transform = tiny_skia::Transform::from_scale(scale_x, scale_y);

    resvg::render(&tree, transform, &mut pixmap.as_mut());
    log::debug!("rasterized SVG ({}x{} intrinsic) to {}x{}", size.width(), size.height(), width, height);

    Ok(pixmap_to_rgba(&pixmap, width, height))
}

/// Convert a premultiplied-alpha pixmap into a straight-alpha RGBA buffer.
fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap, width: u32, height: u32) -> RgbaImage {
    let mut out = RgbaImage::new(width, height);
    for (i, premultiplied) in pixmap.pixels().iter().enumerate() {
        let c = premultiplied.demultiply();
        let x = i as u32 % width;
        let y = i as u32 / width;
        out.put_pixel(x, y, Rgba([c.red(), c.green(), c.blue(), c.alpha()]));
    }
    out
}
