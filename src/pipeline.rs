//! Pipeline orchestration
//!
//! Sequences resolve -> rasterize -> upscale (-> encode) for the full
//! sprite pipeline, and offers an independent bounding-box-only entry
//! point. Every entry point is stateless and single-pass: the first stage
//! failure aborts the invocation with no retry and no partial output.

use image::RgbaImage;

use crate::bounds::{self, BoundingBox};
use crate::codec::{self, OutputFormat};
use crate::error::PipelineError;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::raster;
use crate::resolver;
use crate::upscale::{self, UpscaleFactor, UpscaleOptions};

/// Base rasterization size per factor, chosen so the upscaled output lands
/// at roughly 1024 pixels per side.
pub fn base_raster_size(factor: UpscaleFactor) -> u32 {
    match factor {
        UpscaleFactor::Two => 512,
        UpscaleFactor::Three => 384,
        UpscaleFactor::Four => 256,
    }
}

/// Run the full pipeline with the production HTTP fetcher and default
/// kernel options: resolve embedded assets, rasterize, upscale.
pub async fn resolve_and_upscale(svg: &str, factor: u32) -> Result<RgbaImage, PipelineError> {
    resolve_and_upscale_with(
        &HttpFetcher::new(),
        svg,
        factor,
        &UpscaleOptions::default(),
        None,
    )
    .await
}

/// Full pipeline with injectable fetcher, kernel options and an optional
/// base raster size override (defaults to [`base_raster_size`]).
pub async fn resolve_and_upscale_with<F: Fetcher>(
    fetcher: &F,
    svg: &str,
    factor: u32,
    options: &UpscaleOptions,
    raster_size: Option<u32>,
) -> Result<RgbaImage, PipelineError> {
    if svg.trim().is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    // Contract errors are rejected before any network or buffer work.
    let factor = UpscaleFactor::from_u32(factor)?;

    let resolved = resolver::resolve_embedded_images(svg, fetcher).await?;
    let size = raster_size.unwrap_or_else(|| base_raster_size(factor));
    let rasterized = raster::rasterize_svg(&resolved, size, size)?;
    log::info!("upscaling {}x{} raster at {}", size, size, factor);

    Ok(upscale::xbr::scale(&rasterized, factor, options))
}

/// Full pipeline plus the encode stage: returns encoded image bytes.
pub async fn resolve_and_upscale_to_bytes(
    svg: &str,
    factor: u32,
    format: OutputFormat,
) -> Result<Vec<u8>, PipelineError> {
    let buffer = resolve_and_upscale(svg, factor).await?;
    codec::encode_image(&buffer, format)
}

/// Crop-geometry-only entry point over an already-rasterized buffer.
///
/// No SVG or upscaling is involved; an all-transparent buffer yields the
/// documented zero-extent box rather than an error.
pub fn extract_bounding_box(buffer: &RgbaImage) -> BoundingBox {
    bounds::extract_bounding_box(buffer)
}

/// Fetch a raster image, decode it, and return its opaque bounding box.
pub async fn bounding_box_from_url<F: Fetcher>(
    fetcher: &F,
    url: &str,
) -> Result<BoundingBox, PipelineError> {
    let bytes = fetcher.fetch(url).await?;
    let buffer = codec::decode_image(&bytes)?;
    Ok(extract_bounding_box(&buffer))
}
