//! Raster codec collaborator: decode/encode and data-URI helpers
//!
//! All byte-level image format work lives here. The pipeline itself only
//! ever sees raw RGBA buffers; this module is the seam where PNG/WEBP/...
//! bytes enter and leave.

use base64::Engine;
use clap::ValueEnum;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{ImageEncoder, RgbaImage};

use crate::error::PipelineError;

/// Output raster encoding supported by the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Portable Network Graphics (lossless)
    #[default]
    Png,
    /// WebP (lossless)
    Webp,
}

impl OutputFormat {
    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    /// Guess the format from a file extension, if recognized.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::Webp),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Decode an arbitrary supported raster encoding into an RGBA buffer.
///
/// The container format is sniffed from the bytes themselves (PNG, WEBP,
/// JPEG, GIF, ...). Returns [`PipelineError::Decode`] when the bytes are
/// not a recognizable raster image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    let decoded = image::load_from_memory(bytes).map_err(PipelineError::Decode)?;
    Ok(decoded.to_rgba8())
}

/// Encode an RGBA buffer into the requested output format.
pub fn encode_image(image: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>, PipelineError> {
    let (width, height) = image.dimensions();
    let mut bytes = Vec::new();

    match format {
        OutputFormat::Png => PngEncoder::new(&mut bytes)
            .write_image(image.as_raw(), width, height, image::ExtendedColorType::Rgba8)
            .map_err(PipelineError::Encode)?,
        OutputFormat::Webp => WebPEncoder::new_lossless(&mut bytes)
            .write_image(image.as_raw(), width, height, image::ExtendedColorType::Rgba8)
            .map_err(PipelineError::Encode)?,
    }

    Ok(bytes)
}

/// Wrap already-encoded PNG bytes as an inline `data:` URI.
pub fn png_data_uri(png_bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(png_bytes);
    format!("data:image/png;base64,{}", payload)
}

/// Shrink an image to fit within a `max_dim` x `max_dim` box, preserving
/// aspect ratio. Images already inside the box are returned unchanged;
/// this helper never enlarges.
pub fn shrink_to_fit(image: &RgbaImage, max_dim: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= max_dim || longest == 0 {
        return image.clone();
    }

    let new_width = ((width as u64 * max_dim as u64) / longest as u64).max(1) as u32;
    let new_height = ((height as u64 * max_dim as u64) / longest as u64).max(1) as u32;
    image::imageops::resize(image, new_width, new_height, FilterType::Lanczos3)
}
