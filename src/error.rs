//! Error types for the sprite generation pipeline

use thiserror::Error;

/// Error raised by any stage of the pipeline.
///
/// Every variant is terminal for the invocation that produced it: the
/// orchestrator surfaces the first error encountered and aborts the
/// remaining stages. Retry policy, if any, belongs to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No SVG markup or raster buffer was supplied.
    #[error("no input supplied")]
    EmptyInput,

    /// The requested upscale factor is outside {2, 3, 4}.
    ///
    /// This is a contract violation, rejected before any buffer work begins.
    #[error("invalid upscale factor {0}: supported factors are 2, 3 and 4")]
    InvalidFactor(u32),

    /// An embedded asset could not be retrieved.
    #[error("failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    /// Fetched bytes are not a recognizable raster image.
    #[error("failed to decode raster image: {0}")]
    Decode(#[source] image::ImageError),

    /// The vector document could not be rendered to pixels.
    #[error("failed to rasterize SVG: {0}")]
    Rasterize(String),

    /// A raster buffer could not be encoded to the requested format.
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// IO error during CLI file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
