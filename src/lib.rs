//! Iconforge - Library for turning SVG icon artwork into pixel-art sprites
//!
//! This library provides functionality to:
//! - Inline remote raster assets referenced by SVG markup
//! - Rasterize the composited vector document to an RGBA buffer
//! - Upscale raster buffers with edge-directed (xBR) interpolation
//! - Compute tight opaque bounding boxes for crop geometry

pub mod bounds;
pub mod cli;
pub mod codec;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod raster;
pub mod resolver;
pub mod upscale;

pub use bounds::BoundingBox;
pub use error::PipelineError;
pub use upscale::{upscale, UpscaleFactor, UpscaleOptions};
