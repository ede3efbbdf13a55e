//! Opaque bounding box extraction for crop geometry

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Minimal axis-aligned rectangle enclosing all non-transparent pixels.
///
/// Coordinates are relative to the source buffer. When any pixel with
/// alpha > 0 exists, `left + width` and `top + height` never exceed the
/// source dimensions and both extents are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// The documented result for a buffer with no opaque pixel: a
    /// zero-extent box anchored at (0, 0).
    pub fn empty() -> Self {
        Self { top: 0, left: 0, width: 0, height: 0 }
    }

    /// Returns true if the box encloses no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Compute the tight bounding box of all pixels with alpha > 0.
///
/// Performs a single full scan over the buffer, tracking min/max row and
/// column among non-transparent pixels. No connectedness or convexity is
/// assumed. An all-transparent buffer yields [`BoundingBox::empty`], which
/// is a defined boundary-case result rather than an error.
pub fn extract_bounding_box(image: &RgbaImage) -> BoundingBox {
    let (width, height) = image.dimensions();

    let mut top = height;
    let mut left = width;
    let mut bottom = 0u32;
    let mut right = 0u32;
    let mut seen_opaque = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            seen_opaque = true;
            top = top.min(y);
            bottom = bottom.max(y);
            left = left.min(x);
            right = right.max(x);
        }
    }

    if !seen_opaque {
        return BoundingBox::empty();
    }

    BoundingBox { top, left, width: right - left + 1, height: bottom - top + 1 }
}
