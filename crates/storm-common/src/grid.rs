//! Pixel raster dimensions.

use serde::{Deserialize, Serialize};

/// Dimensions of a row-major pixel raster.
///
/// Every per-pixel buffer in the workspace (inclusion mask, frequency grid,
/// RGBA frame) is laid out as `y * width + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RasterSize {
    /// Number of pixel columns
    pub width: usize,
    /// Number of pixel rows
    pub height: usize,
}

impl RasterSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Check if the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get the 1D array index for a 2D pixel position.
    #[inline]
    pub fn flat_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Check if a pixel position lies on the raster.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Clip a fractional pixel span to the raster.
    ///
    /// `lo` is floored and `hi` is ceiled, then both are clamped to
    /// `[0, width-1] x [0, height-1]`. Returns inclusive index bounds
    /// `(x0, x1, y0, y1)`, or `None` when the span misses the raster.
    pub fn clip_span(
        &self,
        (lo_x, lo_y): (f64, f64),
        (hi_x, hi_y): (f64, f64),
    ) -> Option<(usize, usize, usize, usize)> {
        if self.is_empty() || !(lo_x.is_finite() && lo_y.is_finite() && hi_x.is_finite() && hi_y.is_finite()) {
            return None;
        }

        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;

        let x0 = lo_x.floor().max(0.0);
        let x1 = hi_x.ceil().min(max_x);
        let y0 = lo_y.floor().max(0.0);
        let y1 = hi_y.ceil().min(max_y);

        if x0 > x1 || y0 > y1 {
            return None;
        }

        Some((x0 as usize, x1 as usize, y0 as usize, y1 as usize))
    }
}
