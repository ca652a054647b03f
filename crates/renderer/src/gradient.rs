//! Linear color ramp for density heatmaps.

use storm_common::{Color, HeatmapStyle};

use crate::density::FrequencyGrid;
use crate::mask::Mask;

/// RGBA pixel value.
pub type Rgba = [u8; 4];

/// Fully transparent black, the value of every pixel outside the mask.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Linear two-stop color scale over `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearColorScale {
    low: (u8, u8, u8),
    high: (u8, u8, u8),
}

impl LinearColorScale {
    pub fn new(low: &Color, high: &Color) -> Self {
        let (lr, lg, lb, _) = low.to_rgba();
        let (hr, hg, hb, _) = high.to_rgba();
        Self {
            low: (lr, lg, lb),
            high: (hr, hg, hb),
        }
    }

    pub fn from_style(style: &HeatmapStyle) -> Self {
        Self::new(&style.low, &style.high)
    }

    /// Opaque color at `value` on a scale ending at `max`.
    ///
    /// `max` must be non-zero; values above it clamp to the high stop.
    pub fn color(&self, value: u32, max: u32) -> Rgba {
        let t = (value as f64 / max as f64).clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        [
            mix(self.low.0, self.high.0),
            mix(self.low.1, self.high.1),
            mix(self.low.2, self.high.2),
            255,
        ]
    }

    /// Color for pixels on land with no storm coverage.
    pub fn empty(&self) -> Rgba {
        [self.low.0, self.low.1, self.low.2, 0]
    }
}

impl Default for LinearColorScale {
    fn default() -> Self {
        Self::from_style(&HeatmapStyle::default())
    }
}

/// Color a frequency grid into an RGBA buffer (`width × height × 4`).
///
/// Only mask-inside pixels are written. A zero count is transparent; a
/// positive count maps linearly onto the scale over `[0, max]`. When the
/// grid is all zeros, every pixel is transparent.
pub fn render_density(grid: &FrequencyGrid, mask: &Mask, scale: &LinearColorScale) -> Vec<u8> {
    let size = grid.size();
    let mut pixels = vec![0u8; size.len() * 4];
    let max = grid.max();
    let empty = scale.empty();

    for (idx, (&count, px)) in grid
        .as_slice()
        .iter()
        .zip(pixels.chunks_exact_mut(4))
        .enumerate()
    {
        if !mask.is_inside_index(idx) {
            continue;
        }
        let color = if count == 0 || max == 0 {
            empty
        } else {
            scale.color(count, max)
        };
        px.copy_from_slice(&color);
    }

    pixels
}
