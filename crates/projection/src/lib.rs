//! Map projections between geographic and pixel space.
//!
//! Implements the projections from scratch without external dependencies.
//! Every projection maps `(lon, lat)` in degrees to `(x, y)` pixels with y
//! growing downwards, and exposes its parameters so callers can detect when
//! cached rasters are stale.

pub mod mercator;

pub use mercator::{Mercator, ProjectionFit};

use thiserror::Error;

/// A forward/inverse mapping between degrees and pixels.
pub trait Projection {
    /// Project `(lon, lat)` to pixel coordinates.
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64);

    /// Unproject pixel coordinates; `None` outside the valid domain.
    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)>;

    /// Current scale and translation.
    fn params(&self) -> ProjectionParams;
}

/// Scale and translation of a fitted projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl ProjectionParams {
    /// Bit patterns of the parameters, usable as an exact cache key.
    pub fn to_bits(&self) -> [u64; 3] {
        [
            self.scale.to_bits(),
            self.translate_x.to_bits(),
            self.translate_y.to_bits(),
        ]
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("Cannot fit projection to a degenerate extent ({width} x {height})")]
    DegenerateExtent { width: f64, height: f64 },

    #[error("Invalid target size: {width} x {height}")]
    InvalidTargetSize { width: f64, height: f64 },
}
