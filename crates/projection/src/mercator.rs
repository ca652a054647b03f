//! Spherical Web-Mercator-style projection onto a pixel canvas.
//!
//! The projection is `x = tx + k·λ`, `y = ty − k·ln(tan(π/4 + φ/2))` with λ, φ
//! in radians, matching the common web-mapping convention of y growing
//! downwards. Scale and translation are fitted to a geographic extent once
//! and then reused for every forward and inverse call.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

use storm_common::BoundingBox;

use crate::{Projection, ProjectionError, ProjectionParams};

/// Latitude limit of the square Mercator world.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Scale the fitting bounds are measured at.
const REFERENCE_SCALE: f64 = 150.0;

/// Fitted Mercator projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    /// Pixels per radian
    scale: f64,
    translate_x: f64,
    translate_y: f64,
}

/// How a projection is framed on the canvas.
///
/// The extent is fitted to `(width·size_factor, height·size_factor)`. When
/// both translate factors are set, the translation is then overridden to
/// `(width·translate_x_factor, height·translate_y_factor)`. The defaults zoom
/// onto the western North Atlantic basin when fitted to a US-states boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionFit {
    pub size_factor: f64,
    #[serde(default)]
    pub translate_x_factor: Option<f64>,
    #[serde(default)]
    pub translate_y_factor: Option<f64>,
}

impl Default for ProjectionFit {
    fn default() -> Self {
        Self {
            size_factor: 6.5,
            translate_x_factor: Some(2.25),
            translate_y_factor: Some(1.8),
        }
    }
}

impl ProjectionFit {
    /// Fit the whole extent into the canvas, centered.
    pub fn centered() -> Self {
        Self {
            size_factor: 1.0,
            translate_x_factor: None,
            translate_y_factor: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.size_factor.is_finite() && self.size_factor > 0.0) {
            return Err(format!(
                "Projection size factor must be positive, got {}",
                self.size_factor
            ));
        }
        let finite = |f: Option<f64>| f.map_or(true, f64::is_finite);
        if !finite(self.translate_x_factor) || !finite(self.translate_y_factor) {
            return Err("Projection translate factors must be finite".to_string());
        }
        if self.translate_x_factor.is_some() != self.translate_y_factor.is_some() {
            return Err("Projection translate factors must be set together".to_string());
        }
        Ok(())
    }
}

fn mercator_y(lat_deg: f64) -> f64 {
    let phi = lat_deg.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (FRAC_PI_4 + phi / 2.0).tan().ln()
}

impl Mercator {
    /// Create a projection from explicit parameters.
    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Fit the extent into a `width × height` canvas, centered.
    ///
    /// The extent's projected bounds are measured at a reference scale, the
    /// scale is multiplied by `min(width/Δx, height/Δy)` and the translation
    /// centers the bounds on the canvas.
    pub fn fit_size(width: f64, height: f64, extent: &BoundingBox) -> Result<Self, ProjectionError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ProjectionError::InvalidTargetSize { width, height });
        }

        let reference = Mercator::new(REFERENCE_SCALE, 0.0, 0.0);
        let (x0, y0) = reference.forward(extent.min_x, extent.max_y);
        let (x1, y1) = reference.forward(extent.max_x, extent.min_y);

        let dx = x1 - x0;
        let dy = y1 - y0;
        if !(dx.is_finite() && dy.is_finite() && dx > 0.0 && dy > 0.0) {
            return Err(ProjectionError::DegenerateExtent {
                width: dx,
                height: dy,
            });
        }

        let k = (width / dx).min(height / dy);
        let translate_x = (width - k * (x1 + x0)) / 2.0;
        let translate_y = (height - k * (y1 + y0)) / 2.0;

        Ok(Self::new(REFERENCE_SCALE * k, translate_x, translate_y))
    }

    /// Fit to a canvas using the framing factors in `fit`.
    pub fn fitted(
        width: f64,
        height: f64,
        extent: &BoundingBox,
        fit: &ProjectionFit,
    ) -> Result<Self, ProjectionError> {
        let projection = Self::fit_size(width * fit.size_factor, height * fit.size_factor, extent)?;
        match (fit.translate_x_factor, fit.translate_y_factor) {
            (Some(fx), Some(fy)) => Ok(projection.with_translate(width * fx, height * fy)),
            _ => Ok(projection),
        }
    }

    /// Same scale, new translation.
    pub fn with_translate(self, translate_x: f64, translate_y: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            ..self
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Projection for Mercator {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = self.translate_x + self.scale * lon.to_radians();
        let y = self.translate_y - self.scale * mercator_y(lat);
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !(x.is_finite() && y.is_finite()) || self.scale == 0.0 {
            return None;
        }

        let lambda = (x - self.translate_x) / self.scale;
        let my = (self.translate_y - y) / self.scale;
        let phi = 2.0 * my.exp().atan() - std::f64::consts::FRAC_PI_2;

        let lon = lambda.to_degrees();
        let lat = phi.to_degrees();
        if !(-180.0..=180.0).contains(&lon) || !lat.is_finite() {
            return None;
        }
        Some((lon, lat))
    }

    fn params(&self) -> ProjectionParams {
        ProjectionParams {
            scale: self.scale,
            translate_x: self.translate_x,
            translate_y: self.translate_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_translate() {
        let proj = Mercator::new(100.0, 400.0, 250.0);
        let (x, y) = proj.forward(0.0, 0.0);
        assert!((x - 400.0).abs() < 1e-9);
        assert!((y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_north_is_up() {
        let proj = Mercator::new(100.0, 0.0, 0.0);
        let (_, y_north) = proj.forward(0.0, 40.0);
        let (_, y_south) = proj.forward(0.0, 10.0);
        assert!(y_north < y_south);
    }

    #[test]
    fn test_roundtrip() {
        let proj = Mercator::new(2500.0, 1800.0, 900.0);
        for &(lon, lat) in &[(-90.0, 29.5), (-60.0, 10.0), (-100.0, 45.0), (0.0, 0.0)] {
            let (x, y) = proj.forward(lon, lat);
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert!((lon - lon2).abs() < 1e-9, "lon {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-9, "lat {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_inverse_outside_domain() {
        let proj = Mercator::new(100.0, 0.0, 0.0);
        assert!(proj.inverse(f64::NAN, 0.0).is_none());
        // 4 radians of longitude is beyond 180 degrees
        assert!(proj.inverse(400.0, 0.0).is_none());
    }

    #[test]
    fn test_poles_are_clamped() {
        let proj = Mercator::new(100.0, 0.0, 0.0);
        let (_, y) = proj.forward(0.0, 90.0);
        assert!(y.is_finite());
        assert_eq!(proj.forward(0.0, 90.0), proj.forward(0.0, MAX_LATITUDE));
    }
}
