//! Storm density accumulation.
//!
//! Each observation stamps a filled circle onto a frequency grid. The circle
//! radius grows with the storm's wind speed, and only pixels inside the
//! landmass mask are counted.

use tracing::debug;

use projection::Projection;
use storm_common::{Observation, RasterSize};

use crate::mask::Mask;

/// Kilometres per degree of longitude used to size footprints.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Footprint radius in kilometres for a maximum sustained wind in knots.
pub fn wind_radius_km(knots: u32) -> f64 {
    match knots {
        0..=33 => 10.0,
        34..=63 => 50.0,
        64..=82 => 100.0,
        83..=95 => 150.0,
        96..=112 => 200.0,
        113..=136 => 250.0,
        _ => 300.0,
    }
}

/// How much each group contributes per covered pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weighting {
    /// Group `i` (0-based) adds `i + 1`, so later periods weigh more
    #[default]
    ByGroupIndex,
    /// Every observation adds 1
    Uniform,
}

impl Weighting {
    #[inline]
    pub fn weight(&self, group_index: usize) -> u32 {
        match self {
            Weighting::ByGroupIndex => group_index as u32 + 1,
            Weighting::Uniform => 1,
        }
    }
}

/// Pixel-space footprint of one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub center_x: f64,
    pub center_y: f64,
    pub radius_sq: f64,
}

impl Footprint {
    /// Project an observation's position and radius into pixel space.
    ///
    /// The pixel radius is the distance to the projection of a point
    /// `radius / 111` degrees east of the center. Returns `None` when the
    /// projection is not finite.
    pub fn project<P: Projection + ?Sized>(obs: &Observation, projection: &P) -> Option<Self> {
        let (cx, cy) = projection.forward(obs.longitude, obs.latitude);
        let radius_deg = wind_radius_km(obs.max_wind_knots) / KM_PER_DEGREE;
        let (ex, ey) = projection.forward(obs.longitude + radius_deg, obs.latitude);

        let dx = ex - cx;
        let dy = ey - cy;
        let radius_sq = dx * dx + dy * dy;

        if !(cx.is_finite() && cy.is_finite() && radius_sq.is_finite()) {
            return None;
        }

        Some(Self {
            center_x: cx,
            center_y: cy,
            radius_sq,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius_sq.sqrt()
    }
}

/// Weighted per-pixel storm counts, same layout as the mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyGrid {
    size: RasterSize,
    counts: Vec<u32>,
}

impl FrequencyGrid {
    pub fn new(size: RasterSize) -> Self {
        Self {
            size,
            counts: vec![0; size.len()],
        }
    }

    pub fn size(&self) -> RasterSize {
        self.size
    }

    pub fn reset(&mut self) {
        self.counts.fill(0);
    }

    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.counts[self.size.flat_index(x, y)]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Add `weight` to every mask-inside pixel within the footprint.
    pub fn splat(&mut self, footprint: &Footprint, weight: u32, mask: &Mask) {
        let r = footprint.radius();
        let (cx, cy) = (footprint.center_x, footprint.center_y);

        let Some((x0, x1, y0, y1)) = self.size.clip_span((cx - r, cy - r), (cx + r, cy + r)) else {
            return;
        };

        for y in y0..=y1 {
            let dy = y as f64 - cy;
            for x in x0..=x1 {
                let idx = self.size.flat_index(x, y);
                if !mask.is_inside_index(idx) {
                    continue;
                }
                let dx = x as f64 - cx;
                if dx * dx + dy * dy <= footprint.radius_sq {
                    self.counts[idx] = self.counts[idx].saturating_add(weight);
                }
            }
        }
    }

    /// Rebuild the grid from scratch for an ordered list of groups.
    ///
    /// Returns the number of observations skipped because their projection
    /// was not finite.
    pub fn accumulate<'a, P, I>(
        &mut self,
        groups: I,
        weighting: Weighting,
        mask: &Mask,
        projection: &P,
    ) -> usize
    where
        P: Projection + ?Sized,
        I: IntoIterator<Item = &'a [Observation]>,
    {
        self.reset();
        let mut skipped = 0;
        let mut stamped = 0;

        for (group_index, group) in groups.into_iter().enumerate() {
            let weight = weighting.weight(group_index);
            for obs in group {
                match Footprint::project(obs, projection) {
                    Some(footprint) => {
                        self.splat(&footprint, weight, mask);
                        stamped += 1;
                    }
                    None => {
                        debug!(id = %obs.id, date = obs.date, "Skipping observation with non-finite projection");
                        skipped += 1;
                    }
                }
            }
        }

        debug!(stamped, skipped, max = self.max(), "Accumulated storm density");
        skipped
    }
}
