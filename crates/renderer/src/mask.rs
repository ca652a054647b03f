//! Landmass inclusion mask.
//!
//! Rasterizes the boundary polygons onto the pixel canvas by inverse
//! projecting each pixel and testing it against the [`PolygonStore`]. Only
//! the rectangle covered by the projected boundary extent is scanned; every
//! other pixel is outside.

use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

use projection::Projection;
use storm_common::{PolygonStore, RasterSize};

/// Per-pixel "inside the landmass" flags, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    size: RasterSize,
    inside: Vec<bool>,
}

impl Mask {
    /// A mask with every pixel outside.
    pub fn empty(size: RasterSize) -> Self {
        Self {
            size,
            inside: vec![false; size.len()],
        }
    }

    /// Build a mask from a per-pixel predicate.
    pub fn from_fn(size: RasterSize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut inside = Vec::with_capacity(size.len());
        for y in 0..size.height {
            for x in 0..size.width {
                inside.push(f(x, y));
            }
        }
        Self { size, inside }
    }

    /// Rasterize the store onto a canvas of `size` pixels.
    ///
    /// Pixels whose inverse projection fails are left outside.
    pub fn rasterize<P>(size: RasterSize, projection: &P, store: &PolygonStore) -> Self
    where
        P: Projection + Sync + ?Sized,
    {
        let mut mask = Self::empty(size);

        let Some(extent) = store.extent() else {
            return mask;
        };

        let (ax, ay) = projection.forward(extent.min_x, extent.max_y);
        let (bx, by) = projection.forward(extent.max_x, extent.min_y);
        let Some((x0, x1, y0, y1)) =
            size.clip_span((ax.min(bx), ay.min(by)), (ax.max(bx), ay.max(by)))
        else {
            debug!(?extent, "Boundary extent lies off canvas");
            return mask;
        };

        mask.inside
            .par_chunks_mut(size.width)
            .enumerate()
            .skip(y0)
            .take(y1 - y0 + 1)
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate().take(x1 + 1).skip(x0) {
                    if let Some((lon, lat)) = projection.inverse(x as f64, y as f64) {
                        *cell = store.contains(lon, lat);
                    }
                }
            });

        debug!(
            width = size.width,
            height = size.height,
            scan_columns = x1 - x0 + 1,
            scan_rows = y1 - y0 + 1,
            inside = mask.count_inside(),
            "Rasterized landmass mask"
        );

        mask
    }

    pub fn size(&self) -> RasterSize {
        self.size
    }

    #[inline]
    pub fn is_inside(&self, x: usize, y: usize) -> bool {
        self.is_inside_index(self.size.flat_index(x, y))
    }

    #[inline]
    pub fn is_inside_index(&self, index: usize) -> bool {
        self.inside.get(index).copied().unwrap_or(false)
    }

    pub fn count_inside(&self) -> usize {
        self.inside.iter().filter(|&&b| b).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.inside
    }
}

/// Everything a mask depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskKey {
    pub size: RasterSize,
    pub projection: [u64; 3],
    pub polygons: u64,
}

impl MaskKey {
    pub fn new<P: Projection + ?Sized>(size: RasterSize, projection: &P, store: &PolygonStore) -> Self {
        Self {
            size,
            projection: projection.params().to_bits(),
            polygons: store.fingerprint(),
        }
    }
}

/// Hit/miss counters for the mask memo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskStats {
    pub hits: u64,
    pub misses: u64,
}

impl MaskStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Builds masks and remembers the most recent one.
///
/// The mask is rebuilt only when the canvas size, the projection parameters
/// or the polygon set change.
#[derive(Debug, Default)]
pub struct MaskRasterizer {
    cached: Option<(MaskKey, Arc<Mask>)>,
    stats: MaskStats,
}

impl MaskRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the mask for these inputs, rasterizing only on a key change.
    pub fn get_or_build<P>(&mut self, size: RasterSize, projection: &P, store: &PolygonStore) -> Arc<Mask>
    where
        P: Projection + Sync + ?Sized,
    {
        let key = MaskKey::new(size, projection, store);

        if let Some((cached_key, mask)) = &self.cached {
            if *cached_key == key {
                self.stats.hits += 1;
                return Arc::clone(mask);
            }
        }

        self.stats.misses += 1;
        let mask = Arc::new(Mask::rasterize(size, projection, store));
        self.cached = Some((key, Arc::clone(&mask)));
        mask
    }

    pub fn stats(&self) -> MaskStats {
        self.stats
    }

    /// Drop the memoized mask.
    pub fn clear(&mut self) {
        self.cached = None;
    }
}
