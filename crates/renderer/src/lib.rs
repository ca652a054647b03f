//! Raster rendering for storm density heatmaps.
//!
//! The pipeline for one frame:
//!
//! ```text
//!   PolygonStore ──► mask::MaskRasterizer ──► Arc<Mask>
//!                                               │
//!   observation groups ──► density::FrequencyGrid::accumulate
//!                                               │
//!                          gradient::render_density ──► RGBA ──► png
//! ```

pub mod density;
pub mod error;
pub mod gradient;
pub mod mask;
pub mod png;

pub use density::{wind_radius_km, Footprint, FrequencyGrid, Weighting};
pub use error::{RenderError, RenderResult};
pub use gradient::{render_density, LinearColorScale};
pub use mask::{Mask, MaskKey, MaskRasterizer, MaskStats};
