//! Common types shared by the storm density crates.
//!
//! Observations, boundary geometry, raster dimensions, year ranges and
//! heatmap colors live here so every other crate speaks the same vocabulary.

pub mod bbox;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod observation;
pub mod style;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{StormError, StormResult};
pub use geometry::{FeatureCollection, Geometry, Polygon, PolygonStore, Region};
pub use grid::RasterSize;
pub use observation::{MalformedPolicy, Observation, ObservationRecord, ObservationSet, UNNAMED};
pub use style::{Color, HeatmapStyle};
pub use time::{RangeError, RangeLimits, YearRange};
