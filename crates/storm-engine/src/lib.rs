//! Storm Density Explorer Engine
//!
//! This crate turns a boundary and a storm-track dataset into an explorable
//! density heatmap. It provides:
//!
//! - **Time windows**: validated year ranges split into balanced groups
//! - **Playback**: clock-driven group cycling and storm-path stepping
//! - **Storm lookup**: `"NAME - YEAR"` search with per-step frames
//!
//! # Architecture
//!
//! ```text
//! set_time_range(start, end)
//!      │
//!      ├─► RangeLimits::validate (rejects before any mutation)
//!      │
//!      ├─► TemporalGroups::build (filter, stable sort, partition)
//!      │
//!      └─► FrequencyGrid::accumulate ──► render_density ──► frame()
//!                 ▲
//!                 │ Arc<Mask> (built once per canvas/projection/boundary)
//!
//! tick(now)
//!      ├─► GroupPlayback  ──► render_group(i)  ──► GroupShown
//!      └─► StormPlayback  ──► StormFrame        ──► StormStepped / StormFinished
//! ```
//!
//! # Example
//!
//! ```ignore
//! use storm_engine::{ExplorerConfig, StormExplorer};
//!
//! let mut explorer = StormExplorer::new(ExplorerConfig::default(), &regions, observations)?;
//! explorer.set_time_range(1950, 2000)?;
//! explorer.go_to_group(2)?;
//! let pixels = explorer.frame();
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod explorer;
pub mod grouping;
pub mod locator;
pub mod playback;

// Re-export commonly used types at crate root
pub use classify::{classify, hurricane_category, StormCategory};
pub use config::ExplorerConfig;
pub use error::{EngineError, Result};
pub use explorer::{HeatmapView, PlaybackEvent, RangeSummary, StormExplorer};
pub use grouping::{partition_sizes, Group, TemporalGroups};
pub use locator::{count_unique_storms, find_storm, knots_to_mph, storm_names, StormFrame, StormQuery};
pub use playback::{GroupPlayback, PlayState, StormPlayback, StormTick, Timeline};
