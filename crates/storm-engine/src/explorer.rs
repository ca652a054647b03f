//! The storm explorer session.
//!
//! [`StormExplorer`] owns the boundary mask, the current time window and its
//! groups, the density frame on display, and both playback timelines. Every
//! command mutates the session in place; time-driven behavior happens in
//! [`StormExplorer::tick`].

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use projection::Mercator;
use renderer::{render_density, FrequencyGrid, LinearColorScale, Mask, MaskRasterizer, MaskStats, Weighting};
use storm_common::{Observation, PolygonStore, RasterSize, Region, StormError, YearRange};

use crate::config::ExplorerConfig;
use crate::error::{EngineError, Result};
use crate::grouping::{Group, TemporalGroups};
use crate::locator::{count_unique_storms, find_storm, storm_names, StormFrame, StormQuery};
use crate::playback::{GroupPlayback, StormPlayback};

/// What the density frame currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeatmapView {
    /// All time groups, later groups weighted higher
    AllGroups,
    /// A single time group, uniform weight
    Group(usize),
}

/// Something that changed during [`StormExplorer::tick`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlaybackEvent {
    GroupShown {
        index: usize,
        years: Option<YearRange>,
    },
    StormStepped {
        step: usize,
    },
    StormFinished {
        step: usize,
    },
}

/// Snapshot of the current time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub range: YearRange,
    pub observations: usize,
    pub unique_storms: usize,
    pub groups: Vec<Group>,
    pub combined: Option<Group>,
    pub view: HeatmapView,
}

/// A selected storm path.
#[derive(Debug, Clone)]
struct SelectedStorm {
    query: StormQuery,
    path: Vec<Observation>,
}

/// Interactive storm density explorer.
pub struct StormExplorer {
    config: ExplorerConfig,
    observations: Vec<Observation>,
    store: PolygonStore,
    projection: Mercator,
    size: RasterSize,
    rasterizer: MaskRasterizer,
    mask: Arc<Mask>,
    grid: FrequencyGrid,
    scale: LinearColorScale,
    frame: Vec<u8>,
    view: HeatmapView,
    range: YearRange,
    groups: TemporalGroups,
    group_playback: GroupPlayback,
    storm: Option<SelectedStorm>,
    storm_playback: StormPlayback,
}

impl StormExplorer {
    /// Build an explorer from boundary regions and observations.
    ///
    /// Regions are simplified with the configured tolerance. The session
    /// starts on the full allowed time window, showing all groups.
    pub fn new(
        config: ExplorerConfig,
        regions: &[Region],
        observations: Vec<Observation>,
    ) -> Result<Self> {
        config.validate().map_err(EngineError::config)?;
        let store = PolygonStore::from_regions(regions, config.simplify_tolerance)?;
        Self::with_store(config, store, observations)
    }

    /// Build an explorer from a prepared polygon store.
    pub fn with_store(
        config: ExplorerConfig,
        store: PolygonStore,
        observations: Vec<Observation>,
    ) -> Result<Self> {
        config.validate().map_err(EngineError::config)?;

        let extent = store.extent().ok_or(StormError::EmptyBoundary)?;
        let size = config.canvas_size();
        let projection = Mercator::fitted(
            size.width as f64,
            size.height as f64,
            &extent,
            &config.projection_fit,
        )?;

        let mut rasterizer = MaskRasterizer::new();
        let mask = rasterizer.get_or_build(size, &projection, &store);
        if mask.count_inside() == 0 {
            warn!("Boundary does not cover any canvas pixel; heatmap will be empty");
        }

        let range = config.range_limits.full_range();
        let groups = TemporalGroups::build(
            &observations,
            range,
            config.group_count,
            config.include_combined_group,
        );
        let mut group_playback = GroupPlayback::new(config.group_period());
        group_playback.reset(groups.len());

        info!(
            polygons = store.len(),
            vertices = store.vertex_count(),
            observations = observations.len(),
            inside_pixels = mask.count_inside(),
            width = size.width,
            height = size.height,
            "Storm explorer initialized"
        );

        let mut explorer = Self {
            scale: LinearColorScale::from_style(&config.heatmap),
            storm_playback: StormPlayback::new(config.storm_period()),
            grid: FrequencyGrid::new(size),
            frame: Vec::new(),
            view: HeatmapView::AllGroups,
            storm: None,
            config,
            observations,
            store,
            projection,
            size,
            rasterizer,
            mask,
            range,
            groups,
            group_playback,
        };
        explorer.render_all_groups();
        Ok(explorer)
    }

    // ========================================================================
    // Time window and groups
    // ========================================================================

    /// Change the time window.
    ///
    /// The window is validated before anything changes; on success the
    /// groups are rebuilt, group playback is stopped and rewound, and the
    /// frame shows all groups.
    #[instrument(skip(self))]
    pub fn set_time_range(&mut self, start: i32, end: i32) -> Result<RangeSummary> {
        let range = self.config.range_limits.validate(start, end)?;

        self.range = range;
        self.groups = TemporalGroups::build(
            &self.observations,
            range,
            self.config.group_count,
            self.config.include_combined_group,
        );
        self.group_playback.reset(self.groups.len());
        self.render_all_groups();

        let summary = self.summary();
        info!(
            range = %range,
            observations = summary.observations,
            unique_storms = summary.unique_storms,
            "Time range updated"
        );
        Ok(summary)
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn groups(&self) -> &TemporalGroups {
        &self.groups
    }

    pub fn summary(&self) -> RangeSummary {
        RangeSummary {
            range: self.range,
            observations: self.groups.total(),
            unique_storms: count_unique_storms(&self.observations, self.range),
            groups: self.groups.groups().to_vec(),
            combined: self.groups.combined().cloned(),
            view: self.view,
        }
    }

    /// Show every group, weighting group `i` by `i + 1`.
    pub fn render_all_groups(&mut self) {
        let skipped = self.grid.accumulate(
            self.groups.slices(),
            Weighting::ByGroupIndex,
            &self.mask,
            &self.projection,
        );
        self.finish_frame(HeatmapView::AllGroups, skipped);
    }

    /// Show one group with uniform weight.
    pub fn render_group(&mut self, index: usize) -> Result<()> {
        let group = self
            .groups
            .group(index)
            .ok_or(EngineError::GroupOutOfRange {
                index,
                count: self.groups.len(),
            })?;
        let slice = self.groups.slice(group);
        let skipped = self.grid.accumulate(
            std::iter::once(slice),
            Weighting::Uniform,
            &self.mask,
            &self.projection,
        );
        self.finish_frame(HeatmapView::Group(index), skipped);
        Ok(())
    }

    fn finish_frame(&mut self, view: HeatmapView, skipped: usize) {
        self.frame = render_density(&self.grid, &self.mask, &self.scale);
        self.view = view;
        if skipped > 0 {
            warn!(skipped, "Observations with non-finite projection were skipped");
        }
        debug!(view = ?view, max = self.grid.max(), "Frame rendered");
    }

    /// Jump to a group and show it; stops group playback.
    #[instrument(skip(self))]
    pub fn go_to_group(&mut self, index: usize) -> Result<()> {
        if !self.group_playback.go_to(index) {
            return Err(EngineError::GroupOutOfRange {
                index,
                count: self.groups.len(),
            });
        }
        self.render_group(index)
    }

    /// Move `delta` groups from the current one, wrapping; stops group playback.
    ///
    /// Does nothing when the window has no groups.
    pub fn step_group(&mut self, delta: isize) -> Result<Option<usize>> {
        match self.group_playback.offset(delta) {
            Some(index) => {
                self.go_to_group(index)?;
                Ok(Some(index))
            }
            None => Ok(None),
        }
    }

    pub fn current_group(&self) -> usize {
        self.group_playback.index()
    }

    pub fn start_group_playback(&mut self, now: Duration) -> bool {
        self.group_playback.start(now)
    }

    pub fn stop_group_playback(&mut self) {
        self.group_playback.stop();
    }

    pub fn toggle_group_playback(&mut self, now: Duration) -> bool {
        let playing = self.group_playback.toggle(now);
        debug!(playing, "Group playback toggled");
        playing
    }

    pub fn is_group_playing(&self) -> bool {
        self.group_playback.is_playing()
    }

    // ========================================================================
    // Storm paths
    // ========================================================================

    /// Select a storm by `"NAME - YEAR"`.
    pub fn select_storm_query(&mut self, query: &str) -> Result<usize> {
        let query = StormQuery::parse(query)?;
        self.select_storm(&query.name, query.year)
    }

    /// Select a storm path; returns its number of observations.
    ///
    /// The previous selection is replaced and storm playback rewinds to the
    /// first step.
    #[instrument(skip(self))]
    pub fn select_storm(&mut self, name: &str, year: i32) -> Result<usize> {
        let query = StormQuery::new(name, year);
        let path = find_storm(&self.observations, &query);
        if path.is_empty() {
            return Err(EngineError::StormNotFound {
                name: query.name,
                year,
            });
        }

        let steps = path.len();
        self.storm_playback.reset(steps);
        info!(storm = %query, steps, "Storm selected");
        self.storm = Some(SelectedStorm { query, path });
        Ok(steps)
    }

    pub fn clear_storm(&mut self) {
        self.storm = None;
        self.storm_playback.reset(0);
    }

    pub fn selected_storm(&self) -> Option<&StormQuery> {
        self.storm.as_ref().map(|s| &s.query)
    }

    /// Move `delta` steps along the selected path, clamped to its ends.
    pub fn step_storm(&mut self, delta: isize) -> Option<StormFrame> {
        self.storm.as_ref()?;
        self.storm_playback.seek(delta);
        self.storm_frame()
    }

    /// Frame for the current step of the selected storm.
    pub fn storm_frame(&self) -> Option<StormFrame> {
        let storm = self.storm.as_ref()?;
        StormFrame::build(&storm.path, self.storm_playback.step(), &self.projection)
    }

    pub fn start_storm_playback(&mut self, now: Duration) -> bool {
        self.storm_playback.start(now)
    }

    pub fn stop_storm_playback(&mut self) {
        self.storm_playback.stop();
    }

    pub fn toggle_storm_playback(&mut self, now: Duration) -> bool {
        let playing = self.storm_playback.toggle(now);
        debug!(playing, "Storm playback toggled");
        playing
    }

    pub fn is_storm_playing(&self) -> bool {
        self.storm_playback.is_playing()
    }

    /// `"NAME - YEAR"` keys of every named storm in the dataset.
    pub fn storm_names(&self) -> Vec<String> {
        storm_names(&self.observations)
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Advance both timelines to `now`.
    pub fn tick(&mut self, now: Duration) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();

        if let Some(index) = self.group_playback.tick(now) {
            match self.render_group(index) {
                Ok(()) => events.push(PlaybackEvent::GroupShown {
                    index,
                    years: self.groups.group(index).and_then(|g| g.years),
                }),
                Err(e) => warn!(error = %e, "Group playback tick failed"),
            }
        }

        if let Some(tick) = self.storm_playback.tick(now) {
            if tick.advanced {
                events.push(PlaybackEvent::StormStepped { step: tick.step });
            }
            if tick.finished {
                events.push(PlaybackEvent::StormFinished { step: tick.step });
            }
        }

        events
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn size(&self) -> RasterSize {
        self.size
    }

    pub fn projection(&self) -> &Mercator {
        &self.projection
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn store(&self) -> &PolygonStore {
        &self.store
    }

    pub fn frequency(&self) -> &FrequencyGrid {
        &self.grid
    }

    /// RGBA pixels of the current frame (`width × height × 4`).
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn view(&self) -> HeatmapView {
        self.view
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Hit/miss counts of the mask cache.
    pub fn mask_stats(&self) -> MaskStats {
        self.rasterizer.stats()
    }
}
