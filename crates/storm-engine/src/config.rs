//! Configuration for the storm explorer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use projection::ProjectionFit;
use storm_common::{Color, HeatmapStyle, MalformedPolicy, RangeLimits, RasterSize};

/// Configuration for a [`crate::StormExplorer`] session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Canvas width in pixels.
    pub canvas_width: usize,

    /// Canvas height in pixels.
    pub canvas_height: usize,

    /// Number of time groups the filtered observations are split into.
    pub group_count: usize,

    /// Group playback tick period in milliseconds.
    pub group_period_ms: u64,

    /// Storm-path playback tick period in milliseconds.
    pub storm_period_ms: u64,

    /// Also keep an "all periods combined" group alongside the time groups.
    pub include_combined_group: bool,

    /// Bounds a requested time window must satisfy.
    pub range_limits: RangeLimits,

    /// Ring simplification tolerance in degrees (0 disables).
    pub simplify_tolerance: f64,

    /// How the boundary is framed on the canvas.
    pub projection_fit: ProjectionFit,

    /// Heatmap endpoint colors.
    pub heatmap: HeatmapStyle,

    /// What to do with malformed observation records.
    pub malformed_policy: MalformedPolicy,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 500,
            group_count: 5,
            group_period_ms: 2000,
            storm_period_ms: 1000,
            include_combined_group: true,
            range_limits: RangeLimits::default(),
            simplify_tolerance: 0.1,
            projection_fit: ProjectionFit::default(),
            heatmap: HeatmapStyle::default(),
            malformed_policy: MalformedPolicy::Skip,
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Override fields from `STORM_*` environment variables.
    ///
    /// Unset or unparseable variables leave the field unchanged.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Override fields from `STORM_*` values supplied by `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            name: &str,
        ) -> Option<T> {
            lookup(name).and_then(|v| v.trim().parse().ok())
        }

        if let Some(v) = parsed(&lookup, "STORM_CANVAS_WIDTH") {
            self.canvas_width = v;
        }
        if let Some(v) = parsed(&lookup, "STORM_CANVAS_HEIGHT") {
            self.canvas_height = v;
        }
        if let Some(v) = parsed(&lookup, "STORM_GROUP_COUNT") {
            self.group_count = v;
        }
        if let Some(v) = parsed(&lookup, "STORM_GROUP_PERIOD_MS") {
            self.group_period_ms = v;
        }
        if let Some(v) = parsed(&lookup, "STORM_STORM_PERIOD_MS") {
            self.storm_period_ms = v;
        }
        if let Some(val) = lookup("STORM_INCLUDE_COMBINED") {
            self.include_combined_group = val.to_lowercase() == "true" || val == "1";
        }
        if let Some(v) = parsed(&lookup, "STORM_SIMPLIFY_TOLERANCE") {
            self.simplify_tolerance = v;
        }
        if let Some(val) = lookup("STORM_HEATMAP_LOW") {
            self.heatmap.low = Color::from_text(&val);
        }
        if let Some(val) = lookup("STORM_HEATMAP_HIGH") {
            self.heatmap.high = Color::from_text(&val);
        }
        if let Some(val) = lookup("STORM_MALFORMED_POLICY") {
            self.malformed_policy = MalformedPolicy::from_str(&val);
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            ));
        }

        if self.group_count == 0 {
            return Err("group_count must be > 0".to_string());
        }

        if self.group_period_ms == 0 || self.storm_period_ms == 0 {
            return Err("playback periods must be > 0".to_string());
        }

        if !(self.simplify_tolerance.is_finite() && self.simplify_tolerance >= 0.0) {
            return Err(format!(
                "simplify_tolerance must be >= 0, got {}",
                self.simplify_tolerance
            ));
        }

        let limits = &self.range_limits;
        if limits.min_start > limits.max_start || limits.min_end > limits.max_end {
            return Err("range_limits bounds are inverted".to_string());
        }
        if limits.min_span < 0 {
            return Err("range_limits.min_span must be >= 0".to_string());
        }

        self.projection_fit.validate()?;
        self.heatmap.validate()?;

        Ok(())
    }

    pub fn canvas_size(&self) -> RasterSize {
        RasterSize::new(self.canvas_width, self.canvas_height)
    }

    pub fn group_period(&self) -> Duration {
        Duration::from_millis(self.group_period_ms)
    }

    pub fn storm_period(&self) -> Duration {
        Duration::from_millis(self.storm_period_ms)
    }
}
