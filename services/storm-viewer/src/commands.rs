//! Subcommand implementations.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use storm_common::YearRange;
use storm_engine::{PlaybackEvent, RangeSummary, StormExplorer, StormFrame};

use crate::config::ViewerConfig;
use crate::loader::{load_observations, load_regions};

/// Load inputs and build an explorer session.
pub fn open_explorer(config: &ViewerConfig) -> Result<StormExplorer> {
    let regions = load_regions(&config.boundary_path)?;
    let set = load_observations(&config.observations_path, config.explorer.malformed_policy)?;
    let explorer = StormExplorer::new(config.explorer.clone(), &regions, set.observations)
        .context("Failed to initialize storm explorer")?;
    Ok(explorer)
}

/// Encode the explorer's current frame as PNG.
pub fn write_frame(explorer: &StormExplorer, path: &Path) -> Result<()> {
    let size = explorer.size();
    let png = renderer::png::encode_rgba(explorer.frame(), size.width, size.height)?;
    fs::write(path, png).with_context(|| format!("Failed to write frame to {:?}", path))?;
    Ok(())
}

/// Result of the `render` command.
#[derive(Debug, Serialize)]
pub struct RenderReport {
    pub summary: RangeSummary,
    pub files: Vec<PathBuf>,
}

/// Write the all-groups heatmap plus one heatmap per group.
pub fn render(
    explorer: &mut StormExplorer,
    range: Option<YearRange>,
    out_dir: &Path,
) -> Result<RenderReport> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;

    if let Some(range) = range {
        explorer.set_time_range(range.start, range.end)?;
    } else {
        explorer.render_all_groups();
    }

    let mut files = Vec::new();
    let combined = out_dir.join("heatmap_all.png");
    write_frame(explorer, &combined)?;
    files.push(combined);

    for index in 0..explorer.groups().len() {
        explorer.go_to_group(index)?;
        let path = out_dir.join(format!("heatmap_group_{}.png", index));
        write_frame(explorer, &path)?;
        files.push(path);
    }

    // leave the session on the weighted view the summary describes
    explorer.render_all_groups();
    let summary = explorer.summary();
    info!(range = %summary.range, files = files.len(), "Rendered heatmaps");

    Ok(RenderReport { summary, files })
}

/// Every step of a storm path, first to last.
pub fn storm_frames(explorer: &mut StormExplorer, query: &str) -> Result<Vec<StormFrame>> {
    let steps = explorer.select_storm_query(query)?;

    let mut frames = Vec::with_capacity(steps);
    frames.extend(explorer.storm_frame());
    for _ in 1..steps {
        frames.extend(explorer.step_storm(1));
    }
    Ok(frames)
}

/// Drive group playback on a wall-clock interval, writing a PNG per shown group.
///
/// The engine sees a logical clock advancing one group period per interval
/// tick, so output does not depend on scheduling jitter.
pub async fn animate(
    explorer: &mut StormExplorer,
    ticks: usize,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;

    let period = explorer.config().group_period();
    if !explorer.start_group_playback(Duration::ZERO) {
        warn!(range = %explorer.range(), "No groups to animate");
        return Ok(Vec::new());
    }

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await;

    let mut files = Vec::with_capacity(ticks);
    let mut elapsed = Duration::ZERO;
    while files.len() < ticks && explorer.is_group_playing() {
        interval.tick().await;
        elapsed += period;

        for event in explorer.tick(elapsed) {
            if let PlaybackEvent::GroupShown { index, years } = event {
                let path = out_dir.join(format!("frame_{:03}.png", files.len()));
                write_frame(explorer, &path)?;
                info!(frame = files.len(), group = index, years = ?years, "Wrote animation frame");
                files.push(path);
            }
        }
    }

    explorer.stop_group_playback();
    Ok(files)
}
