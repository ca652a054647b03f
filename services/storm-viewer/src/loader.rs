//! Input loading: boundary regions and observation records.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use storm_common::{FeatureCollection, MalformedPolicy, ObservationSet, Region};

/// Load boundary regions from a GeoJSON feature collection or a plain
/// `[{"name", "geometry"}]` list.
pub fn load_regions<P: AsRef<Path>>(path: P) -> Result<Vec<Region>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read boundary from {:?}", path))?;
    let regions = parse_regions(&content)
        .with_context(|| format!("Failed to parse boundary from {:?}", path))?;

    info!(path = ?path, regions = regions.len(), "Loaded boundary");
    Ok(regions)
}

/// Parse boundary JSON in either supported layout.
pub fn parse_regions(content: &str) -> Result<Vec<Region>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if value.get("features").is_some() {
        let collection: FeatureCollection = serde_json::from_value(value)?;
        Ok(collection.into_regions())
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

/// Load observation records from a JSON array.
pub fn load_observations<P: AsRef<Path>>(
    path: P,
    policy: MalformedPolicy,
) -> Result<ObservationSet> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read observations from {:?}", path))?;
    let set = ObservationSet::from_json(&content, policy)
        .with_context(|| format!("Failed to parse observations from {:?}", path))?;

    info!(
        path = ?path,
        observations = set.observations.len(),
        skipped = set.skipped,
        "Loaded observations"
    );
    Ok(set)
}
