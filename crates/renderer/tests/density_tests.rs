//! Tests for density accumulation and heatmap coloring.

use projection::{Mercator, Projection};
use renderer::density::KM_PER_DEGREE;
use renderer::{render_density, wind_radius_km, Footprint, FrequencyGrid, LinearColorScale, Mask, Weighting};
use storm_common::{Observation, RasterSize};
use test_utils::fixtures::{self, canvas};
use test_utils::assert_approx_eq;

// ============================================================================
// Helper functions
// ============================================================================

fn setup() -> (RasterSize, Mercator, Mask) {
    let (w, h) = canvas::SMALL;
    let size = RasterSize::new(w, h);
    let store = fixtures::landmass_store();
    let projection = Mercator::fit_size(w as f64, h as f64, &store.extent().unwrap()).unwrap();
    let mask = Mask::rasterize(size, &projection, &store);
    (size, projection, mask)
}

fn mainland_fix(wind: u32) -> Observation {
    fixtures::observation("T", "TEST", 20000801, 30.0, -90.0, wind, "HU")
}

fn center_pixel(projection: &Mercator) -> (usize, usize) {
    let (x, y) = projection.forward(-90.0, 30.0);
    (x.round() as usize, y.round() as usize)
}

// ============================================================================
// Footprint tests
// ============================================================================

#[test]
fn test_footprint_radius_uses_eastward_offset() {
    let projection = Mercator::new(1000.0, 0.0, 0.0);
    let obs = mainland_fix(140);
    let footprint = Footprint::project(&obs, &projection).unwrap();

    let expected = 1000.0 * (wind_radius_km(140) / KM_PER_DEGREE).to_radians();
    assert_approx_eq!(footprint.radius(), expected, 1e-9);
}

#[test]
fn test_footprint_non_finite_is_none() {
    let projection = Mercator::new(1000.0, 0.0, 0.0);
    let mut obs = mainland_fix(50);
    obs.longitude = f64::NAN;
    assert!(Footprint::project(&obs, &projection).is_none());
}

// ============================================================================
// Accumulation tests
// ============================================================================

#[test]
fn test_group_weights_add_up() {
    let (size, projection, mask) = setup();
    let obs = [mainland_fix(140)];
    let (cx, cy) = center_pixel(&projection);

    let mut grid = FrequencyGrid::new(size);
    grid.accumulate([&obs[..], &obs[..]], Weighting::ByGroupIndex, &mask, &projection);
    assert_eq!(grid.get(cx, cy), 3);
    assert!(grid.as_slice().iter().all(|&c| c == 0 || c == 3));

    grid.accumulate([&obs[..], &obs[..]], Weighting::Uniform, &mask, &projection);
    assert_eq!(grid.get(cx, cy), 2);
    assert_eq!(grid.max(), 2);
}

#[test]
fn test_accumulate_resets_grid() {
    let (size, projection, mask) = setup();
    let obs = [mainland_fix(100)];

    let mut grid = FrequencyGrid::new(size);
    grid.accumulate([&obs[..]], Weighting::Uniform, &mask, &projection);
    let first = grid.clone();
    grid.accumulate([&obs[..]], Weighting::Uniform, &mask, &projection);
    assert_eq!(grid, first);

    grid.accumulate(std::iter::empty::<&[Observation]>(), Weighting::Uniform, &mask, &projection);
    assert_eq!(grid.max(), 0);
}

#[test]
fn test_nothing_counted_outside_mask() {
    let (size, projection, mask) = setup();
    let track = fixtures::katrina_2005();

    let mut grid = FrequencyGrid::new(size);
    grid.accumulate([track.as_slice()], Weighting::ByGroupIndex, &mask, &projection);

    assert!(grid.max() > 0);
    for (idx, &count) in grid.as_slice().iter().enumerate() {
        if !mask.is_inside_index(idx) {
            assert_eq!(count, 0, "pixel {} outside the mask was counted", idx);
        }
    }
}

#[test]
fn test_stronger_storms_cover_more_pixels() {
    let (size, projection, mask) = setup();
    let mut grid = FrequencyGrid::new(size);

    let weak = [mainland_fix(30)];
    grid.accumulate([&weak[..]], Weighting::Uniform, &mask, &projection);
    let weak_total = grid.total();

    let strong = [mainland_fix(150)];
    grid.accumulate([&strong[..]], Weighting::Uniform, &mask, &projection);
    assert!(grid.total() > weak_total);
}

#[test]
fn test_non_finite_observations_are_skipped() {
    let (size, projection, mask) = setup();
    let mut bad = mainland_fix(80);
    bad.longitude = f64::NAN;
    let obs = [bad, mainland_fix(80)];

    let mut grid = FrequencyGrid::new(size);
    let skipped = grid.accumulate([&obs[..]], Weighting::Uniform, &mask, &projection);
    assert_eq!(skipped, 1);
    assert_eq!(grid.max(), 1);
}

// ============================================================================
// Coloring tests
// ============================================================================

#[test]
fn test_render_density_colors() {
    let (size, projection, mask) = setup();
    let obs = [mainland_fix(140)];
    let mut grid = FrequencyGrid::new(size);
    grid.accumulate([&obs[..]], Weighting::Uniform, &mask, &projection);

    let pixels = render_density(&grid, &mask, &LinearColorScale::default());
    assert_eq!(pixels.len(), size.width * size.height * 4);

    for (idx, px) in pixels.chunks_exact(4).enumerate() {
        if !mask.is_inside_index(idx) {
            assert_eq!(px, [0, 0, 0, 0]);
        } else if grid.as_slice()[idx] == 0 {
            assert_eq!(px, [255, 255, 255, 0]);
        } else {
            // Single observation: every covered pixel is at the maximum
            assert_eq!(px, [139, 0, 0, 255]);
        }
    }
}

#[test]
fn test_render_empty_grid_is_transparent() {
    let (size, _, mask) = setup();
    let grid = FrequencyGrid::new(size);
    let pixels = render_density(&grid, &mask, &LinearColorScale::default());
    assert!(pixels.chunks_exact(4).all(|px| px[3] == 0));
}
