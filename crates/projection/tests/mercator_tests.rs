//! Tests for fitting the Mercator projection to a canvas.

use projection::{Mercator, Projection, ProjectionError, ProjectionFit};
use storm_common::BoundingBox;
use test_utils::{assert_approx_eq, assert_coords_approx_eq};

// ============================================================================
// fit_size tests
// ============================================================================

#[test]
fn test_fit_symmetric_extent_is_centered() {
    let extent = BoundingBox::new(-10.0, -10.0, 10.0, 10.0);
    let proj = Mercator::fit_size(200.0, 200.0, &extent).unwrap();

    let (cx, cy) = proj.forward(0.0, 0.0);
    assert_coords_approx_eq!((cx, cy), (100.0, 100.0), 1e-9);

    // Mercator stretches latitude, so the height is the limiting dimension
    let (_, top) = proj.forward(0.0, 10.0);
    let (_, bottom) = proj.forward(0.0, -10.0);
    assert_approx_eq!(top, 0.0, 1e-9);
    assert_approx_eq!(bottom, 200.0, 1e-9);

    let (left, _) = proj.forward(-10.0, 0.0);
    assert!(left > 0.0);
}

#[test]
fn test_fit_wide_extent_limited_by_width() {
    let extent = BoundingBox::new(-100.0, 20.0, -60.0, 30.0);
    let proj = Mercator::fit_size(400.0, 400.0, &extent).unwrap();

    let (left, _) = proj.forward(-100.0, 25.0);
    let (right, _) = proj.forward(-60.0, 25.0);
    assert_approx_eq!(left, 0.0, 1e-9);
    assert_approx_eq!(right, 400.0, 1e-9);

    // Vertically centered
    let (_, top) = proj.forward(-80.0, 30.0);
    let (_, bottom) = proj.forward(-80.0, 20.0);
    assert_approx_eq!((top + bottom) / 2.0, 200.0, 1e-9);
}

#[test]
fn test_fit_degenerate_extent() {
    let point = BoundingBox::new(5.0, 5.0, 5.0, 5.0);
    assert!(matches!(
        Mercator::fit_size(100.0, 100.0, &point),
        Err(ProjectionError::DegenerateExtent { .. })
    ));

    let extent = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    assert!(matches!(
        Mercator::fit_size(0.0, 100.0, &extent),
        Err(ProjectionError::InvalidTargetSize { .. })
    ));
}

// ============================================================================
// Framing tests
// ============================================================================

#[test]
fn test_fitted_overrides_translation() {
    let extent = BoundingBox::new(-125.0, 24.0, -66.0, 50.0);
    let fit = ProjectionFit::default();
    let proj = Mercator::fitted(800.0, 500.0, &extent, &fit).unwrap();
    let plain = Mercator::fit_size(800.0 * 6.5, 500.0 * 6.5, &extent).unwrap();

    let params = proj.params();
    assert_approx_eq!(params.scale, plain.params().scale, 1e-9);
    assert_approx_eq!(params.translate_x, 1800.0, 1e-9);
    assert_approx_eq!(params.translate_y, 900.0, 1e-9);
    let (x, y) = proj.forward(0.0, 0.0);
    assert_coords_approx_eq!((x, y), (1800.0, 900.0), 1e-6);
}

#[test]
fn test_centered_fit_matches_fit_size() {
    let extent = BoundingBox::new(-100.0, 20.0, -76.0, 35.0);
    let proj = Mercator::fitted(800.0, 500.0, &extent, &ProjectionFit::centered()).unwrap();
    let plain = Mercator::fit_size(800.0, 500.0, &extent).unwrap();
    assert_eq!(proj, plain);
}

#[test]
fn test_params_bits_detect_changes() {
    let a = Mercator::new(100.0, 10.0, 20.0);
    let b = a.with_translate(10.0, 21.0);
    assert_eq!(a.params().to_bits(), Mercator::new(100.0, 10.0, 20.0).params().to_bits());
    assert_ne!(a.params().to_bits(), b.params().to_bits());
}

#[test]
fn test_fit_validate() {
    assert!(ProjectionFit::default().validate().is_ok());
    let bad = ProjectionFit {
        size_factor: 0.0,
        ..ProjectionFit::default()
    };
    assert!(bad.validate().is_err());

    let half = ProjectionFit {
        translate_y_factor: None,
        ..ProjectionFit::default()
    };
    assert!(half.validate().is_err());
    assert!(ProjectionFit::centered().validate().is_ok());
}
