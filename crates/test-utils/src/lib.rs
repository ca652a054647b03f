//! Shared test utilities for the storm-density workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Boundary and storm-track fixtures
//! - Synthetic observation generators
//! - Approximate-equality assertion macros
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use generators::*;

/// Assert two floats differ by at most `epsilon`.
///
/// Operands are widened to `f64` before comparing.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// // 100 kt in mph
/// assert_approx_eq!(100.0 * 6076.0 / 5280.0, 115.08, 0.01);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "values not within epsilon: {} vs {} (diff {}, epsilon {})",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert two `(x, y)` pairs match component-wise within `epsilon`.
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// // Katrina's Louisiana landfall as (longitude, latitude)
/// assert_coords_approx_eq!((obs.longitude, obs.latitude), (-89.6, 29.5), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}
