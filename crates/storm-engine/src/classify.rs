//! Status-code classification.

use serde::Serialize;
use std::fmt;

/// Human-readable storm classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StormCategory {
    ExtratropicalCyclone,
    TropicalDepression,
    TropicalStorm,
    /// Saffir-Simpson category 1 to 5
    Hurricane(u8),
    SubtropicalCyclone,
    LowPressureSystem,
    TropicalWave,
    Disturbance,
    Unknown,
}

/// Classify a status-of-system code, refining hurricanes by wind speed.
///
/// The code is trimmed before matching; unrecognized codes are
/// [`StormCategory::Unknown`].
pub fn classify(status: &str, wind_knots: u32) -> StormCategory {
    match status.trim() {
        "EX" => StormCategory::ExtratropicalCyclone,
        "TD" => StormCategory::TropicalDepression,
        "TS" => StormCategory::TropicalStorm,
        "HU" => StormCategory::Hurricane(hurricane_category(wind_knots)),
        "SD" | "SS" => StormCategory::SubtropicalCyclone,
        "LO" => StormCategory::LowPressureSystem,
        "WV" => StormCategory::TropicalWave,
        "DB" => StormCategory::Disturbance,
        _ => StormCategory::Unknown,
    }
}

/// Saffir-Simpson category from maximum sustained wind in knots.
pub fn hurricane_category(wind_knots: u32) -> u8 {
    match wind_knots {
        0..=82 => 1,
        83..=95 => 2,
        96..=112 => 3,
        113..=136 => 4,
        _ => 5,
    }
}

impl fmt::Display for StormCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StormCategory::ExtratropicalCyclone => write!(f, "Extratropical Cyclone"),
            StormCategory::TropicalDepression => write!(f, "Tropical Depression"),
            StormCategory::TropicalStorm => write!(f, "Tropical Storm"),
            StormCategory::Hurricane(cat) => write!(f, "Category {} Hurricane", cat),
            StormCategory::SubtropicalCyclone => write!(f, "Subtropical cyclone"),
            StormCategory::LowPressureSystem => write!(f, "Low-pressure system"),
            StormCategory::TropicalWave => write!(f, "Tropical Wave"),
            StormCategory::Disturbance => write!(f, "Disturbance"),
            StormCategory::Unknown => write!(f, "Unknown"),
        }
    }
}
