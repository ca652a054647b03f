//! Common test fixtures for storm-density tests.
//!
//! This module provides pre-defined boundary regions and storm tracks that
//! represent common scenarios in the density pipeline.

use std::io::Write;
use std::path::PathBuf;

use storm_common::{Geometry, Observation, PolygonStore, Region};

/// Common geographic extents for testing, as `(min_lon, min_lat, max_lon, max_lat)`.
pub mod bbox {
    /// Rectangular "mainland" landmass
    pub const MAINLAND: (f64, f64, f64, f64) = (-100.0, 25.0, -80.0, 35.0);

    /// Small square island south-east of the mainland
    pub const ISLAND: (f64, f64, f64, f64) = (-78.0, 20.0, -76.0, 22.0);

    /// Union of the mainland and the island
    pub const LANDMASS: (f64, f64, f64, f64) = (-100.0, 20.0, -76.0, 35.0);
}

/// Canvas sizes used across tests.
pub mod canvas {
    /// Default explorer canvas
    pub const DEFAULT: (usize, usize) = (800, 500);

    /// Small canvas for fast mask tests
    pub const SMALL: (usize, usize) = (200, 125);
}

/// Closed rectangular ring from a `(min_lon, min_lat, max_lon, max_lat)` box.
pub fn rectangle_ring((min_x, min_y, max_x, max_y): (f64, f64, f64, f64)) -> Vec<[f64; 2]> {
    vec![
        [min_x, min_y],
        [max_x, min_y],
        [max_x, max_y],
        [min_x, max_y],
        [min_x, min_y],
    ]
}

/// A region made of one rectangle.
pub fn rectangle_region(name: &str, extent: (f64, f64, f64, f64)) -> Region {
    Region {
        name: name.to_string(),
        geometry: Geometry::Polygon(vec![rectangle_ring(extent)]),
    }
}

/// Mainland plus island, as two regions.
pub fn landmass_regions() -> Vec<Region> {
    vec![
        rectangle_region("Mainland", bbox::MAINLAND),
        rectangle_region("Island", bbox::ISLAND),
    ]
}

/// Unsimplified store of [`landmass_regions`].
pub fn landmass_store() -> PolygonStore {
    PolygonStore::from_regions(&landmass_regions(), 0.0).expect("landmass fixture is valid")
}

/// Build an observation.
pub fn observation(
    id: &str,
    name: &str,
    date: u32,
    latitude: f64,
    longitude: f64,
    max_wind_knots: u32,
    status: &str,
) -> Observation {
    Observation {
        id: id.to_string(),
        name: name.to_string(),
        date,
        latitude,
        longitude,
        max_wind_knots,
        status: status.to_string(),
    }
}

/// Hurricane Katrina (2005), daily fixes.
pub fn katrina_2005() -> Vec<Observation> {
    let fix = |date, lat, lon, wind, status| {
        observation("AL122005", "KATRINA", date, lat, lon, wind, status)
    };
    vec![
        fix(20050823, 23.1, -75.1, 30, "TD"),
        fix(20050824, 24.5, -76.5, 40, "TS"),
        fix(20050825, 26.0, -80.1, 70, "HU"),
        fix(20050826, 25.3, -81.5, 65, "HU"),
        fix(20050827, 24.6, -84.4, 100, "HU"),
        fix(20050828, 26.3, -88.6, 150, "HU"),
        fix(20050829, 29.5, -89.6, 110, "HU"),
        fix(20050830, 35.6, -88.0, 30, "TD"),
        fix(20050831, 40.1, -82.9, 25, "EX"),
    ]
}

/// Tropical Storm Katrina (1999), a different storm with the same name.
pub fn katrina_1999() -> Vec<Observation> {
    vec![
        observation("AL161999", "KATRINA", 19991029, 11.0, -81.6, 30, "TD"),
        observation("AL161999", "KATRINA", 19991030, 13.6, -83.5, 35, "TS"),
        observation("AL161999", "KATRINA", 19991031, 15.3, -85.7, 30, "TD"),
        observation("AL161999", "KATRINA", 19991101, 17.8, -88.5, 25, "LO"),
    ]
}

/// The 1900 Galveston hurricane, stored under the unnamed sentinel.
pub fn galveston_1900() -> Vec<Observation> {
    vec![
        observation("AL011900", "UNNAMED", 19000906, 24.0, -85.6, 105, "HU"),
        observation("AL011900", "UNNAMED", 19000908, 28.6, -93.8, 125, "HU"),
        observation("AL011900", "UNNAMED", 19000909, 31.5, -97.3, 60, "TS"),
    ]
}

/// Hurricane Andrew (1992).
pub fn andrew_1992() -> Vec<Observation> {
    vec![
        observation("AL041992", "ANDREW  ", 19920822, 25.6, -70.2, 110, "HU"),
        observation("AL041992", "ANDREW  ", 19920824, 25.5, -80.3, 145, "HU"),
        observation("AL041992", "ANDREW  ", 19920826, 29.4, -91.4, 100, "HU"),
    ]
}

/// A small mixed dataset in dataset order.
pub fn storm_dataset() -> Vec<Observation> {
    let mut all = galveston_1900();
    all.extend(andrew_1992());
    all.extend(katrina_1999());
    all.extend(katrina_2005());
    all
}

/// Raw observation JSON in the dataset export format.
pub const OBSERVATIONS_JSON: &str = r#"[
    {"ID": "AL041992", "NAME": "ANDREW  ", "Date": 19920824, "Latitude": 25.5, "Longitude": -80.3,
     "Maximum Sustained Wind": 145, "Status of System": "HU"},
    {"ID": "AL122005", "NAME": "KATRINA", "Date": 20050829, "Latitude": "29.5N", "Longitude": "89.6W",
     "MaximumSustainedWind": 110, "StatusOfSystem": " HU"},
    {"ID": "AL122005", "NAME": "KATRINA", "Date": 20050830, "Latitude": 35.6, "Longitude": -88.0,
     "MaximumSustainedWind": -99, "StatusOfSystem": "TD"}
]"#;

/// Write `contents` to a named temporary file with the given extension.
///
/// The file is deleted when the returned handle is dropped.
pub fn temp_file(contents: &str, extension: &str) -> (tempfile::NamedTempFile, PathBuf) {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{}", extension))
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    let path = file.path().to_path_buf();
    (file, path)
}
