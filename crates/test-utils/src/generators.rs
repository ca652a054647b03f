//! Test data generators for creating synthetic storm observations.
//!
//! These generators create predictable, verifiable observation sets that
//! can be used across the test suite. Positions fall inside the fixture
//! mainland (see [`crate::fixtures::bbox::MAINLAND`]).

use storm_common::Observation;

/// Wind speeds (knots) cycled through by the generators, one per radius band.
pub const WIND_CYCLE: [u32; 7] = [25, 45, 70, 90, 100, 120, 140];

/// Creates one observation per year starting at `start_year`.
///
/// Observation `i` is dated June 1st of `start_year + i`, has id
/// `"SYN{i:04}"`, and sits on a lattice inside the mainland.
///
/// # Example
///
/// ```
/// use test_utils::sequential_observations;
///
/// let obs = sequential_observations(12, 1950);
/// assert_eq!(obs.len(), 12);
/// assert_eq!(obs[0].date, 19500601);
/// assert_eq!(obs[11].year(), 1961);
/// ```
pub fn sequential_observations(count: usize, start_year: i32) -> Vec<Observation> {
    (0..count)
        .map(|i| {
            let year = start_year + i as i32;
            synthetic(i, format!("SYN{:04}", i), (year as u32) * 10000 + 601)
        })
        .collect()
}

/// Creates `per_year` observations for every year in `start..=end`.
///
/// Each year's observations belong to one storm (id `"Y{year}"`, name
/// `"STORM{year}"`) and are dated on consecutive days of August.
pub fn yearly_observations(start: i32, end: i32, per_year: usize) -> Vec<Observation> {
    let mut out = Vec::new();
    let mut i = 0;
    for year in start..=end {
        for day in 0..per_year {
            let date = (year as u32) * 10000 + 801 + (day as u32 % 28);
            let mut obs = synthetic(i, format!("Y{}", year), date);
            obs.name = format!("STORM{}", year);
            out.push(obs);
            i += 1;
        }
    }
    out
}

fn synthetic(i: usize, id: String, date: u32) -> Observation {
    Observation {
        id,
        name: "SYNTHETIC".to_string(),
        date,
        latitude: 26.0 + (i % 8) as f64,
        longitude: -98.0 + (i % 17) as f64,
        max_wind_knots: WIND_CYCLE[i % WIND_CYCLE.len()],
        status: "HU".to_string(),
    }
}
