//! Storm lookup by name and year, and per-step storm frames.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use projection::Projection;
use storm_common::{time::format_display_date, Observation, YearRange};

use crate::classify::{classify, StormCategory};
use crate::error::{EngineError, Result};

/// Feet per nautical mile over feet per statute mile.
const MPH_PER_KNOT: f64 = 6076.0 / 5280.0;

/// A `"NAME - YEAR"` storm search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StormQuery {
    pub name: String,
    pub year: i32,
}

impl StormQuery {
    pub fn new(name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into().trim().to_string(),
            year,
        }
    }

    /// Parse `"NAME - YEAR"`. Whitespace around both parts is ignored.
    pub fn parse(query: &str) -> Result<Self> {
        let (name, year) = query
            .split_once('-')
            .ok_or_else(|| EngineError::invalid_query(query, "expected 'NAME - YEAR'"))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::invalid_query(query, "storm name is empty"));
        }

        let year = year
            .trim()
            .parse::<i32>()
            .map_err(|e| EngineError::invalid_query(query, format!("bad year: {}", e)))?;

        Ok(Self::new(name, year))
    }

    /// Whether `obs` belongs to the storm this query names.
    ///
    /// Names must be equal once trimmed; unnamed observations never match.
    pub fn matches(&self, obs: &Observation) -> bool {
        obs.year() == self.year && !obs.is_unnamed() && obs.trimmed_name() == self.name
    }
}

impl FromStr for StormQuery {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for StormQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.year)
    }
}

/// All observations of the named storm, in dataset order.
pub fn find_storm(observations: &[Observation], query: &StormQuery) -> Vec<Observation> {
    observations
        .iter()
        .filter(|obs| query.matches(obs))
        .cloned()
        .collect()
}

/// Distinct `"NAME - YEAR"` keys of named storms, in first-appearance order.
pub fn storm_names(observations: &[Observation]) -> Vec<String> {
    let mut seen = HashSet::new();
    observations
        .iter()
        .filter(|obs| !obs.is_unnamed() && !obs.trimmed_name().is_empty())
        .map(Observation::search_key)
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Number of distinct storm ids with at least one observation in `range`.
pub fn count_unique_storms(observations: &[Observation], range: YearRange) -> usize {
    observations
        .iter()
        .filter(|obs| range.contains_date(obs.date))
        .map(|obs| obs.id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Knots to miles per hour, rounded to two decimals.
pub fn knots_to_mph(knots: u32) -> f64 {
    (knots as f64 * MPH_PER_KNOT * 100.0).round() / 100.0
}

/// Everything shown for one step of a storm path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StormFrame {
    pub step: usize,
    pub total_steps: usize,
    pub name: String,
    /// `MM/DD/YYYY`
    pub date: String,
    pub wind_mph: f64,
    pub category: StormCategory,
    pub classification: String,
    /// Projected pixel position of this step
    pub position: (f64, f64),
    /// Projected positions of steps `0..=step`
    pub trail: Vec<(f64, f64)>,
}

impl StormFrame {
    /// Build the frame for `step` of `path`, or `None` when out of range.
    pub fn build<P: Projection + ?Sized>(
        path: &[Observation],
        step: usize,
        projection: &P,
    ) -> Option<Self> {
        let obs = path.get(step)?;
        let trail: Vec<(f64, f64)> = path[..=step]
            .iter()
            .map(|o| projection.forward(o.longitude, o.latitude))
            .collect();
        let position = projection.forward(obs.longitude, obs.latitude);
        let category = classify(&obs.status, obs.max_wind_knots);

        Some(Self {
            step,
            total_steps: path.len(),
            name: obs.trimmed_name().to_string(),
            date: format_display_date(obs.date),
            wind_mph: knots_to_mph(obs.max_wind_knots),
            category,
            classification: category.to_string(),
            position,
            trail,
        })
    }
}
