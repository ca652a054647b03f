//! Storm-track observation records.
//!
//! Raw records arrive loosely typed (fields may be missing, numbers may be
//! strings, coordinates may carry compass suffixes). They are converted once
//! into [`Observation`], which is immutable and fully typed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StormError, StormResult};
use crate::time::{to_naive_date, year_of};

/// Storm name used by the dataset for systems that were never named.
pub const UNNAMED: &str = "UNNAMED";

/// HURDAT marker for a missing wind value.
pub const MISSING_WIND: i64 = -99;

/// One fix of one storm at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Storm identifier (shared by every fix of the same storm)
    pub id: String,
    /// Storm name as stored in the dataset (may carry padding)
    pub name: String,
    /// Date as `YYYYMMDD`
    pub date: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Maximum sustained wind in knots
    pub max_wind_knots: u32,
    /// Status-of-system code (e.g. "HU", "TS")
    pub status: String,
}

impl Observation {
    /// Year derived from the date by integer division.
    pub fn year(&self) -> i32 {
        year_of(self.date)
    }

    /// Name with surrounding whitespace removed.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    /// True for the dataset's "unnamed" sentinel.
    pub fn is_unnamed(&self) -> bool {
        self.trimmed_name() == UNNAMED
    }

    /// Search key in `"NAME - YEAR"` form.
    pub fn search_key(&self) -> String {
        format!("{} - {}", self.trimmed_name(), self.year())
    }

    /// Validate and convert a raw record. `index` is used in error messages.
    pub fn from_record(index: usize, record: ObservationRecord) -> StormResult<Self> {
        let missing = |field: &'static str| StormError::MissingField {
            record: index,
            field,
        };

        let id = record.id.map(IdValue::into_string).ok_or_else(|| missing("ID"))?;

        let name = record
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| missing("NAME"))?;

        let raw_date = record.date.ok_or_else(|| missing("Date"))?;
        let date = u32::try_from(raw_date)
            .ok()
            .filter(|d| to_naive_date(*d).is_some())
            .ok_or(StormError::InvalidDate(raw_date))?;

        let latitude = record
            .latitude
            .ok_or_else(|| missing("Latitude"))?
            .to_degrees()
            .ok_or_else(|| StormError::InvalidRecord {
                record: index,
                message: "unparseable latitude".to_string(),
            })?;
        let longitude = record
            .longitude
            .ok_or_else(|| missing("Longitude"))?
            .to_degrees()
            .ok_or_else(|| StormError::InvalidRecord {
                record: index,
                message: "unparseable longitude".to_string(),
            })?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(StormError::InvalidRecord {
                record: index,
                message: format!("coordinate out of range ({}, {})", latitude, longitude),
            });
        }

        let max_wind_knots = record
            .max_wind
            .filter(|w| *w != MISSING_WIND && *w >= 0)
            .and_then(|w| u32::try_from(w).ok())
            .ok_or_else(|| missing("MaximumSustainedWind"))?;

        let status = record
            .status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing("StatusOfSystem"))?;

        Ok(Self {
            id,
            name,
            date,
            latitude,
            longitude,
            max_wind_knots,
            status,
        })
    }
}

/// An observation record as it appears in the source JSON.
///
/// Field names follow the dataset export; the aliases cover the spellings
/// produced by the spreadsheet cleaning step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservationRecord {
    #[serde(rename = "ID", default)]
    pub id: Option<IdValue>,

    #[serde(rename = "NAME", default)]
    pub name: Option<String>,

    #[serde(rename = "Date", default)]
    pub date: Option<i64>,

    #[serde(rename = "Latitude", default)]
    pub latitude: Option<Coordinate>,

    #[serde(rename = "Longitude", default)]
    pub longitude: Option<Coordinate>,

    #[serde(
        rename = "MaximumSustainedWind",
        alias = "Maximum Sustained Wind",
        alias = "Maximum_Sustained_Wind",
        default
    )]
    pub max_wind: Option<i64>,

    #[serde(
        rename = "StatusOfSystem",
        alias = "Status of System",
        alias = "Status_of_System",
        default
    )]
    pub status: Option<String>,
}

/// Storm identifiers are exported either as strings or as bare numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Text(String),
    Number(serde_json::Number),
}

impl IdValue {
    pub fn into_string(self) -> String {
        match self {
            IdValue::Text(s) => s.trim().to_string(),
            IdValue::Number(n) => n.to_string(),
        }
    }
}

/// A coordinate in decimal degrees, or text such as `"28.0N"` / `"89.6W"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Degrees(f64),
    Text(String),
}

impl Coordinate {
    /// Signed decimal degrees; south and west suffixes negate the value.
    pub fn to_degrees(&self) -> Option<f64> {
        match self {
            Coordinate::Degrees(v) => v.is_finite().then_some(*v),
            Coordinate::Text(s) => {
                let s = s.trim();
                let (value, sign) = match s.chars().last()? {
                    'N' | 'n' | 'E' | 'e' => (&s[..s.len() - 1], 1.0),
                    'S' | 's' | 'W' | 'w' => (&s[..s.len() - 1], -1.0),
                    _ => (s, 1.0),
                };
                let v: f64 = value.trim().parse().ok()?;
                v.is_finite().then_some(v * sign)
            }
        }
    }
}

/// What to do with a record that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Drop the record, count it and log a warning
    #[default]
    Skip,
    /// Fail the whole load on the first bad record
    Reject,
}

impl MalformedPolicy {
    /// Parse from string (case-insensitive). Unknown values fall back to `Skip`.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "reject" | "strict" => Self::Reject,
            _ => Self::Skip,
        }
    }
}

/// Result of converting a batch of raw records.
#[derive(Debug, Clone, Default)]
pub struct ObservationSet {
    /// Valid observations, in source order
    pub observations: Vec<Observation>,
    /// Number of records dropped under [`MalformedPolicy::Skip`]
    pub skipped: usize,
}

impl ObservationSet {
    /// Convert raw records, keeping source order.
    pub fn from_records(
        records: Vec<ObservationRecord>,
        policy: MalformedPolicy,
    ) -> StormResult<Self> {
        let mut set = ObservationSet {
            observations: Vec::with_capacity(records.len()),
            skipped: 0,
        };

        for (index, record) in records.into_iter().enumerate() {
            match Observation::from_record(index, record) {
                Ok(obs) => set.observations.push(obs),
                Err(e) if policy == MalformedPolicy::Skip && e.is_record_error() => {
                    debug!(record = index, error = %e, "Skipping malformed observation");
                    set.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if set.skipped > 0 {
            warn!(
                skipped = set.skipped,
                kept = set.observations.len(),
                "Dropped malformed observation records"
            );
        }

        Ok(set)
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str, policy: MalformedPolicy) -> StormResult<Self> {
        let records: Vec<ObservationRecord> = serde_json::from_str(json)?;
        Self::from_records(records, policy)
    }
}
