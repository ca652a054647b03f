//! Error types shared by the storm density crates.

use thiserror::Error;

/// Result type alias using StormError.
pub type StormResult<T> = Result<T, StormError>;

/// Primary error type for dataset and geometry handling.
#[derive(Debug, Error)]
pub enum StormError {
    // === Observation Errors ===
    #[error("Missing required field '{field}' in record {record}")]
    MissingField { record: usize, field: &'static str },

    #[error("Invalid record {record}: {message}")]
    InvalidRecord { record: usize, message: String },

    #[error("Invalid observation date: {0}")]
    InvalidDate(i64),

    // === Geometry Errors ===
    #[error("Invalid geometry in region '{region}': {message}")]
    InvalidGeometry { region: String, message: String },

    #[error("Boundary dataset contains no polygons")]
    EmptyBoundary,

    // === Infrastructure Errors ===
    #[error("Failed to read data: {0}")]
    DataReadError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl StormError {
    /// True for errors caused by a single bad input record.
    ///
    /// These are the errors a lenient loader may skip instead of aborting.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            StormError::MissingField { .. }
                | StormError::InvalidRecord { .. }
                | StormError::InvalidDate(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for StormError {
    fn from(err: std::io::Error) -> Self {
        StormError::DataReadError(err.to_string())
    }
}

impl From<serde_json::Error> for StormError {
    fn from(err: serde_json::Error) -> Self {
        StormError::DataReadError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_errors_are_skippable() {
        let missing = StormError::MissingField {
            record: 3,
            field: "MaximumSustainedWind",
        };
        assert!(missing.is_record_error());
        assert!(StormError::InvalidDate(20051399).is_record_error());
        assert!(!StormError::EmptyBoundary.is_record_error());
    }

    #[test]
    fn test_error_messages() {
        let err = StormError::MissingField {
            record: 7,
            field: "StatusOfSystem",
        };
        assert_eq!(
            err.to_string(),
            "Missing required field 'StatusOfSystem' in record 7"
        );
    }
}
