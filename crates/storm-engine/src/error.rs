//! Error types for the storm explorer.

use projection::ProjectionError;
use storm_common::{RangeError, StormError};
use thiserror::Error;

/// Errors returned by explorer commands.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The requested time window was rejected; the explorer state is unchanged.
    #[error("invalid time range: {0}")]
    InvalidRange(#[from] RangeError),

    /// No named storm matches the query.
    #[error("storm not found: {name} ({year})")]
    StormNotFound { name: String, year: i32 },

    /// A storm search string could not be parsed.
    #[error("invalid storm query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    /// Group index outside `[0, group_count)`.
    #[error("group index {index} out of range (0..{count})")]
    GroupOutOfRange { index: usize, count: usize },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Projection could not be fitted to the boundary.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Boundary or observation data error.
    #[error(transparent)]
    Data(#[from] StormError),
}

impl EngineError {
    /// Create an InvalidQuery error.
    pub fn invalid_query(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for explorer operations.
pub type Result<T> = std::result::Result<T, EngineError>;
