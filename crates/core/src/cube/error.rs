//! Cube error types.

use thiserror::Error;
use timebill_shared::AppError;

/// Errors that can occur during cube calculation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CubeError {
    /// A filter or breakdown rule names a dimension the cube does not define.
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// A selected measure is not defined.
    #[error("Unknown measure: {0}")]
    UnknownMeasure(String),

    /// Max depth must allow at least one group level.
    #[error("Invalid max depth {0}: must be at least 1")]
    InvalidMaxDepth(usize),
}

impl From<CubeError> for AppError {
    fn from(error: CubeError) -> Self {
        Self::Validation(error.to_string())
    }
}
