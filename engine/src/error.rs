use thiserror::Error;

/// Caller contract violations. Rejected placements are not errors; see
/// [`crate::placement::PlacementResult`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid piece shape: {reason}")]
    InvalidShape { reason: String },

    #[error("invalid engine configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

impl EngineError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        EngineError::InvalidShape {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
