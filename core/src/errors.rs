//! Error types for the progression engine

use thiserror::Error;

use crate::session::SessionState;

/// Engine-wide error types
///
/// A dangling companion reference is deliberately absent: lookups return
/// `Option` and a miss is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Cannot {operation} a workout session that is {state}")]
    InvalidSessionState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("Experience grants cannot be negative (got {0})")]
    NegativeExperience(i64),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
