//! Application error handling
//!
//! Hard failures are [`AppError`]s. Persistence and health-platform failures
//! after a successful in-memory mutation are not errors: they come back as
//! [`SyncWarning`]s alongside the result.

use companionfit_core::EngineError;
use serde::Serialize;
use thiserror::Error;

use crate::health::HealthError;
use crate::repositories::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("No trainer profile exists yet; run `init` first")]
    NoUser,

    #[error("A trainer profile already exists")]
    UserExists,

    #[error("Unknown starter companion: {0}")]
    UnknownStarter(String),

    #[error("No workout is in progress")]
    NoActiveSession,

    #[error("A workout is already in progress")]
    SessionInProgress,

    #[error("Failed to load saved data: {0}")]
    Store(StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// A side effect that failed after the in-memory state changed
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SyncWarning {
    #[error("Changes were not saved: {0}")]
    Persistence(String),

    #[error("Workout was not synced to health data: {0}")]
    Health(String),
}

impl From<StoreError> for SyncWarning {
    fn from(err: StoreError) -> Self {
        SyncWarning::Persistence(err.to_string())
    }
}

impl From<HealthError> for SyncWarning {
    fn from(err: HealthError) -> Self {
        SyncWarning::Health(err.to_string())
    }
}

/// Operation result plus any non-fatal side-effect failures
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    pub value: T,
    pub warnings: Vec<SyncWarning>,
}

impl<T> Synced<T> {
    pub fn new(value: T, warnings: Vec<SyncWarning>) -> Self {
        Self { value, warnings }
    }

    pub fn clean(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Synced<U> {
        Synced {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
