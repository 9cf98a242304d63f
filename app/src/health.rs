//! Platform health-data integration
//!
//! [`HealthSink`] receives finished workouts and [`HealthSource`] answers
//! daily activity queries. Both are optional collaborators: the application
//! treats every failure as a warning and never rolls back its own state.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use companionfit_core::{workout_xp, ExerciseCategory, Workout};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Energy estimate per experience point, in kilocalories
pub const KCAL_PER_XP: f64 = 0.1;

/// Brand recorded in workout metadata
pub const WORKOUT_BRAND: &str = "CompanionFit";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HealthError {
    #[error("Health data is not available on this device")]
    NotAvailable,

    #[error("Health data access not authorized")]
    NotAuthorized,

    #[error("No health data available")]
    NoData,

    #[error("Health platform error: {0}")]
    Platform(String),
}

/// Activity classification understood by health platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    TraditionalStrengthTraining,
    Yoga,
    Other,
}

impl ActivityType {
    /// Pick the activity for a workout by the categories it contains
    ///
    /// Cardio wins over strength, strength over flexibility. Cardio and
    /// sports have no dedicated platform type and map to `Other`.
    pub fn for_workout(workout: &Workout) -> Self {
        let has = |category: ExerciseCategory| {
            workout.exercises.iter().any(|e| e.category == category)
        };

        if has(ExerciseCategory::Cardio) {
            ActivityType::Other
        } else if has(ExerciseCategory::Strength) {
            ActivityType::TraditionalStrengthTraining
        } else if has(ExerciseCategory::Flexibility) {
            ActivityType::Yoga
        } else {
            ActivityType::Other
        }
    }
}

/// Platform-neutral description of a finished workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthWorkoutSummary {
    pub workout_id: Uuid,
    pub activity_type: ActivityType,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: f64,
    pub energy_kcal: f64,
    pub distance_meters: Option<f64>,
    pub experience: u64,
    pub companion_used: Option<Uuid>,
    pub brand: String,
}

impl HealthWorkoutSummary {
    pub fn from_workout(workout: &Workout) -> Self {
        let experience = workout_xp(workout);
        let duration_seconds = workout.total_duration.max(0.0);
        let millis = (duration_seconds * 1_000.0) as i64;
        let end = workout
            .date
            .checked_add_signed(TimeDelta::milliseconds(millis))
            .unwrap_or(workout.date);
        let distance_km = workout.total_distance();

        Self {
            workout_id: workout.id,
            activity_type: ActivityType::for_workout(workout),
            start: workout.date,
            end,
            duration_seconds,
            energy_kcal: experience as f64 * KCAL_PER_XP,
            distance_meters: (distance_km > 0.0).then(|| distance_km * 1_000.0),
            experience,
            companion_used: workout.companion_used,
            brand: WORKOUT_BRAND.to_string(),
        }
    }
}

/// Receives finished workouts
#[async_trait]
pub trait HealthSink: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    async fn commit_workout(&self, workout: &Workout) -> Result<(), HealthError>;
}

/// Answers activity queries for the current day
#[async_trait]
pub trait HealthSource: Send + Sync {
    async fn todays_steps(&self) -> Result<f64, HealthError>;

    async fn latest_heart_rate(&self) -> Result<f64, HealthError>;
}

/// Adapter used when no health platform is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledHealth;

#[async_trait]
impl HealthSink for DisabledHealth {
    fn is_available(&self) -> bool {
        false
    }

    async fn commit_workout(&self, _workout: &Workout) -> Result<(), HealthError> {
        Err(HealthError::NotAvailable)
    }
}

#[async_trait]
impl HealthSource for DisabledHealth {
    async fn todays_steps(&self) -> Result<f64, HealthError> {
        Err(HealthError::NotAvailable)
    }

    async fn latest_heart_rate(&self) -> Result<f64, HealthError> {
        Err(HealthError::NotAvailable)
    }
}
