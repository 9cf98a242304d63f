//! Common test utilities for integration tests
//!
//! Provides a recording health adapter and helpers for building the
//! application service with deterministic stat rolls.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use companionfit_app::{
    health::{HealthError, HealthSink, HealthSource, HealthWorkoutSummary},
    repositories::{MemoryStore, UserStore},
    services::CompanionFitApp,
};
use companionfit_core::{Exercise, ExerciseCategory, Workout};
use std::sync::Mutex;

pub const SEED: u64 = 42;

/// Health adapter that records every committed workout
#[derive(Debug, Default)]
pub struct RecordingHealth {
    pub committed: Mutex<Vec<HealthWorkoutSummary>>,
    pub failure: Option<HealthError>,
    pub steps: f64,
}

impl RecordingHealth {
    pub fn failing(error: HealthError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn committed(&self) -> Vec<HealthWorkoutSummary> {
        self.committed.lock().unwrap().clone()
    }
}

#[async_trait]
impl HealthSink for RecordingHealth {
    async fn commit_workout(&self, workout: &Workout) -> Result<(), HealthError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.committed
            .lock()
            .unwrap()
            .push(HealthWorkoutSummary::from_workout(workout));
        Ok(())
    }
}

#[async_trait]
impl HealthSource for RecordingHealth {
    async fn todays_steps(&self) -> Result<f64, HealthError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.steps),
        }
    }

    async fn latest_heart_rate(&self) -> Result<f64, HealthError> {
        Err(HealthError::NoData)
    }
}

pub type TestApp<S = MemoryStore> = CompanionFitApp<S, RecordingHealth>;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap()
}

pub fn test_app() -> TestApp {
    CompanionFitApp::new(MemoryStore::new(), RecordingHealth::default(), Some(SEED))
}

/// User "ash" with Embercub as the active companion
pub async fn onboarded<S: UserStore>(store: S, health: RecordingHealth) -> TestApp<S> {
    let mut app = CompanionFitApp::new(store, health, Some(SEED));
    app.create_user("ash", "Ash", t0()).await.unwrap();
    app.select_starter("Embercub").await.unwrap();
    app
}

pub fn bench_press() -> Exercise {
    Exercise::new("Bench Press", ExerciseCategory::Strength)
        .with_sets_reps(3, 10)
        .with_weight(80.0)
}

pub fn workout_of(exercises: Vec<Exercise>) -> Workout {
    let mut workout = Workout::new(t0());
    workout.exercises = exercises;
    workout
}
