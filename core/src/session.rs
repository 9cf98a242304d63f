//! In-progress workout session
//!
//! A session moves `NotStarted -> Active <-> Paused -> Finished`. Elapsed
//! time is always recomputed from timestamps against a caller-supplied
//! `now`, so the session owns no timer and a late or missed tick never
//! drifts. Paused wall-clock time is never counted.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{EngineError, EngineResult};
use crate::models::{Exercise, Workout};
use crate::validation::validate_exercise;

/// Lifecycle state of a workout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    Active,
    Paused,
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::NotStarted => "not started",
            SessionState::Active => "active",
            SessionState::Paused => "paused",
            SessionState::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// One pausable workout, from start to a finalized [`Workout`]
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    draft: Option<Workout>,
    pause_started_at: Option<DateTime<Utc>>,
    paused_total: TimeDelta,
}

impl Default for WorkoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::NotStarted,
            started_at: None,
            draft: None,
            pause_started_at: None,
            paused_total: TimeDelta::zero(),
        }
    }

    /// Construct and start a session in one step
    pub fn begin(now: DateTime<Utc>) -> Self {
        let mut session = Self::new();
        session.state = SessionState::Active;
        session.started_at = Some(now);
        session.draft = Some(Workout::new(now));
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Exercises logged so far
    pub fn exercises(&self) -> &[Exercise] {
        self.draft
            .as_ref()
            .map(|draft| draft.exercises.as_slice())
            .unwrap_or(&[])
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> EngineResult<()> {
        self.require("start", &[SessionState::NotStarted])?;
        *self = Self::begin(now);
        debug!(started_at = %now, "Workout session started");
        Ok(())
    }

    /// Log an exercise; allowed while active or paused
    pub fn add_exercise(&mut self, exercise: Exercise) -> EngineResult<()> {
        self.require("add an exercise to", &[SessionState::Active, SessionState::Paused])?;
        validate_exercise(&exercise).map_err(|e| EngineError::Validation(e.user_message()))?;
        if let Some(draft) = self.draft.as_mut() {
            draft.exercises.push(exercise);
        }
        Ok(())
    }

    /// Pausing an already paused session is a no-op
    pub fn pause(&mut self, now: DateTime<Utc>) -> EngineResult<()> {
        self.require("pause", &[SessionState::Active, SessionState::Paused])?;
        if self.state == SessionState::Active {
            self.pause_started_at = Some(now);
            self.state = SessionState::Paused;
        }
        Ok(())
    }

    /// Resuming an active session is a no-op
    pub fn resume(&mut self, now: DateTime<Utc>) -> EngineResult<()> {
        self.require("resume", &[SessionState::Active, SessionState::Paused])?;
        if let Some(pause_started_at) = self.pause_started_at.take() {
            self.paused_total = self.paused_total + non_negative(now - pause_started_at);
        }
        self.state = SessionState::Active;
        Ok(())
    }

    /// Active seconds since start, excluding every paused interval
    ///
    /// Zero before the session starts; fixed at the final value once finished.
    pub fn elapsed_active_seconds(&self, now: DateTime<Utc>) -> f64 {
        match self.state {
            SessionState::NotStarted => 0.0,
            SessionState::Finished => self
                .draft
                .as_ref()
                .map(|draft| draft.total_duration)
                .unwrap_or(0.0),
            SessionState::Active | SessionState::Paused => to_seconds(self.active_time(now)),
        }
    }

    fn active_time(&self, now: DateTime<Utc>) -> TimeDelta {
        let Some(started_at) = self.started_at else {
            return TimeDelta::zero();
        };
        let current_pause = self
            .pause_started_at
            .map(|paused_at| non_negative(now - paused_at))
            .unwrap_or_else(TimeDelta::zero);
        non_negative(now - started_at - self.paused_total - current_pause)
    }

    /// Finalize the session and hand back the immutable workout
    pub fn finish(&mut self, now: DateTime<Utc>) -> EngineResult<Workout> {
        self.require("finish", &[SessionState::Active, SessionState::Paused])?;
        let total_duration = to_seconds(self.active_time(now));
        let draft = self
            .draft
            .as_mut()
            .ok_or(EngineError::InvalidSessionState {
                operation: "finish",
                state: self.state,
            })?;
        draft.total_duration = total_duration;
        let workout = draft.clone();

        self.state = SessionState::Finished;
        self.pause_started_at = None;
        debug!(
            workout_id = %workout.id,
            exercises = workout.exercises.len(),
            duration_secs = total_duration,
            "Workout session finished"
        );
        Ok(workout)
    }

    /// Abandon the session without producing a workout
    pub fn discard(self) {
        debug!(
            state = %self.state,
            exercises = self.exercises().len(),
            "Workout session discarded"
        );
    }

    fn require(&self, operation: &'static str, allowed: &[SessionState]) -> EngineResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(EngineError::InvalidSessionState {
                operation,
                state: self.state,
            })
        }
    }
}

/// Clock skew can make intervals negative; treat those as empty
fn non_negative(delta: TimeDelta) -> TimeDelta {
    delta.max(TimeDelta::zero())
}

fn to_seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

/// Render elapsed seconds as `MM:SS`; hours roll into the minutes
pub fn format_elapsed(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseCategory;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 27, 7, 0, 0).unwrap()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        t0() + TimeDelta::seconds(seconds)
    }

    fn pushups() -> Exercise {
        Exercise::new("Push-ups", ExerciseCategory::Strength).with_sets_reps(3, 15)
    }

    #[test]
    fn test_new_session_is_not_started() {
        let session = WorkoutSession::new();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.elapsed_active_seconds(at(100)), 0.0);
        assert!(session.exercises().is_empty());
    }

    #[test]
    fn test_start_then_elapsed() {
        let mut session = WorkoutSession::new();
        session.start(t0()).unwrap();

        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.started_at(), Some(t0()));
        assert_eq!(session.elapsed_active_seconds(at(90)), 90.0);
    }

    #[test]
    fn test_start_twice_fails() {
        let mut session = WorkoutSession::begin(t0());
        assert_eq!(
            session.start(at(5)),
            Err(EngineError::InvalidSessionState {
                operation: "start",
                state: SessionState::Active,
            })
        );
    }

    #[test]
    fn test_operations_before_start_fail() {
        let mut session = WorkoutSession::new();
        assert!(matches!(
            session.pause(t0()),
            Err(EngineError::InvalidSessionState { state: SessionState::NotStarted, .. })
        ));
        assert!(session.resume(t0()).is_err());
        assert!(session.add_exercise(pushups()).is_err());
        assert!(session.finish(t0()).is_err());
    }

    #[test]
    fn test_paused_time_is_excluded() {
        let mut session = WorkoutSession::begin(t0());
        session.pause(at(60)).unwrap();

        // Frozen while paused
        assert_eq!(session.elapsed_active_seconds(at(60)), 60.0);
        assert_eq!(session.elapsed_active_seconds(at(200)), 60.0);

        session.resume(at(300)).unwrap();
        assert_eq!(session.elapsed_active_seconds(at(330)), 90.0);
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let mut session = WorkoutSession::begin(t0());
        session.resume(at(10)).unwrap();
        assert_eq!(session.state(), SessionState::Active);

        session.pause(at(20)).unwrap();
        // Second pause must not move the pause start
        session.pause(at(50)).unwrap();
        assert!(session.is_paused());

        session.resume(at(80)).unwrap();
        assert_eq!(session.elapsed_active_seconds(at(100)), 40.0);
    }

    #[test]
    fn test_multiple_pauses_accumulate() {
        let mut session = WorkoutSession::begin(t0());
        session.pause(at(10)).unwrap();
        session.resume(at(20)).unwrap();
        session.pause(at(30)).unwrap();
        session.resume(at(60)).unwrap();

        assert_eq!(session.elapsed_active_seconds(at(100)), 60.0);
    }

    #[test]
    fn test_add_exercise_while_paused() {
        let mut session = WorkoutSession::begin(t0());
        session.add_exercise(pushups()).unwrap();
        session.pause(at(30)).unwrap();
        session.add_exercise(Exercise::new("Stretching", ExerciseCategory::Flexibility)).unwrap();

        assert_eq!(session.exercises().len(), 2);
        assert!(session.is_paused());
        assert_eq!(session.exercises()[1].name, "Stretching");
    }

    #[test]
    fn test_invalid_exercise_is_rejected() {
        let mut session = WorkoutSession::begin(t0());
        let bad = Exercise::new("Deadlift", ExerciseCategory::Strength).with_weight(-20.0);

        assert!(matches!(session.add_exercise(bad), Err(EngineError::Validation(_))));
        assert!(session.exercises().is_empty());
    }

    #[test]
    fn test_finish_produces_workout() {
        let mut session = WorkoutSession::begin(t0());
        session.add_exercise(pushups()).unwrap();
        session.pause(at(600)).unwrap();
        session.resume(at(720)).unwrap();

        let workout = session.finish(at(1_800)).unwrap();

        assert_eq!(workout.date, t0());
        assert_eq!(workout.total_duration, 1_680.0);
        assert_eq!(workout.exercises.len(), 1);
        assert_eq!(workout.companion_used, None);
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.elapsed_active_seconds(at(99_999)), 1_680.0);
    }

    #[test]
    fn test_finish_while_paused_excludes_open_pause() {
        let mut session = WorkoutSession::begin(t0());
        session.pause(at(100)).unwrap();

        let workout = session.finish(at(500)).unwrap();
        assert_eq!(workout.total_duration, 100.0);
    }

    #[test]
    fn test_finish_with_no_exercises_is_allowed() {
        let mut session = WorkoutSession::begin(t0());
        let workout = session.finish(at(30)).unwrap();
        assert!(workout.exercises.is_empty());
    }

    #[test]
    fn test_finished_session_is_terminal() {
        let mut session = WorkoutSession::begin(t0());
        session.finish(at(30)).unwrap();

        assert!(session.finish(at(40)).is_err());
        assert!(session.pause(at(40)).is_err());
        assert!(session.resume(at(40)).is_err());
        assert!(session.add_exercise(pushups()).is_err());
        assert!(session.start(at(40)).is_err());
    }

    #[test]
    fn test_clock_going_backwards_clamps_to_zero() {
        let session = WorkoutSession::begin(at(100));
        assert_eq!(session.elapsed_active_seconds(at(50)), 0.0);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0.0), "00:00");
        assert_eq!(format_elapsed(59.9), "00:59");
        assert_eq!(format_elapsed(61.0), "01:01");
        assert_eq!(format_elapsed(3_725.0), "62:05");
        assert_eq!(format_elapsed(-4.0), "00:00");
    }

    #[test]
    fn test_error_message_names_operation_and_state() {
        let mut session = WorkoutSession::new();
        let err = session.pause(t0()).unwrap_err();
        assert_eq!(err.to_string(), "Cannot pause a workout session that is not started");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_pause_reduces_elapsed_by_exactly_its_length(
            before in 0i64..10_000,
            paused_for in 0i64..10_000,
            after in 0i64..10_000,
        ) {
            let mut session = WorkoutSession::begin(t0());
            session.pause(at(before)).unwrap();
            session.resume(at(before + paused_for)).unwrap();

            let now = at(before + paused_for + after);
            let wall_clock = (before + paused_for + after) as f64;
            prop_assert_eq!(session.elapsed_active_seconds(now), wall_clock - paused_for as f64);
        }

        #[test]
        fn prop_elapsed_never_decreases_while_active(a in 0i64..100_000, b in 0i64..100_000) {
            let session = WorkoutSession::begin(t0());
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            let earlier = session.elapsed_active_seconds(at(early));
            prop_assert!(earlier <= session.elapsed_active_seconds(at(late)));
        }
    }
}
