//! CompanionFit application service
//!
//! Owns the in-memory [`User`] (the source of truth), the optional
//! in-progress [`WorkoutSession`] and the stat RNG. Every mutation is applied
//! in memory first and then persisted; a failed save or health commit is
//! reported as a [`SyncWarning`] and never undoes the mutation.

use chrono::{DateTime, Utc};
use companionfit_core::validation::{validate_nickname, validate_profile_name, ValidationError};
use companionfit_core::{
    find_starter, Companion, CompletionSummary, EngineError, Exercise, SessionState, User,
    Workout, WorkoutSession,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult, SyncWarning, Synced};
use crate::health::{HealthError, HealthSink, HealthSource};
use crate::repositories::{StoreError, UserStore};

pub struct CompanionFitApp<S, H> {
    store: S,
    health: H,
    rng: ChaCha8Rng,
    user: Option<User>,
    session: Option<WorkoutSession>,
}

impl<S, H> CompanionFitApp<S, H>
where
    S: UserStore,
    H: HealthSink + HealthSource,
{
    /// Create a service with no user loaded
    ///
    /// A fixed `seed` makes stat rolls reproducible.
    pub fn new(store: S, health: H, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            store,
            health,
            rng,
            user: None,
            session: None,
        }
    }

    /// Create a service and load any persisted user
    ///
    /// Corrupt saved data is discarded with a warning; an unreadable store
    /// is a hard error.
    pub async fn open(store: S, health: H, seed: Option<u64>) -> AppResult<Synced<Self>> {
        let mut app = Self::new(store, health, seed);
        let mut warnings = Vec::new();

        match app.store.load().await {
            Ok(user) => {
                if let Some(user) = &user {
                    info!(user_id = %user.id, level = user.level(), "Loaded user");
                }
                app.user = user;
            }
            Err(StoreError::Corrupt(reason)) => {
                warn!(%reason, "Saved user data is corrupt, discarding");
                warnings.push(SyncWarning::Persistence(format!(
                    "discarded corrupt saved data: {}",
                    reason
                )));
                if let Err(e) = app.store.clear().await {
                    warn!(error = %e, "Failed to clear corrupt user data");
                    warnings.push(e.into());
                }
            }
            Err(e) => return Err(AppError::Store(e)),
        }

        Ok(Synced::new(app, warnings))
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn session(&self) -> Option<&WorkoutSession> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn health(&self) -> &H {
        &self.health
    }

    // ========================================================================
    // Profile
    // ========================================================================

    pub async fn create_user(
        &mut self,
        username: &str,
        trainer_name: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Synced<Uuid>> {
        if self.user.is_some() {
            return Err(AppError::UserExists);
        }
        check_field("username", validate_profile_name(username))?;
        check_field("trainer_name", validate_profile_name(trainer_name))?;

        let user = User::new(username.trim(), trainer_name.trim(), now);
        let user_id = user.id;
        info!(%user_id, username = %user.username, "Created user");
        self.user = Some(user);

        Ok(Synced::new(user_id, self.persist().await))
    }

    /// Add a starter from the roster; the first companion becomes active
    pub async fn select_starter(&mut self, name: &str) -> AppResult<Synced<Companion>> {
        if self.user.is_none() {
            return Err(AppError::NoUser);
        }
        let template =
            find_starter(name).ok_or_else(|| AppError::UnknownStarter(name.trim().to_string()))?;
        let companion = template.instantiate(&mut self.rng);

        let user = self.user.as_mut().ok_or(AppError::NoUser)?;
        user.add_companion(companion.clone());
        info!(
            user_id = %user.id,
            companion_id = %companion.id,
            companion = %companion.name,
            "Starter companion selected"
        );

        Ok(Synced::new(companion, self.persist().await))
    }

    /// Store the id as given; an unknown id simply resolves to no companion
    pub async fn set_active_companion(&mut self, companion_id: Uuid) -> AppResult<Synced<()>> {
        let user = self.user.as_mut().ok_or(AppError::NoUser)?;
        user.set_active_companion(companion_id);
        debug!(user_id = %user.id, %companion_id, "Active companion set");
        Ok(Synced::new((), self.persist().await))
    }

    /// Returns whether a companion with that id existed
    pub async fn update_companion_nickname(
        &mut self,
        companion_id: Uuid,
        nickname: Option<&str>,
    ) -> AppResult<Synced<bool>> {
        if self.user.is_none() {
            return Err(AppError::NoUser);
        }
        let nickname = match nickname.map(str::trim).filter(|n| !n.is_empty()) {
            Some(nickname) => {
                check_field("nickname", validate_nickname(nickname))?;
                Some(nickname.to_string())
            }
            None => None,
        };

        let user = self.user.as_mut().ok_or(AppError::NoUser)?;
        if !user.update_companion_nickname(companion_id, nickname) {
            debug!(%companion_id, "Nickname update for unknown companion ignored");
            return Ok(Synced::clean(false));
        }
        Ok(Synced::new(true, self.persist().await))
    }

    /// Forget the user and any in-progress session
    pub async fn reset_user(&mut self) -> Synced<()> {
        self.user = None;
        if let Some(session) = self.session.take() {
            session.discard();
        }

        let warnings = match self.store.clear().await {
            Ok(()) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to clear saved user");
                vec![e.into()]
            }
        };
        info!("User reset");
        Synced::new((), warnings)
    }

    // ========================================================================
    // Workout session
    // ========================================================================

    pub fn start_workout(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if self.user.is_none() {
            return Err(AppError::NoUser);
        }
        if self.session.is_some() {
            return Err(AppError::SessionInProgress);
        }
        self.session = Some(WorkoutSession::begin(now));
        Ok(())
    }

    pub fn add_exercise(&mut self, exercise: Exercise) -> AppResult<()> {
        Ok(self.active_session()?.add_exercise(exercise)?)
    }

    pub fn pause_workout(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        Ok(self.active_session()?.pause(now)?)
    }

    pub fn resume_workout(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        Ok(self.active_session()?.resume(now)?)
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> AppResult<f64> {
        self.session
            .as_ref()
            .map(|session| session.elapsed_active_seconds(now))
            .ok_or(AppError::NoActiveSession)
    }

    /// Finalize the session and commit the resulting workout
    pub async fn finish_workout(
        &mut self,
        now: DateTime<Utc>,
    ) -> AppResult<Synced<CompletionSummary>> {
        if self.user.is_none() {
            return Err(AppError::NoUser);
        }
        let workout = self.active_session()?.finish(now)?;
        self.session = None;
        self.complete_workout(workout, now).await
    }

    pub fn discard_workout(&mut self) -> AppResult<()> {
        let session = self.session.take().ok_or(AppError::NoActiveSession)?;
        session.discard();
        Ok(())
    }

    fn active_session(&mut self) -> AppResult<&mut WorkoutSession> {
        self.session.as_mut().ok_or(AppError::NoActiveSession)
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Apply a finished workout to the user, then persist and sync it
    pub async fn complete_workout(
        &mut self,
        workout: Workout,
        now: DateTime<Utc>,
    ) -> AppResult<Synced<CompletionSummary>> {
        let user = self.user.as_mut().ok_or(AppError::NoUser)?;
        let summary = user.complete_workout(workout, now, &mut self.rng)?;

        if let Some(outcome) = &summary.companion {
            if let Some(form) = &outcome.evolved_into {
                info!(
                    companion_id = %outcome.companion_id,
                    evolved_into = %form,
                    "Companion evolved"
                );
            }
        }

        let mut warnings = self.persist().await;
        warnings.extend(self.sync_health(summary.workout_id).await);

        Ok(Synced::new(summary, warnings))
    }

    pub async fn todays_steps(&self) -> Result<f64, HealthError> {
        self.health.todays_steps().await
    }

    pub async fn latest_heart_rate(&self) -> Result<f64, HealthError> {
        self.health.latest_heart_rate().await
    }

    async fn sync_health(&self, workout_id: Uuid) -> Vec<SyncWarning> {
        if !HealthSink::is_available(&self.health) {
            return Vec::new();
        }
        let Some(workout) = self
            .user
            .as_ref()
            .and_then(|user| user.workouts().iter().rev().find(|w| w.id == workout_id))
        else {
            return Vec::new();
        };

        match self.health.commit_workout(workout).await {
            Ok(()) => {
                debug!(%workout_id, "Workout sent to health platform");
                Vec::new()
            }
            Err(e) => {
                warn!(%workout_id, error = %e, "Failed to sync workout to health platform");
                vec![e.into()]
            }
        }
    }

    async fn persist(&self) -> Vec<SyncWarning> {
        let Some(user) = &self.user else {
            return Vec::new();
        };
        match self.store.save(user).await {
            Ok(()) => Vec::new(),
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Failed to save user");
                vec![e.into()]
            }
        }
    }
}

impl<S, H> CompanionFitApp<S, H> {
    /// Whether a workout is being recorded right now
    pub fn has_active_session(&self) -> bool {
        matches!(
            self.session.as_ref().map(WorkoutSession::state),
            Some(SessionState::Active | SessionState::Paused)
        )
    }
}

fn check_field(field: &str, result: Result<(), String>) -> AppResult<()> {
    result.map_err(|msg| {
        EngineError::Validation(ValidationError::new(field, &msg).user_message()).into()
    })
}
