//! The user aggregate: the unit of persistence
//!
//! Owns companions, workout history, badges and progression totals.
//! Workouts and badges are append-only, and `level` / `total_experience`
//! are derived, so those fields are only reachable through methods.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::badges;
use crate::companion::{Companion, ProgressionOutcome};
use crate::errors::{EngineError, EngineResult};
use crate::experience::workout_xp;
use crate::models::{Badge, BadgeType, Workout};
use crate::validation::validate_workout;

/// Total XP per user level
pub const XP_PER_USER_LEVEL: u64 = 1_000;

/// Everything a completed workout changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub workout_id: Uuid,
    pub experience_gained: u64,
    pub previous_user_level: u32,
    pub user_level: u32,
    /// `None` when no active companion resolved
    pub companion: Option<ProgressionOutcome>,
    pub badges_earned: Vec<BadgeType>,
}

impl CompletionSummary {
    pub fn user_leveled_up(&self) -> bool {
        self.user_level > self.previous_user_level
    }
}

/// A user's profile and complete fitness history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub trainer_name: String,
    pub(crate) level: u32,
    pub(crate) total_experience: u64,
    pub(crate) companions: Vec<Companion>,
    pub(crate) active_companion_id: Option<Uuid>,
    pub(crate) workouts: Vec<Workout>,
    pub(crate) badges: Vec<Badge>,
    #[serde(default)]
    pub friends: Vec<Uuid>,
    pub join_date: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        trainer_name: impl Into<String>,
        join_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            trainer_name: trainer_name.into(),
            level: 1,
            total_experience: 0,
            companions: Vec::new(),
            active_companion_id: None,
            workouts: Vec::new(),
            badges: Vec::new(),
            friends: Vec::new(),
            join_date,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn total_experience(&self) -> u64 {
        self.total_experience
    }

    pub fn companions(&self) -> &[Companion] {
        &self.companions
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn active_companion_id(&self) -> Option<Uuid> {
        self.active_companion_id
    }

    pub fn has_badge(&self, badge_type: BadgeType) -> bool {
        self.badges.iter().any(|badge| badge.badge_type == badge_type)
    }

    pub fn companion(&self, id: Uuid) -> Option<&Companion> {
        self.companions.iter().find(|companion| companion.id == id)
    }

    /// The active companion, if the stored id still resolves
    pub fn active_companion(&self) -> Option<&Companion> {
        self.active_companion_id.and_then(|id| self.companion(id))
    }

    fn active_companion_mut(&mut self) -> Option<&mut Companion> {
        let id = self.active_companion_id?;
        self.companions.iter_mut().find(|companion| companion.id == id)
    }

    /// Append a companion; it becomes active when none is set
    pub fn add_companion(&mut self, companion: Companion) {
        if self.active_companion_id.is_none() {
            self.active_companion_id = Some(companion.id);
        }
        self.companions.push(companion);
    }

    /// Store the active id as given; an unknown id is tolerated
    pub fn set_active_companion(&mut self, companion_id: Uuid) {
        self.active_companion_id = Some(companion_id);
    }

    /// Returns whether a companion with that id was found
    pub fn update_companion_nickname(
        &mut self,
        companion_id: Uuid,
        nickname: Option<String>,
    ) -> bool {
        match self.companions.iter_mut().find(|c| c.id == companion_id) {
            Some(companion) => {
                companion.nickname = nickname;
                true
            }
            None => false,
        }
    }

    /// Total kilograms logged across every workout
    pub fn total_weight_lifted(&self) -> f64 {
        self.workouts.iter().map(Workout::total_weight).sum()
    }

    /// Total kilometers logged across every workout
    pub fn total_distance(&self) -> f64 {
        self.workouts.iter().map(Workout::total_distance).sum()
    }

    /// Commit a finished workout and apply all progression
    ///
    /// Stamps the active companion, appends the workout, credits XP to the
    /// user and to the active companion, then evaluates badges. A dangling
    /// active companion id and an empty exercise list are both valid inputs;
    /// a workout with invalid measurements is rejected before anything changes.
    pub fn complete_workout(
        &mut self,
        mut workout: Workout,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> EngineResult<CompletionSummary> {
        validate_workout(&workout).map_err(|e| EngineError::Validation(e.user_message()))?;

        workout.companion_used = self.active_companion_id;
        let user_id = self.id;
        let workout_id = workout.id;
        let experience_gained = workout_xp(&workout);
        self.workouts.push(workout);

        let previous_user_level = self.level;
        self.total_experience = self.total_experience.saturating_add(experience_gained);
        let derived_level =
            u32::try_from(self.total_experience / XP_PER_USER_LEVEL + 1).unwrap_or(u32::MAX);
        if derived_level > self.level {
            self.level = derived_level;
        }

        let companion = match self.active_companion_mut() {
            Some(companion) => Some(companion.apply_experience(experience_gained, rng)),
            None => {
                debug!(%user_id, "No active companion, skipping companion XP");
                None
            }
        };

        let badges_earned = badges::evaluate_badges(self, now);

        info!(
            %user_id,
            %workout_id,
            xp = experience_gained,
            level = self.level,
            "Workout completed"
        );

        Ok(CompletionSummary {
            workout_id,
            experience_gained,
            previous_user_level,
            user_level: self.level,
            companion,
            badges_earned,
        })
    }
}
