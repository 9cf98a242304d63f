//! Data models for workouts, exercises and badges

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exercise category, which also decides the XP multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Strength,
    Cardio,
    Flexibility,
    Sports,
    Other,
}

impl ExerciseCategory {
    pub const ALL: [ExerciseCategory; 5] = [
        ExerciseCategory::Strength,
        ExerciseCategory::Cardio,
        ExerciseCategory::Flexibility,
        ExerciseCategory::Sports,
        ExerciseCategory::Other,
    ];

    /// Multiplier applied to an exercise's raw XP
    pub fn experience_multiplier(&self) -> f64 {
        match self {
            ExerciseCategory::Strength => 1.5,
            ExerciseCategory::Cardio => 1.2,
            ExerciseCategory::Flexibility => 1.0,
            ExerciseCategory::Sports => 1.3,
            ExerciseCategory::Other => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::Strength => "strength",
            ExerciseCategory::Cardio => "cardio",
            ExerciseCategory::Flexibility => "flexibility",
            ExerciseCategory::Sports => "sports",
            ExerciseCategory::Other => "other",
        }
    }

    /// Parse a category name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == normalized)
    }
}

/// Common exercises and the category they default to
pub const COMMON_EXERCISES: &[(&str, ExerciseCategory)] = &[
    ("Push-ups", ExerciseCategory::Strength),
    ("Pull-ups", ExerciseCategory::Strength),
    ("Squats", ExerciseCategory::Strength),
    ("Deadlift", ExerciseCategory::Strength),
    ("Bench Press", ExerciseCategory::Strength),
    ("Running", ExerciseCategory::Cardio),
    ("Cycling", ExerciseCategory::Cardio),
    ("Swimming", ExerciseCategory::Cardio),
    ("Yoga", ExerciseCategory::Flexibility),
    ("Stretching", ExerciseCategory::Flexibility),
    ("Basketball", ExerciseCategory::Sports),
    ("Soccer", ExerciseCategory::Sports),
    ("Tennis", ExerciseCategory::Sports),
];

/// Look up the default category of a well-known exercise
pub fn common_exercise_category(name: &str) -> Option<ExerciseCategory> {
    COMMON_EXERCISES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
        .map(|(_, category)| *category)
}

/// One logged movement inside a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub category: ExerciseCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Distance in kilometers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, category: ExerciseCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            sets: None,
            reps: None,
            weight: None,
            duration: None,
            distance: None,
            notes: None,
        }
    }

    pub fn with_sets_reps(mut self, sets: u32, reps: u32) -> Self {
        self.sets = Some(sets);
        self.reps = Some(reps);
        self
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight = Some(weight_kg);
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_distance(mut self, km: f64) -> Self {
        self.distance = Some(km);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A finished, dated collection of exercises
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub exercises: Vec<Exercise>,
    /// Active duration in seconds, paused time excluded
    pub total_duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub companion_used: Option<Uuid>,
}

impl Workout {
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            exercises: Vec::new(),
            total_duration: 0.0,
            notes: None,
            companion_used: None,
        }
    }

    /// Sum of logged weight in kilograms
    pub fn total_weight(&self) -> f64 {
        self.exercises.iter().filter_map(|e| e.weight).sum()
    }

    /// Sum of logged distance in kilometers
    pub fn total_distance(&self) -> f64 {
        self.exercises.iter().filter_map(|e| e.distance).sum()
    }
}

/// Badge kinds, each awarded at most once per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeType {
    WeekStreak,
    MonthStreak,
    FirstEvolution,
    StrongLifter,
    Marathoner,
}

impl BadgeType {
    /// Evaluation order
    pub const ALL: [BadgeType; 5] = [
        BadgeType::WeekStreak,
        BadgeType::MonthStreak,
        BadgeType::FirstEvolution,
        BadgeType::StrongLifter,
        BadgeType::Marathoner,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            BadgeType::WeekStreak => "Week Warrior",
            BadgeType::MonthStreak => "Monthly Master",
            BadgeType::FirstEvolution => "Evolution Expert",
            BadgeType::StrongLifter => "Strong Trainer",
            BadgeType::Marathoner => "Distance Champion",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BadgeType::WeekStreak => "Complete 7 workouts",
            BadgeType::MonthStreak => "Complete 30 workouts",
            BadgeType::FirstEvolution => "Evolve your first Companion",
            BadgeType::StrongLifter => "Lift 10,000 kg total",
            BadgeType::Marathoner => "Run 100 km total",
        }
    }
}

/// An earned achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub badge_type: BadgeType,
    pub earned_at: DateTime<Utc>,
}

impl Badge {
    pub fn new(badge_type: BadgeType, earned_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            badge_type,
            earned_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(ExerciseCategory::parse("Strength"), Some(ExerciseCategory::Strength));
        assert_eq!(ExerciseCategory::parse(" CARDIO "), Some(ExerciseCategory::Cardio));
        assert_eq!(ExerciseCategory::parse("pilates"), None);
    }

    #[test]
    fn test_common_exercise_lookup() {
        assert_eq!(common_exercise_category("deadlift"), Some(ExerciseCategory::Strength));
        assert_eq!(common_exercise_category("Yoga"), Some(ExerciseCategory::Flexibility));
        assert_eq!(common_exercise_category("Tennis"), Some(ExerciseCategory::Sports));
        assert_eq!(common_exercise_category("Underwater Basket Weaving"), None);
    }

    #[test]
    fn test_workout_totals_skip_missing_fields() {
        let mut workout = Workout::new(Utc::now());
        workout
            .exercises
            .push(Exercise::new("Squats", ExerciseCategory::Strength).with_weight(100.0));
        workout
            .exercises
            .push(Exercise::new("Running", ExerciseCategory::Cardio).with_distance(5.5));
        workout.exercises.push(Exercise::new("Yoga", ExerciseCategory::Flexibility));

        assert_eq!(workout.total_weight(), 100.0);
        assert_eq!(workout.total_distance(), 5.5);
    }

    #[test]
    fn test_badge_type_serializes_snake_case() {
        let json = serde_json::to_string(&BadgeType::StrongLifter).unwrap();
        assert_eq!(json, "\"strong_lifter\"");
    }

    fn finite_f64() -> impl Strategy<Value = f64> {
        prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_measurements_survive_json_bit_for_bit(
            weight in finite_f64(),
            duration in finite_f64(),
            distance in finite_f64(),
            total_duration in finite_f64(),
        ) {
            let mut workout = Workout::new(Utc::now());
            workout.total_duration = total_duration;
            workout.exercises.push(
                Exercise::new("Deadlift", ExerciseCategory::Strength)
                    .with_weight(weight)
                    .with_duration(duration)
                    .with_distance(distance),
            );

            let json = serde_json::to_string(&workout).unwrap();
            let restored: Workout = serde_json::from_str(&json).unwrap();

            let bits = |v: Option<f64>| v.map(f64::to_bits);
            let (before, after) = (&workout.exercises[0], &restored.exercises[0]);
            prop_assert_eq!(restored.total_duration.to_bits(), total_duration.to_bits());
            prop_assert_eq!(bits(after.weight), bits(before.weight));
            prop_assert_eq!(bits(after.duration), bits(before.duration));
            prop_assert_eq!(bits(after.distance), bits(before.distance));
        }
    }
}
