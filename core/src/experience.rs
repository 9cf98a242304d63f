//! Experience point calculation
//!
//! Every logged exercise is worth a base of 10 XP plus volume bonuses,
//! scaled by its category multiplier and floored:
//!
//! ```text
//! xp = floor((10 + sets*reps*2 + floor(kg/10) + floor(s/60)*5 + floor(km*10)) * multiplier)
//! ```

use crate::models::{Exercise, Workout};

/// Base XP awarded for any logged exercise
pub const BASE_EXERCISE_XP: u64 = 10;

/// XP for a single exercise
pub fn compute_xp(exercise: &Exercise) -> u32 {
    let mut raw = BASE_EXERCISE_XP;

    if let (Some(sets), Some(reps)) = (exercise.sets, exercise.reps) {
        raw += u64::from(sets) * u64::from(reps) * 2;
    }
    if let Some(weight) = exercise.weight {
        raw += floor_non_negative(weight / 10.0);
    }
    if let Some(duration) = exercise.duration {
        raw += floor_non_negative(duration / 60.0) * 5;
    }
    if let Some(distance) = exercise.distance {
        raw += floor_non_negative(distance * 10.0);
    }

    let scaled = (raw as f64 * exercise.category.experience_multiplier()).floor();
    // `as` saturates, so absurd volumes clamp to u32::MAX
    scaled as u32
}

/// Total XP for a workout: the sum over its exercises
pub fn workout_xp(workout: &Workout) -> u64 {
    workout
        .exercises
        .iter()
        .map(|exercise| u64::from(compute_xp(exercise)))
        .sum()
}

/// Negative and NaN inputs contribute nothing
fn floor_non_negative(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.floor() as u64
    }
}
