//! Input validation functions
//!
//! Numeric exercise attributes must be finite and non-negative, and free
//! text is bounded. The primitive validators return `Result<(), String>`;
//! `validate_exercise` wraps failures in a [`ValidationError`] that carries
//! the offending field.

use crate::models::{Exercise, Workout};

pub const MAX_EXERCISE_NAME_LEN: usize = 100;
pub const MAX_PROFILE_NAME_LEN: usize = 50;
pub const MAX_NICKNAME_LEN: usize = 30;
pub const MAX_NOTES_LEN: usize = 1_000;

/// Validate a required, bounded piece of text
pub fn validate_name(value: &str, max_len: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("cannot be empty".to_string());
    }
    if trimmed.chars().count() > max_len {
        return Err(format!("must be at most {} characters", max_len));
    }
    Ok(())
}

/// Validate a non-negative, finite measurement
pub fn validate_non_negative(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("must be a valid number".to_string());
    }
    if value < 0.0 {
        return Err("cannot be negative".to_string());
    }
    Ok(())
}

/// Validate a username or trainer name
pub fn validate_profile_name(value: &str) -> Result<(), String> {
    validate_name(value, MAX_PROFILE_NAME_LEN)
}

/// Validate a companion nickname
pub fn validate_nickname(value: &str) -> Result<(), String> {
    validate_name(value, MAX_NICKNAME_LEN)
}

/// Validate every field of a logged exercise
pub fn validate_exercise(exercise: &Exercise) -> Result<(), ValidationError> {
    validate_name(&exercise.name, MAX_EXERCISE_NAME_LEN)
        .map_err(|msg| ValidationError::new("name", &msg))?;

    let measurements = [
        ("weight", exercise.weight),
        ("duration", exercise.duration),
        ("distance", exercise.distance),
    ];
    for (field, value) in measurements {
        if let Some(value) = value {
            validate_non_negative(value).map_err(|msg| ValidationError::new(field, &msg))?;
        }
    }

    if let Some(notes) = &exercise.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(ValidationError::new(
                "notes",
                &format!("must be at most {} characters", MAX_NOTES_LEN),
            ));
        }
    }
    Ok(())
}

/// Validate a finished workout and every exercise in it
///
/// Non-finite numbers cannot be persisted as JSON, so they are rejected
/// here rather than surfacing as a corrupt save later.
pub fn validate_workout(workout: &Workout) -> Result<(), ValidationError> {
    validate_non_negative(workout.total_duration)
        .map_err(|msg| ValidationError::new("total_duration", &msg))?;

    if let Some(notes) = &workout.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(ValidationError::new(
                "notes",
                &format!("must be at most {} characters", MAX_NOTES_LEN),
            ));
        }
    }

    workout.exercises.iter().try_for_each(validate_exercise)
}

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "name" => "Exercise Name",
        "weight" => "Weight (kg)",
        "duration" => "Duration (seconds)",
        "total_duration" => "Workout Duration (seconds)",
        "distance" => "Distance (km)",
        "notes" => "Notes",
        "username" => "Username",
        "trainer_name" => "Trainer Name",
        "nickname" => "Nickname",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}
