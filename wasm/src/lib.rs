//! CompanionFit WASM Module
//!
//! Exposes the progression engine to web and watch front ends. Structured
//! values cross the boundary as JSON strings in the same shape the host
//! persists, so a front end can hold the user aggregate and hand it back.

use chrono::{DateTime, Utc};
use companionfit_core::{
    compute_xp, experience_for_next_level as level_threshold, format_elapsed as format_timer,
    starter_companions as roll_starters, CompletionSummary, Exercise, User, Workout,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Result of `complete_workout`: the updated aggregate and what changed
#[derive(Serialize)]
struct Completion {
    user: User,
    summary: CompletionSummary,
}

/// XP for a single exercise given as JSON
#[wasm_bindgen]
pub fn exercise_xp(exercise_json: &str) -> Result<u32, JsValue> {
    exercise_xp_inner(exercise_json).map_err(|e| JsValue::from_str(&e))
}

/// XP needed to advance past `level`
#[wasm_bindgen]
pub fn experience_for_next_level(level: u32) -> f64 {
    level_threshold(level) as f64
}

/// Apply a finished workout to a user; returns `{ user, summary }` as JSON
///
/// `seed` drives the companion stat rolls and `now_ms` is the completion
/// time in Unix milliseconds.
#[wasm_bindgen]
pub fn complete_workout(
    user_json: &str,
    workout_json: &str,
    seed: u32,
    now_ms: f64,
) -> Result<String, JsValue> {
    complete_workout_inner(user_json, workout_json, seed, now_ms).map_err(|e| JsValue::from_str(&e))
}

/// The eight starter companions with stats rolled from `seed`, as JSON
#[wasm_bindgen]
pub fn starter_companions(seed: u32) -> Result<String, JsValue> {
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
    serde_json::to_string(&roll_starters(&mut rng)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render elapsed seconds as `MM:SS`
#[wasm_bindgen]
pub fn format_elapsed(seconds: f64) -> String {
    format_timer(seconds)
}

fn exercise_xp_inner(exercise_json: &str) -> Result<u32, String> {
    let exercise: Exercise =
        serde_json::from_str(exercise_json).map_err(|e| format!("Invalid exercise: {}", e))?;
    Ok(compute_xp(&exercise))
}

fn complete_workout_inner(
    user_json: &str,
    workout_json: &str,
    seed: u32,
    now_ms: f64,
) -> Result<String, String> {
    let mut user: User =
        serde_json::from_str(user_json).map_err(|e| format!("Invalid user: {}", e))?;
    let workout: Workout =
        serde_json::from_str(workout_json).map_err(|e| format!("Invalid workout: {}", e))?;
    let now = timestamp(now_ms)?;

    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
    let summary = user
        .complete_workout(workout, now, &mut rng)
        .map_err(|e| e.to_string())?;

    serde_json::to_string(&Completion { user, summary }).map_err(|e| e.to_string())
}

fn timestamp(now_ms: f64) -> Result<DateTime<Utc>, String> {
    if !now_ms.is_finite() {
        return Err("Invalid timestamp".to_string());
    }
    DateTime::from_timestamp_millis(now_ms as i64)
        .ok_or_else(|| "Timestamp out of range".to_string())
}
