//! CompanionFit progression engine
//!
//! Turns logged exercises into experience points, levels up and evolves
//! companions, awards milestone badges, and tracks the in-progress
//! workout session. Everything here is pure and single-threaded: time and
//! randomness are passed in by the caller.

pub mod badges;
pub mod companion;
pub mod errors;
pub mod experience;
pub mod leveling;
pub mod models;
pub mod session;
pub mod user;
pub mod validation;

// Re-export commonly used items
pub use badges::evaluate_badges;
pub use companion::{
    find_starter, starter_companions, Companion, CompanionStats, CompanionType,
    ProgressionOutcome, StarterTemplate, STARTERS,
};
pub use errors::*;
pub use experience::{compute_xp, workout_xp};
pub use leveling::{apply_experience, experience_for_next_level, LevelProgress};
pub use models::*;
pub use session::{format_elapsed, SessionState, WorkoutSession};
pub use user::{CompletionSummary, User};
