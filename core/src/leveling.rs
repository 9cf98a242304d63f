//! Level progression with carry-over experience
//!
//! Reaching level `n + 1` from level `n` costs `n * 100` XP. Leftover XP
//! carries into the next level, and one grant can cross several thresholds.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// XP cost per level step
pub const XP_PER_LEVEL: u64 = 100;

/// XP needed to advance from `level` to `level + 1`
pub fn experience_for_next_level(level: u32) -> u64 {
    u64::from(level) * XP_PER_LEVEL
}

/// Result of applying an XP grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub experience: u64,
    pub levels_gained: u32,
}

/// Apply a signed XP grant, rejecting negative amounts
pub fn apply_experience(level: u32, experience: u64, gained: i64) -> EngineResult<LevelProgress> {
    let gained = checked_grant(gained)?;
    Ok(advance(level, experience, gained))
}

/// Convert a signed grant into an unsigned one
pub fn checked_grant(gained: i64) -> EngineResult<u64> {
    u64::try_from(gained).map_err(|_| EngineError::NegativeExperience(gained))
}

/// Apply a non-negative XP grant
///
/// Terminates for any input because each threshold is larger than the last.
pub fn advance(level: u32, experience: u64, gained: u64) -> LevelProgress {
    // Level 0 would make the threshold 0 and never terminate
    let mut level = level.max(1);
    let mut experience = experience.saturating_add(gained);
    let mut levels_gained = 0u32;

    while experience >= experience_for_next_level(level) {
        experience -= experience_for_next_level(level);
        level += 1;
        levels_gained += 1;
    }

    LevelProgress {
        level,
        experience,
        levels_gained,
    }
}
