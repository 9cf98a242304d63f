//! Badge evaluation over a user's full history
//!
//! Every rule runs on every evaluation; a badge is only appended when the
//! user does not already hold one of that type, so evaluation is idempotent.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::{Badge, BadgeType};
use crate::user::User;

pub const WEEK_STREAK_WORKOUTS: usize = 7;
pub const MONTH_STREAK_WORKOUTS: usize = 30;
pub const FIRST_EVOLUTION_LEVEL: u32 = 10;
pub const STRONG_LIFTER_KG: f64 = 10_000.0;
pub const MARATHONER_KM: f64 = 100.0;

/// Whether the user's current history meets a badge's condition
pub fn qualifies(badge_type: BadgeType, user: &User) -> bool {
    match badge_type {
        BadgeType::WeekStreak => user.workouts().len() >= WEEK_STREAK_WORKOUTS,
        BadgeType::MonthStreak => user.workouts().len() >= MONTH_STREAK_WORKOUTS,
        BadgeType::FirstEvolution => user
            .companions()
            .iter()
            .any(|companion| companion.level >= FIRST_EVOLUTION_LEVEL),
        BadgeType::StrongLifter => user.total_weight_lifted() >= STRONG_LIFTER_KG,
        BadgeType::Marathoner => user.total_distance() >= MARATHONER_KM,
    }
}

/// Award every newly qualified badge, returning the types awarded
pub fn evaluate_badges(user: &mut User, now: DateTime<Utc>) -> Vec<BadgeType> {
    let mut awarded = Vec::new();

    for badge_type in BadgeType::ALL {
        if user.has_badge(badge_type) || !qualifies(badge_type, user) {
            continue;
        }
        user.badges.push(Badge::new(badge_type, now));
        info!(user_id = %user.id, badge = badge_type.title(), "Badge earned");
        awarded.push(badge_type);
    }

    awarded
}
