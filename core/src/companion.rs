//! Companions and their progression
//!
//! A companion levels up from workout XP. Each level gained raises every
//! stat by a random 2–5 points, and once its evolution level is reached the
//! companion takes its evolved name. Evolution happens at most once.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::EngineResult;
use crate::leveling::{self, experience_for_next_level};

/// Baseline for every starting stat
pub const BASE_STAT: u32 = 50;
/// Starting stats vary by up to this much either way
pub const BASE_STAT_SPREAD: u32 = 10;
/// Per-level stat growth range, inclusive
pub const STAT_GROWTH_MIN: u32 = 2;
pub const STAT_GROWTH_MAX: u32 = 5;

/// Elemental type of a companion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanionType {
    Flame,
    Aqua,
    Nature,
    Storm,
    Warrior,
    Mystic,
    Earth,
    Wind,
}

impl CompanionType {
    pub const ALL: [CompanionType; 8] = [
        CompanionType::Flame,
        CompanionType::Aqua,
        CompanionType::Nature,
        CompanionType::Storm,
        CompanionType::Warrior,
        CompanionType::Mystic,
        CompanionType::Earth,
        CompanionType::Wind,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CompanionType::Flame => "Flame",
            CompanionType::Aqua => "Aqua",
            CompanionType::Nature => "Nature",
            CompanionType::Storm => "Storm",
            CompanionType::Warrior => "Warrior",
            CompanionType::Mystic => "Mystic",
            CompanionType::Earth => "Earth",
            CompanionType::Wind => "Wind",
        }
    }

    /// Signature display color as `#RRGGBB`
    pub fn color_hex(&self) -> &'static str {
        match self {
            CompanionType::Flame => "#FF4F42",
            CompanionType::Aqua => "#3399FF",
            CompanionType::Nature => "#4DD973",
            CompanionType::Storm => "#FFCC00",
            CompanionType::Warrior => "#FF7333",
            CompanionType::Mystic => "#D966F2",
            CompanionType::Earth => "#8C7359",
            CompanionType::Wind => "#66BFFF",
        }
    }
}

/// Combat-style stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl CompanionStats {
    /// Starting stats: `50 ± 10` each
    pub fn roll_base(rng: &mut impl Rng) -> Self {
        let low = BASE_STAT - BASE_STAT_SPREAD;
        let high = BASE_STAT + BASE_STAT_SPREAD;
        Self {
            hp: rng.gen_range(low..=high),
            attack: rng.gen_range(low..=high),
            defense: rng.gen_range(low..=high),
            speed: rng.gen_range(low..=high),
        }
    }

    /// Growth for one level, 2–5 per stat
    pub fn roll_growth(rng: &mut impl Rng) -> Self {
        let range = STAT_GROWTH_MIN..=STAT_GROWTH_MAX;
        Self {
            hp: rng.gen_range(range.clone()),
            attack: rng.gen_range(range.clone()),
            defense: rng.gen_range(range.clone()),
            speed: rng.gen_range(range),
        }
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self {
            hp: self.hp.saturating_add(other.hp),
            attack: self.attack.saturating_add(other.attack),
            defense: self.defense.saturating_add(other.defense),
            speed: self.speed.saturating_add(other.speed),
        }
    }
}

/// What a single XP grant did to a companion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionOutcome {
    pub companion_id: Uuid,
    pub previous_level: u32,
    pub new_level: u32,
    pub levels_gained: u32,
    pub stat_gain: CompanionStats,
    /// Set when this grant triggered evolution
    pub evolved_into: Option<String>,
}

/// The user's virtual training partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(rename = "type")]
    pub companion_type: CompanionType,
    pub level: u32,
    pub experience: u64,
    pub base_stats: CompanionStats,
    pub current_stats: CompanionStats,
    #[serde(default)]
    pub evolution_level: Option<u32>,
    #[serde(default)]
    pub evolved_form: Option<String>,
}

impl Companion {
    /// A fresh level-1 companion with randomized base stats
    pub fn new(name: impl Into<String>, companion_type: CompanionType, rng: &mut impl Rng) -> Self {
        let base_stats = CompanionStats::roll_base(rng);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            nickname: None,
            companion_type,
            level: 1,
            experience: 0,
            base_stats,
            current_stats: base_stats,
            evolution_level: None,
            evolved_form: None,
        }
    }

    pub fn with_evolution(mut self, level: u32, evolved_form: impl Into<String>) -> Self {
        self.evolution_level = Some(level);
        self.evolved_form = Some(evolved_form.into());
        self
    }

    /// Nickname if one was given, otherwise the species name
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }

    pub fn experience_for_next_level(&self) -> u64 {
        experience_for_next_level(self.level)
    }

    pub fn has_evolved(&self) -> bool {
        self.evolution_level.is_some() && self.evolved_form.is_none()
    }

    /// Grant XP, rejecting negative amounts
    pub fn gain_experience(
        &mut self,
        amount: i64,
        rng: &mut impl Rng,
    ) -> EngineResult<ProgressionOutcome> {
        let amount = leveling::checked_grant(amount)?;
        Ok(self.apply_experience(amount, rng))
    }

    /// Grant a non-negative amount of XP
    pub fn apply_experience(&mut self, amount: u64, rng: &mut impl Rng) -> ProgressionOutcome {
        let previous_level = self.level;
        let progress = leveling::advance(self.level, self.experience, amount);
        self.level = progress.level;
        self.experience = progress.experience;

        let mut stat_gain = CompanionStats::default();
        for _ in 0..progress.levels_gained {
            stat_gain = stat_gain.saturating_add(CompanionStats::roll_growth(rng));
        }
        self.current_stats = self.current_stats.saturating_add(stat_gain);

        if progress.levels_gained > 0 {
            debug!(
                companion_id = %self.id,
                from = previous_level,
                to = self.level,
                "Companion leveled up"
            );
        }

        let evolved_into = self.try_evolve();

        ProgressionOutcome {
            companion_id: self.id,
            previous_level,
            new_level: self.level,
            levels_gained: progress.levels_gained,
            stat_gain,
            evolved_into,
        }
    }

    /// Evolve against the current level; clearing `evolved_form` makes this one-shot
    fn try_evolve(&mut self) -> Option<String> {
        let threshold = self.evolution_level?;
        if self.level < threshold {
            return None;
        }
        let evolved = self.evolved_form.take()?;
        info!(
            companion_id = %self.id,
            from = %self.name,
            to = %evolved,
            level = self.level,
            "Companion evolved"
        );
        self.name = evolved.clone();
        Some(evolved)
    }
}

/// A starter the user can pick during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarterTemplate {
    pub name: &'static str,
    pub companion_type: CompanionType,
    pub evolution_level: u32,
    pub evolved_form: &'static str,
}

impl StarterTemplate {
    pub fn instantiate(&self, rng: &mut impl Rng) -> Companion {
        Companion::new(self.name, self.companion_type, rng)
            .with_evolution(self.evolution_level, self.evolved_form)
    }
}

pub const STARTERS: [StarterTemplate; 8] = [
    StarterTemplate {
        name: "Embercub",
        companion_type: CompanionType::Flame,
        evolution_level: 16,
        evolved_form: "Blazelion",
    },
    StarterTemplate {
        name: "Aquapup",
        companion_type: CompanionType::Aqua,
        evolution_level: 16,
        evolved_form: "Tidalwolf",
    },
    StarterTemplate {
        name: "Leafling",
        companion_type: CompanionType::Nature,
        evolution_level: 16,
        evolved_form: "Verdantbear",
    },
    StarterTemplate {
        name: "Sparkkit",
        companion_type: CompanionType::Storm,
        evolution_level: 20,
        evolved_form: "Thunderlynx",
    },
    StarterTemplate {
        name: "Brawlpaw",
        companion_type: CompanionType::Warrior,
        evolution_level: 28,
        evolved_form: "Ironbeast",
    },
    StarterTemplate {
        name: "Mindling",
        companion_type: CompanionType::Mystic,
        evolution_level: 16,
        evolved_form: "Psyfox",
    },
    StarterTemplate {
        name: "Pebblecub",
        companion_type: CompanionType::Earth,
        evolution_level: 25,
        evolved_form: "Boulderbear",
    },
    StarterTemplate {
        name: "Breezeling",
        companion_type: CompanionType::Wind,
        evolution_level: 18,
        evolved_form: "Galehawk",
    },
];

/// Find a starter by name, case-insensitively
pub fn find_starter(name: &str) -> Option<&'static StarterTemplate> {
    STARTERS
        .iter()
        .find(|starter| starter.name.eq_ignore_ascii_case(name.trim()))
}

/// Instantiate the full starter roster
pub fn starter_companions(rng: &mut impl Rng) -> Vec<Companion> {
    STARTERS.iter().map(|starter| starter.instantiate(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_new_companion_starts_at_level_one() {
        let mut rng = rng();
        let companion = Companion::new("Embercub", CompanionType::Flame, &mut rng);

        assert_eq!(companion.level, 1);
        assert_eq!(companion.experience, 0);
        assert_eq!(companion.nickname, None);
        assert_eq!(companion.current_stats, companion.base_stats);
        for stat in [
            companion.base_stats.hp,
            companion.base_stats.attack,
            companion.base_stats.defense,
            companion.base_stats.speed,
        ] {
            assert!((40..=60).contains(&stat), "base stat {} out of range", stat);
        }
    }

    #[test]
    fn test_same_seed_gives_same_stats() {
        let a = Companion::new("A", CompanionType::Aqua, &mut ChaCha8Rng::seed_from_u64(7));
        let b = Companion::new("B", CompanionType::Aqua, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a.base_stats, b.base_stats);
    }

    #[test]
    fn test_single_level_up_resets_experience_and_grows_stats() {
        let mut rng = rng();
        let mut companion = Companion::new("Leafling", CompanionType::Nature, &mut rng);
        let before = companion.current_stats;

        let outcome = companion.gain_experience(100, &mut rng).unwrap();

        assert_eq!(companion.level, 2);
        assert_eq!(companion.experience, 0);
        assert_eq!(outcome.levels_gained, 1);
        for (after, before) in [
            (companion.current_stats.hp, before.hp),
            (companion.current_stats.attack, before.attack),
            (companion.current_stats.defense, before.defense),
            (companion.current_stats.speed, before.speed),
        ] {
            let delta = after - before;
            assert!((2..=5).contains(&delta), "growth {} out of range", delta);
        }
    }

    #[test]
    fn test_stats_grow_once_per_level() {
        let mut rng = rng();
        let mut companion = Companion::new("Sparkkit", CompanionType::Storm, &mut rng);
        let before = companion.current_stats;

        // 100 + 200 + 300 reaches level 4
        let outcome = companion.gain_experience(600, &mut rng).unwrap();

        assert_eq!(outcome.levels_gained, 3);
        let delta = companion.current_stats.hp - before.hp;
        assert!((6..=15).contains(&delta), "three levels gave {} hp", delta);
        assert_eq!(companion.current_stats.hp - before.hp, outcome.stat_gain.hp);
    }

    #[test]
    fn test_injected_rng_makes_growth_deterministic() {
        let mut a = Companion::new("A", CompanionType::Wind, &mut ChaCha8Rng::seed_from_u64(1));
        let mut b = a.clone();

        let outcome_a = a.gain_experience(1000, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        let outcome_b = b.gain_experience(1000, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();

        assert_eq!(outcome_a.stat_gain, outcome_b.stat_gain);
        assert_eq!(a.current_stats, b.current_stats);
    }

    #[test]
    fn test_no_level_no_growth() {
        let mut rng = rng();
        let mut companion = Companion::new("Mindling", CompanionType::Mystic, &mut rng);
        let before = companion.current_stats;

        let outcome = companion.gain_experience(99, &mut rng).unwrap();

        assert_eq!(outcome.levels_gained, 0);
        assert_eq!(companion.current_stats, before);
        assert_eq!(companion.experience, 99);
    }

    #[test]
    fn test_evolution_triggers_at_threshold() {
        let mut rng = rng();
        let mut companion =
            Companion::new("Starter", CompanionType::Flame, &mut rng).with_evolution(3, "Evolved");

        let outcome = companion.gain_experience(300, &mut rng).unwrap();

        assert_eq!(companion.level, 3);
        assert_eq!(companion.name, "Evolved");
        assert_eq!(companion.evolved_form, None);
        assert_eq!(outcome.evolved_into.as_deref(), Some("Evolved"));
        assert!(companion.has_evolved());
    }

    #[test]
    fn test_evolution_checks_final_level_only_once() {
        let mut rng = rng();
        let mut companion =
            Companion::new("Starter", CompanionType::Earth, &mut rng).with_evolution(3, "Evolved");

        // Jumps past the threshold in one grant
        companion.gain_experience(5_000, &mut rng).unwrap();
        assert_eq!(companion.name, "Evolved");

        let outcome = companion.gain_experience(50_000, &mut rng).unwrap();
        assert_eq!(companion.name, "Evolved");
        assert_eq!(outcome.evolved_into, None);
    }

    #[test]
    fn test_below_threshold_keeps_name() {
        let mut rng = rng();
        let mut companion =
            Companion::new("Starter", CompanionType::Aqua, &mut rng).with_evolution(16, "Evolved");

        companion.gain_experience(300, &mut rng).unwrap();

        assert_eq!(companion.name, "Starter");
        assert_eq!(companion.evolved_form.as_deref(), Some("Evolved"));
    }

    #[test]
    fn test_no_evolution_data_never_renames() {
        let mut rng = rng();
        let mut companion = Companion::new("Plain", CompanionType::Mystic, &mut rng);

        companion.gain_experience(1_000, &mut rng).unwrap();

        assert_eq!(companion.name, "Plain");
        assert!(companion.level > 1);
        assert!(!companion.has_evolved());
    }

    #[test]
    fn test_negative_grant_leaves_companion_untouched() {
        let mut rng = rng();
        let mut companion = Companion::new("Brawlpaw", CompanionType::Warrior, &mut rng);
        let snapshot = companion.clone();

        let result = companion.gain_experience(-10, &mut rng);

        assert_eq!(result, Err(EngineError::NegativeExperience(-10)));
        assert_eq!(companion, snapshot);
    }

    #[test]
    fn test_display_name_prefers_nickname() {
        let mut rng = rng();
        let mut companion = Companion::new("Leafling", CompanionType::Nature, &mut rng);
        assert_eq!(companion.display_name(), "Leafling");
        companion.nickname = Some("Leafy".to_string());
        assert_eq!(companion.display_name(), "Leafy");
    }

    #[test]
    fn test_starter_roster() {
        let mut rng = rng();
        let roster = starter_companions(&mut rng);

        assert_eq!(roster.len(), 8);
        let types: Vec<_> = roster.iter().map(|c| c.companion_type).collect();
        assert_eq!(types, CompanionType::ALL.to_vec());
        assert!(roster.iter().all(|c| c.evolution_level.is_some() && c.evolved_form.is_some()));

        let brawlpaw = find_starter("brawlpaw").unwrap();
        assert_eq!(brawlpaw.evolution_level, 28);
        assert_eq!(brawlpaw.evolved_form, "Ironbeast");
        assert!(find_starter("Missingno").is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_experience_invariant_holds(
            seed in any::<u64>(),
            grants in prop::collection::vec(0i64..3_000, 1..10),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut companion = Companion::new("x", CompanionType::Storm, &mut rng);
            let mut last_level = companion.level;
            for gained in grants {
                companion.gain_experience(gained, &mut rng).unwrap();
                prop_assert!(companion.experience < companion.experience_for_next_level());
                prop_assert!(companion.level >= last_level);
                last_level = companion.level;
            }
        }

        #[test]
        fn prop_stats_never_decrease(seed in any::<u64>(), gained in 0i64..20_000) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut companion = Companion::new("x", CompanionType::Earth, &mut rng);
            let before = companion.current_stats;
            let outcome = companion.gain_experience(gained, &mut rng).unwrap();
            let growth_min = STAT_GROWTH_MIN * outcome.levels_gained;
            let growth_max = STAT_GROWTH_MAX * outcome.levels_gained;
            let hp_gain = companion.current_stats.hp - before.hp;
            prop_assert!(hp_gain >= growth_min && hp_gain <= growth_max);
        }
    }
}
