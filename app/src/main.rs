//! CompanionFit command-line host
//!
//! Drives the application service against the JSON file store. Every
//! invocation loads the saved trainer, applies one command and saves again.

use anyhow::{bail, Context, Result};
use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand};
use companionfit_app::{
    config::AppConfig,
    error::Synced,
    health::DisabledHealth,
    repositories::JsonFileStore,
    services::CompanionFitApp,
    telemetry,
};
use companionfit_core::{
    common_exercise_category, format_elapsed, BadgeType, CompletionSummary, Exercise,
    ExerciseCategory, User, STARTERS,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

type App = CompanionFitApp<JsonFileStore, DisabledHealth>;

#[derive(Parser)]
#[command(name = "companionfit")]
#[command(version, about = "Train with a companion that grows with every workout")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a trainer profile and pick a starter companion
    Init {
        username: String,
        trainer_name: String,
        /// Starter companion (see `starters`)
        #[arg(long, default_value = "Embercub")]
        starter: String,
    },

    /// List the starter companions
    Starters {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show trainer, companions and badges
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log a single-exercise workout
    Log {
        /// Exercise name
        name: String,
        /// strength, cardio, flexibility, sports or other (guessed from the name if omitted)
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        sets: Option<u32>,
        #[arg(long)]
        reps: Option<u32>,
        /// Weight in kg
        #[arg(short, long)]
        weight: Option<f64>,
        /// Exercise duration in seconds
        #[arg(short, long)]
        duration: Option<f64>,
        /// Distance in km
        #[arg(long)]
        distance: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
        /// Length of the workout in minutes
        #[arg(short, long, default_value = "0")]
        minutes: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Make a companion the active training partner
    Activate {
        /// Companion id, name or nickname
        companion: String,
    },

    /// Set or clear a companion's nickname
    Nickname {
        /// Companion id, name or nickname
        companion: String,
        /// New nickname; omit to clear
        nickname: Option<String>,
    },

    /// Delete the saved trainer profile
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    telemetry::init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if config.health.enabled {
        warn!("Health integration requested but no health platform is available on this host");
    }

    let store = JsonFileStore::new(config.storage.user_file());
    info!(path = %store.path().display(), "Opening user store");
    let app = report(App::open(store, DisabledHealth, config.engine.rng_seed).await?);

    run(app, cli.command).await
}

async fn run(mut app: App, command: Commands) -> Result<()> {
    let now = Utc::now();

    match command {
        Commands::Init {
            username,
            trainer_name,
            starter,
        } => {
            report(app.create_user(&username, &trainer_name, now).await?);
            let companion = report(app.select_starter(&starter).await?);
            println!(
                "Welcome, {}! {} ({}) is ready to train.",
                trainer_name.trim(),
                companion.name,
                companion.companion_type.display_name()
            );
        }

        Commands::Starters { json } => {
            if json {
                let starters: Vec<StarterView> = STARTERS
                    .iter()
                    .map(|s| StarterView {
                        name: s.name,
                        companion_type: s.companion_type.display_name(),
                        evolution_level: s.evolution_level,
                        evolved_form: s.evolved_form,
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&starters)?);
            } else {
                for s in STARTERS.iter() {
                    println!(
                        "{:<12} {:<8} evolves at level {:>2} into {}",
                        s.name,
                        s.companion_type.display_name(),
                        s.evolution_level,
                        s.evolved_form
                    );
                }
            }
        }

        Commands::Status { json } => {
            let user = require_user(&app)?;
            if json {
                println!("{}", serde_json::to_string_pretty(user)?);
            } else {
                print_status(user);
            }
        }

        Commands::Log {
            name,
            category,
            sets,
            reps,
            weight,
            duration,
            distance,
            notes,
            minutes,
            json,
        } => {
            let category = match category {
                Some(raw) => match ExerciseCategory::parse(&raw) {
                    Some(category) => category,
                    None => bail!("Unknown exercise category: {}", raw),
                },
                None => common_exercise_category(&name).unwrap_or(ExerciseCategory::Other),
            };

            let mut exercise = Exercise::new(name, category);
            exercise.sets = sets;
            exercise.reps = reps;
            exercise.weight = weight;
            exercise.duration = duration;
            exercise.distance = distance;
            exercise.notes = notes;

            if !minutes.is_finite() || minutes < 0.0 {
                bail!("Workout length must be a non-negative number of minutes");
            }
            let started_at = now - TimeDelta::milliseconds((minutes * 60_000.0) as i64);

            app.start_workout(started_at)?;
            app.add_exercise(exercise)?;
            let summary = report(app.finish_workout(now).await?);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary, require_user(&app)?);
            }
        }

        Commands::Activate { companion } => {
            let id = resolve_companion(require_user(&app)?, &companion)?;
            report(app.set_active_companion(id).await?);
            println!("Active companion set.");
        }

        Commands::Nickname {
            companion,
            nickname,
        } => {
            let id = resolve_companion(require_user(&app)?, &companion)?;
            if report(app.update_companion_nickname(id, nickname.as_deref()).await?) {
                println!("Nickname updated.");
            } else {
                println!("No companion with that id.");
            }
        }

        Commands::Reset => {
            report(app.reset_user().await);
            println!("Trainer profile deleted.");
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct StarterView {
    name: &'static str,
    #[serde(rename = "type")]
    companion_type: &'static str,
    evolution_level: u32,
    evolved_form: &'static str,
}

/// Print non-fatal warnings and unwrap the value
fn report<T>(synced: Synced<T>) -> T {
    for warning in &synced.warnings {
        eprintln!("warning: {}", warning);
    }
    synced.value
}

fn require_user(app: &App) -> Result<&User> {
    app.user()
        .context("No trainer profile exists yet; run `companionfit init` first")
}

/// Match a companion by id, then by name or nickname
fn resolve_companion(user: &User, query: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(query) {
        return Ok(id);
    }
    user.companions()
        .iter()
        .find(|c| {
            c.name.eq_ignore_ascii_case(query)
                || c.nickname
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(query))
        })
        .map(|c| c.id)
        .with_context(|| format!("No companion named {}", query))
}

fn print_status(user: &User) {
    println!("{} ({})", user.trainer_name, user.username);
    println!(
        "Level {}  |  {} XP total  |  {} workouts",
        user.level(),
        user.total_experience(),
        user.workouts().len()
    );
    println!(
        "Lifted {:.1} kg  |  Covered {:.2} km",
        user.total_weight_lifted(),
        user.total_distance()
    );

    println!();
    println!("Companions:");
    for companion in user.companions() {
        let marker = if Some(companion.id) == user.active_companion_id() {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<14} {:<8} Lv {:>3}  {:>3}/{:<3} XP  HP {} ATK {} DEF {} SPD {}",
            marker,
            companion.display_name(),
            companion.companion_type.display_name(),
            companion.level,
            companion.experience,
            companion.experience_for_next_level(),
            companion.current_stats.hp,
            companion.current_stats.attack,
            companion.current_stats.defense,
            companion.current_stats.speed
        );
    }

    if !user.badges().is_empty() {
        println!();
        println!("Badges:");
        for badge in user.badges() {
            println!(
                "  {} - {} ({})",
                badge.badge_type.title(),
                badge.badge_type.description(),
                badge.earned_at.format("%Y-%m-%d")
            );
        }
    }
}

fn print_summary(summary: &CompletionSummary, user: &User) {
    let duration = user
        .workouts()
        .iter()
        .rev()
        .find(|w| w.id == summary.workout_id)
        .map(|w| w.total_duration)
        .unwrap_or(0.0);

    println!(
        "Workout logged ({}): +{} XP",
        format_elapsed(duration),
        summary.experience_gained
    );
    if summary.user_leveled_up() {
        println!("Trainer level up! Now level {}.", summary.user_level);
    }
    if let Some(outcome) = &summary.companion {
        if outcome.levels_gained > 0 {
            println!(
                "Companion reached level {} (+{} levels).",
                outcome.new_level, outcome.levels_gained
            );
        }
        if let Some(form) = &outcome.evolved_into {
            println!("Your companion evolved into {}!", form);
        }
    }
    for badge in &summary.badges_earned {
        print_badge(*badge);
    }
}

fn print_badge(badge: BadgeType) {
    println!("Badge earned: {} - {}", badge.title(), badge.description());
}
