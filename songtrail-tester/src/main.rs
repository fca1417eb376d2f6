//! Headless balance harness: drives seeded sessions with scripted throttle
//! policies and reports aggregate outcomes, so tuning changes can be judged
//! without a browser in the loop.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;

use songtrail_game::{
    CompletionReason, GameEngine, GameSession, MemoryStore, SessionStatus, format_points,
    format_time, history_report,
};

const TICK_SECONDS: f64 = 0.1;
/// Hard ceiling on simulated ticks per run; a route clock always expires
/// well before this.
const MAX_TICKS: u32 = 20_000;

/// Scripted throttle policy for a simulated player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Accelerate every tick; never stop for features.
    FullThrottle,
    /// Hold a mid-tier cruise and complete every feature in reach.
    Cruise,
    /// Crawl and complete every feature in reach.
    StopAndRead,
}

impl Policy {
    const fn label(self) -> &'static str {
        match self {
            Self::FullThrottle => "full-throttle",
            Self::Cruise => "cruise",
            Self::StopAndRead => "stop-and-read",
        }
    }

    fn accelerating(self, session: &GameSession) -> bool {
        match self {
            Self::FullThrottle => true,
            Self::Cruise => session.speed < 30.0,
            Self::StopAndRead => session.speed < 10.0,
        }
    }

    const fn engages_features(self) -> bool {
        !matches!(self, Self::FullThrottle)
    }
}

#[derive(Debug, Parser)]
#[command(name = "songtrail-tester", version = "0.1.0")]
#[command(about = "Headless balance runs for the Songtrail game engine")]
struct Args {
    /// Route to drive
    #[arg(long, default_value = "desert-crossing")]
    route: String,

    /// Throttle policy for the simulated player
    #[arg(long, value_enum, default_value_t = Policy::Cruise)]
    policy: Policy,

    /// Number of sessions to simulate
    #[arg(long, default_value_t = 100)]
    runs: u32,

    /// Base generation seed; run N uses seed + N
    #[arg(long, default_value_t = 1337)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let engine = GameEngine::new(MemoryStore::new());
    engine
        .catalog()
        .get(&args.route)
        .with_context(|| format!("route '{}' is not in the catalog", args.route))?;

    log::info!(
        "driving {} runs of {} with policy {}",
        args.runs,
        args.route,
        args.policy.label()
    );

    for run in 0..args.runs {
        let session = drive_session(&engine, &args, args.seed + u64::from(run))?;
        log::debug!(
            "run {} finished {} at {}",
            run,
            session.status,
            format_time(session.elapsed)
        );
    }

    report(&engine, &args);
    Ok(())
}

fn drive_session(
    engine: &GameEngine<MemoryStore>,
    args: &Args,
    seed: u64,
) -> Result<GameSession> {
    let now_ms = Utc::now().timestamp_millis();
    let mut session = engine
        .start_session(&args.route, Some(seed), now_ms)
        .context("session start failed")?;

    for _ in 0..MAX_TICKS {
        if session.status != SessionStatus::Playing {
            break;
        }
        let accelerating = args.policy.accelerating(&session);
        engine.tick(&mut session, TICK_SECONDS, accelerating);

        if args.policy.engages_features() && session.interaction.is_none() {
            let target = session
                .route
                .features
                .iter()
                .find(|f| f.interactable())
                .map(|f| f.id.clone());
            if let Some(id) = target {
                session.start_interaction(&id);
                session.update_interaction(1.0);
                session.complete_interaction();
            }
        }
    }

    if session.status == SessionStatus::Playing {
        engine.finish(&mut session, CompletionReason::TimeUp);
    }
    Ok(session)
}

fn report(engine: &GameEngine<MemoryStore>, args: &Args) {
    let games = engine.load_history().unwrap_or_default();
    let report = history_report(&games);
    let stats = &report.stats;

    println!();
    println!(
        "{} {} × {} ({})",
        "songtrail balance run".bold(),
        args.runs,
        args.route,
        args.policy.label()
    );
    println!(
        "  wins {} / {}  ({:.1}%)",
        stats.total_wins.to_string().green(),
        stats.total_games,
        stats.win_rate * 100.0
    );
    println!(
        "  score avg {}  best {}",
        format_points(songtrail_game::numbers::round_f64_to_i32(
            stats.average_score
        )),
        format_points(stats.best_score).yellow()
    );
    println!(
        "  features {}/{} completed ({:.1}%)",
        stats.features_completed,
        stats.features_found,
        stats.completion_rate * 100.0
    );
    println!(
        "  speed avg {:.1} mph  top {:.1} mph",
        stats.average_speed, stats.highest_speed
    );
    if let Some(route) = report.route_stats.get(&args.route) {
        let verdict = if route.win_rate > 0.0 {
            "playable".green()
        } else {
            "unwinnable under this policy".red()
        };
        println!("  verdict: {verdict}");
    }
}
