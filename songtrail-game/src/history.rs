//! Post-game statistics over the persisted result log.
//!
//! Every function here is a pure fold over a newest-first record slice; no
//! session state is held. An empty slice produces all-zero statistics and
//! a `Stable` trend, never an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{
    ACHIEVEMENT_CONSISTENT_WIN_RATE, ACHIEVEMENT_DEDICATED_GAMES, ACHIEVEMENT_EXPERT_WINS,
    ACHIEVEMENT_MARATHON_MINUTES, ACHIEVEMENT_MASTER_MIN_GAMES, ACHIEVEMENT_MASTER_WIN_RATE,
    ACHIEVEMENT_OBSERVANT_COMPLETIONS, ACHIEVEMENT_SLOW_WIN_MPH, ACHIEVEMENT_SPEED_DEMON_MPH,
    ACHIEVEMENT_STORYTELLER_RATE, RECENT_WINDOW, TREND_MIN_GAMES, TREND_THRESHOLD,
};
use crate::numbers::{safe_ratio, usize_to_f64};
use crate::result::GameResult;

/// Direction of recent score movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    #[default]
    Stable,
}

impl Trend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate statistics across every stored game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameStats {
    pub total_games: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub win_rate: f64,
    pub best_score: i32,
    pub best_score_route: String,
    pub average_score: f64,
    /// Total simulated play time in minutes.
    pub total_play_minutes: f64,
    pub features_found: u32,
    pub features_completed: u32,
    pub completion_rate: f64,
    pub highest_speed: f32,
    pub average_speed: f32,
    pub recent_win_rate: f64,
    pub recent_average_score: f64,
    pub routes_played: Vec<String>,
    pub routes_won: Vec<String>,
}

/// Per-route rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStats {
    pub route_id: String,
    pub route_name: String,
    pub times_played: u32,
    pub times_won: u32,
    pub win_rate: f64,
    pub best_score: i32,
    pub best_time_seconds: f64,
    pub best_completion_rate: f64,
    pub average_score: f64,
    pub average_speed: f32,
    pub average_completion_rate: f64,
    pub first_played_ms: i64,
    pub last_played_ms: i64,
}

/// Everything the history screen needs, in one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HistoryReport {
    pub stats: GameStats,
    pub route_stats: BTreeMap<String, RouteStats>,
    pub trend: Trend,
}

/// Pure achievements derivation; every flag is recomputable from records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Achievements {
    pub first_win: bool,
    pub perfect_run: bool,
    pub speed_demon: bool,
    pub slow_and_steady: bool,
    pub marathoner: bool,
    pub dedicated: bool,
    pub expert: bool,
    pub master: bool,
    pub consistent: bool,
    pub improving: bool,
    pub observant: bool,
    pub storyteller: bool,
}

impl Achievements {
    #[must_use]
    pub const fn unlocked_count(self) -> u32 {
        self.first_win as u32
            + self.perfect_run as u32
            + self.speed_demon as u32
            + self.slow_and_steady as u32
            + self.marathoner as u32
            + self.dedicated as u32
            + self.expert as u32
            + self.master as u32
            + self.consistent as u32
            + self.improving as u32
            + self.observant as u32
            + self.storyteller as u32
    }

    #[must_use]
    pub const fn total_count() -> u32 {
        12
    }
}

/// Fold overall statistics from a newest-first record slice.
#[must_use]
pub fn game_stats(games: &[GameResult]) -> GameStats {
    if games.is_empty() {
        return GameStats::default();
    }

    let total_games = games.len() as u32;
    let total_wins = games.iter().filter(|g| g.won).count() as u32;
    let score_sum: i64 = games.iter().map(|g| i64::from(g.final_score)).sum();
    let best = games
        .iter()
        .max_by_key(|g| g.final_score)
        .expect("non-empty games");

    let features_found: u32 = games.iter().map(|g| g.features_found).sum();
    let features_completed: u32 = games.iter().map(|g| g.features_completed).sum();
    let speed_sum: f64 = games.iter().map(|g| f64::from(g.average_speed)).sum();

    let recent = &games[..games.len().min(RECENT_WINDOW)];
    let recent_wins = recent.iter().filter(|g| g.won).count() as u32;

    let mut routes_played: Vec<String> = Vec::new();
    let mut routes_won: Vec<String> = Vec::new();
    for game in games {
        if !routes_played.contains(&game.route_id) {
            routes_played.push(game.route_id.clone());
        }
        if game.won && !routes_won.contains(&game.route_id) {
            routes_won.push(game.route_id.clone());
        }
    }

    GameStats {
        total_games,
        total_wins,
        total_losses: total_games - total_wins,
        win_rate: safe_ratio(total_wins, total_games),
        best_score: best.final_score,
        best_score_route: best.route_id.clone(),
        average_score: score_sum as f64 / f64::from(total_games),
        total_play_minutes: games.iter().map(|g| g.duration_seconds).sum::<f64>() / 60.0,
        features_found,
        features_completed,
        completion_rate: safe_ratio(features_completed, features_found),
        highest_speed: games.iter().map(|g| g.top_speed).fold(0.0, f32::max),
        average_speed: (speed_sum / f64::from(total_games)) as f32,
        recent_win_rate: safe_ratio(recent_wins, recent.len() as u32),
        recent_average_score: mean_score(recent),
        routes_played,
        routes_won,
    }
}

/// Fold per-route rollups from a newest-first record slice.
#[must_use]
pub fn route_stats(games: &[GameResult]) -> BTreeMap<String, RouteStats> {
    let mut map: BTreeMap<String, RouteStats> = BTreeMap::new();
    for game in games {
        let entry = map
            .entry(game.route_id.clone())
            .or_insert_with(|| RouteStats {
                route_id: game.route_id.clone(),
                route_name: game.route_name.clone(),
                times_played: 0,
                times_won: 0,
                win_rate: 0.0,
                best_score: 0,
                best_time_seconds: 0.0,
                best_completion_rate: 0.0,
                average_score: 0.0,
                average_speed: 0.0,
                average_completion_rate: 0.0,
                first_played_ms: game.timestamp_ms,
                last_played_ms: game.timestamp_ms,
            });
        entry.times_played += 1;
        if game.won {
            entry.times_won += 1;
        }
        entry.best_score = entry.best_score.max(game.final_score);
        entry.best_time_seconds = entry.best_time_seconds.max(game.duration_seconds);
        entry.best_completion_rate = entry.best_completion_rate.max(game.completion_rate);
        entry.first_played_ms = entry.first_played_ms.min(game.timestamp_ms);
        entry.last_played_ms = entry.last_played_ms.max(game.timestamp_ms);
    }

    for stats in map.values_mut() {
        let route_games: Vec<&GameResult> = games
            .iter()
            .filter(|g| g.route_id == stats.route_id)
            .collect();
        let count = usize_to_f64(route_games.len());
        stats.win_rate = safe_ratio(stats.times_won, stats.times_played);
        stats.average_score = route_games
            .iter()
            .map(|g| f64::from(g.final_score))
            .sum::<f64>()
            / count;
        stats.average_speed = (route_games
            .iter()
            .map(|g| f64::from(g.average_speed))
            .sum::<f64>()
            / count) as f32;
        stats.average_completion_rate =
            route_games.iter().map(|g| g.completion_rate).sum::<f64>() / count;
    }
    map
}

/// Compare the last ten games against the ten before them. Windows with
/// fewer than five games force `Stable`.
#[must_use]
pub fn improvement_trend(games: &[GameResult]) -> Trend {
    let recent = &games[..games.len().min(RECENT_WINDOW)];
    let older_end = games.len().min(RECENT_WINDOW * 2);
    let older = &games[games.len().min(RECENT_WINDOW)..older_end];

    if recent.len() < TREND_MIN_GAMES || older.len() < TREND_MIN_GAMES {
        return Trend::Stable;
    }
    let older_mean = mean_score(older);
    if older_mean <= 0.0 {
        return Trend::Stable;
    }
    let improvement = (mean_score(recent) - older_mean) / older_mean;
    if improvement > TREND_THRESHOLD {
        Trend::Improving
    } else if improvement < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Assemble the full history screen report.
#[must_use]
pub fn history_report(games: &[GameResult]) -> HistoryReport {
    HistoryReport {
        stats: game_stats(games),
        route_stats: route_stats(games),
        trend: improvement_trend(games),
    }
}

/// Derive achievement flags from records and their fold.
#[must_use]
pub fn achievements(games: &[GameResult]) -> Achievements {
    let stats = game_stats(games);
    Achievements {
        first_win: stats.total_wins >= 1,
        perfect_run: games.iter().any(|g| g.completion_rate >= 1.0),
        speed_demon: stats.highest_speed >= ACHIEVEMENT_SPEED_DEMON_MPH,
        slow_and_steady: games
            .iter()
            .any(|g| g.won && g.average_speed <= ACHIEVEMENT_SLOW_WIN_MPH),
        marathoner: stats.total_play_minutes >= ACHIEVEMENT_MARATHON_MINUTES,
        dedicated: stats.total_games >= ACHIEVEMENT_DEDICATED_GAMES,
        expert: stats.total_wins >= ACHIEVEMENT_EXPERT_WINS,
        master: stats.win_rate >= ACHIEVEMENT_MASTER_WIN_RATE
            && stats.total_games >= ACHIEVEMENT_MASTER_MIN_GAMES,
        consistent: stats.recent_win_rate >= ACHIEVEMENT_CONSISTENT_WIN_RATE
            && stats.total_games >= RECENT_WINDOW as u32,
        improving: improvement_trend(games) == Trend::Improving,
        observant: stats.features_completed >= ACHIEVEMENT_OBSERVANT_COMPLETIONS,
        storyteller: stats.completion_rate >= ACHIEVEMENT_STORYTELLER_RATE
            && stats.features_found > 0,
    }
}

fn mean_score(games: &[GameResult]) -> f64 {
    if games.is_empty() {
        return 0.0;
    }
    games.iter().map(|g| f64::from(g.final_score)).sum::<f64>() / usize_to_f64(games.len())
}
