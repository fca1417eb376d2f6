//! Session state machine.
//!
//! One `GameSession` owns every mutable field of a playthrough behind a
//! narrow mutation API. The driving shell ticks it, feeds it input, and
//! reads it; nothing else writes. Mutators called in a status that forbids
//! them are silently ignored, so a misbehaving shell cannot corrupt the
//! machine.
//!
//! Time is a simulated clock accumulated from tick deltas. The scheduler
//! stops ticking while paused, so the clock cannot drift; the wall-clock
//! start timestamp is carried only for the history record.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::constants::{
    FEATURE_INTERACTION_RANGE_MILES, LOG_FEATURE_SPOTTED, LOG_INTERACTION_CANCEL,
    LOG_INTERACTION_COMPLETE, LOG_INTERACTION_START, LOG_INTERACTION_TIMEOUT, LOG_READING_CREDIT,
    LOG_SESSION_LOST, LOG_SESSION_START, LOG_SESSION_WON, MAX_SESSION_LOGS, MAX_TICK_SECONDS,
    SECONDS_PER_HOUR, VIEW_AHEAD_MILES, VIEW_BEHIND_MILES,
};
use crate::feature::LandscapeFeature;
use crate::interaction::{Interaction, PathPoint, SequenceStep, Symbol};
use crate::numbers::safe_ratio;
use crate::physics::{SpeedTier, advance_position, tier_for_speed, update_speed};
use crate::result::{CompletionReason, GameResult, result_id};
use crate::route::{Route, Terrain};
use crate::scoring::{dwell_points, feature_points};

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Menu,
    Playing,
    Paused,
    Won,
    Lost,
}

impl SessionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    /// Terminal until an explicit reset.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visible window over the route, derived from the vehicle position.
/// Renderers cull the feature list against it; the simulation never does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Viewport {
    pub start: f32,
    pub end: f32,
}

impl Viewport {
    fn around(position: f32, distance: f32) -> Self {
        let start = (position - VIEW_BEHIND_MILES).max(0.0);
        let end = (position + VIEW_AHEAD_MILES).min(distance.max(0.0));
        Self {
            start,
            end: end.max(start),
        }
    }

    #[must_use]
    pub fn contains(&self, position: f32) -> bool {
        position >= self.start && position <= self.end
    }
}

/// Open dwell-reading stretch against one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingState {
    pub feature_id: String,
    /// Session-clock second at which reading began.
    pub started_at: f64,
}

/// The mutable root of one playthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub status: SessionStatus,
    pub route: Route,
    /// Simulated seconds since the session started.
    pub elapsed: f64,
    /// Miles along the route.
    pub position: f32,
    /// Current speed in mph.
    pub speed: f32,
    pub points: i32,
    pub target_points: i32,
    /// Wall-clock milliseconds at start, supplied by the shell.
    pub started_at_ms: i64,
    pub interaction: Option<Interaction>,
    pub reading: Option<ReadingState>,
    pub viewport: Viewport,
    pub top_speed: f32,
    /// Bounded ledger of log keys for the shell to render.
    pub logs: VecDeque<String>,
    #[serde(skip)]
    last_result: Option<GameResult>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::idle()
    }
}

impl GameSession {
    /// A menu-state session with no route loaded.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            status: SessionStatus::Menu,
            route: empty_route(),
            elapsed: 0.0,
            position: 0.0,
            speed: 0.0,
            points: 0,
            target_points: 0,
            started_at_ms: 0,
            interaction: None,
            reading: None,
            viewport: Viewport::default(),
            top_speed: 0.0,
            logs: VecDeque::new(),
            last_result: None,
        }
    }

    /// Start a fresh playthrough of an instantiated route.
    #[must_use]
    pub fn new(route: Route, now_ms: i64) -> Self {
        let mut session = Self::idle();
        session.initialize(route, now_ms);
        session
    }

    /// `menu → playing`: adopt the route, zero the clocks and counters.
    /// Ignored outside the menu; reset first to restart.
    pub fn initialize(&mut self, route: Route, now_ms: i64) {
        if self.status != SessionStatus::Menu {
            return;
        }
        self.target_points = route.target_points;
        self.viewport = Viewport::around(0.0, route.distance);
        self.route = route;
        self.elapsed = 0.0;
        self.position = 0.0;
        self.speed = 0.0;
        self.points = 0;
        self.started_at_ms = now_ms;
        self.interaction = None;
        self.reading = None;
        self.top_speed = 0.0;
        self.last_result = None;
        self.status = SessionStatus::Playing;
        self.push_log(LOG_SESSION_START);
    }

    /// Advance the simulation by one tick. No-op unless `playing`.
    pub fn update(&mut self, dt_seconds: f64, accelerating: bool) {
        if self.status != SessionStatus::Playing {
            return;
        }
        let dt = if dt_seconds.is_finite() {
            dt_seconds.clamp(0.0, MAX_TICK_SECONDS)
        } else {
            0.0
        };
        let dt32 = dt as f32;

        self.speed = update_speed(self.speed, accelerating, dt32);
        self.position = advance_position(self.position, self.speed, dt32);
        self.top_speed = self.top_speed.max(self.speed);
        self.elapsed += dt;

        self.refresh_activation();

        // An interaction only exists while its feature is active and
        // uncompleted; driving out of range drops it without credit.
        let interaction_lapsed = self.interaction.as_ref().is_some_and(|i| {
            !self
                .route
                .features
                .iter()
                .any(|f| f.id == i.feature_id && f.interactable())
        });
        if interaction_lapsed {
            self.interaction = None;
            self.push_log(LOG_INTERACTION_CANCEL);
        }

        if self
            .interaction
            .as_ref()
            .is_some_and(|i| i.expired(self.elapsed))
        {
            // Timeout: no points, the feature stays available.
            self.interaction = None;
            self.push_log(LOG_INTERACTION_TIMEOUT);
        }

        self.viewport = Viewport::around(self.position, self.route.distance);
        self.evaluate_outcome();
    }

    /// Open the mini-game on an in-range feature. Rejected while another
    /// interaction is live, outside `playing`, or when the feature is
    /// missing, inactive, or already completed.
    pub fn start_interaction(&mut self, feature_id: &str) {
        if self.status != SessionStatus::Playing || self.interaction.is_some() {
            return;
        }
        let Some(feature) = self.route.features.iter().find(|f| f.id == feature_id) else {
            return;
        };
        if !feature.interactable() {
            return;
        }
        self.interaction = Some(Interaction::open(feature, self.speed, self.elapsed));
        self.push_log(LOG_INTERACTION_START);
    }

    /// Clamp and store progress on the live interaction.
    pub fn update_interaction(&mut self, progress: f32) {
        if self.status != SessionStatus::Playing {
            return;
        }
        if let Some(interaction) = &mut self.interaction {
            interaction.set_progress(progress);
        }
    }

    /// Feed a symbol into a live sequence puzzle; completion is automatic
    /// once the full sequence matches.
    pub fn enter_symbol(&mut self, symbol: Symbol) {
        if self.status != SessionStatus::Playing {
            return;
        }
        let Some(interaction) = &mut self.interaction else {
            return;
        };
        if interaction.enter_symbol(symbol) == SequenceStep::Finished {
            self.complete_interaction();
        }
    }

    /// Append a drawn point to a live trace puzzle.
    pub fn push_trace_point(&mut self, point: PathPoint) {
        if self.status != SessionStatus::Playing {
            return;
        }
        if let Some(interaction) = &mut self.interaction {
            interaction.push_trace_point(point);
        }
    }

    /// Award the live interaction and retire its feature.
    pub fn complete_interaction(&mut self) {
        if self.status != SessionStatus::Playing {
            return;
        }
        let Some(interaction) = &self.interaction else {
            return;
        };
        let feature_id = interaction.feature_id.clone();
        let speed = self.speed;
        let Some(feature) = self
            .route
            .features
            .iter_mut()
            .find(|f| f.id == feature_id)
        else {
            return;
        };
        let awarded = feature_points(feature.base_points, speed);
        feature.is_completed = true;
        feature.is_active = false;
        self.points += awarded;
        self.interaction = None;
        self.push_log(LOG_INTERACTION_COMPLETE);
    }

    /// Drop the live interaction, awarding nothing.
    pub fn cancel_interaction(&mut self) {
        if self.interaction.take().is_some() {
            self.push_log(LOG_INTERACTION_CANCEL);
        }
    }

    /// Begin a dwell-reading stretch against an active feature.
    pub fn start_reading(&mut self, feature_id: &str) {
        if self.status != SessionStatus::Playing || self.reading.is_some() {
            return;
        }
        let active = self
            .route
            .features
            .iter()
            .any(|f| f.id == feature_id && f.is_active);
        if !active {
            return;
        }
        self.reading = Some(ReadingState {
            feature_id: feature_id.to_string(),
            started_at: self.elapsed,
        });
    }

    /// Close the open reading stretch and credit its dwell points.
    pub fn stop_reading(&mut self) {
        let Some(reading) = self.reading.take() else {
            return;
        };
        let dwell = (self.elapsed - reading.started_at).max(0.0);
        let credit = dwell_points(dwell, self.speed);
        if credit > 0 {
            self.points += credit;
            self.push_log(LOG_READING_CREDIT);
        }
    }

    /// `playing → paused`; ignored in every other status.
    pub fn pause(&mut self) {
        if self.status == SessionStatus::Playing {
            self.status = SessionStatus::Paused;
        }
    }

    /// `paused → playing`; ignored in every other status.
    pub fn resume(&mut self) {
        if self.status == SessionStatus::Paused {
            self.status = SessionStatus::Playing;
        }
    }

    /// Freeze the session into a terminal state and snapshot its result.
    /// Pending dwell credit is flushed into the final score first.
    pub fn end(&mut self, reason: CompletionReason) {
        if !matches!(self.status, SessionStatus::Playing | SessionStatus::Paused) {
            return;
        }
        self.stop_reading();
        self.interaction = None;
        let result = self.snapshot_result(reason);
        self.status = if reason.is_win() {
            SessionStatus::Won
        } else {
            SessionStatus::Lost
        };
        self.push_log(if reason.is_win() {
            LOG_SESSION_WON
        } else {
            LOG_SESSION_LOST
        });
        self.last_result = Some(result);
    }

    /// Back to the menu, discarding all session state.
    pub fn reset(&mut self) {
        *self = Self::idle();
    }

    /// Take the result produced by the most recent `end`, if any.
    pub fn take_result(&mut self) -> Option<GameResult> {
        self.last_result.take()
    }

    /// Seconds left on the route clock.
    #[must_use]
    pub fn time_remaining(&self) -> f64 {
        (self.route.duration_seconds() - self.elapsed).max(0.0)
    }

    /// Route completion fraction in [0, 1].
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.route.distance <= 0.0 {
            return 0.0;
        }
        (self.position / self.route.distance).clamp(0.0, 1.0)
    }

    /// Current speed tier.
    #[must_use]
    pub fn speed_tier(&self) -> SpeedTier {
        tier_for_speed(self.speed)
    }

    /// Features inside the viewport window, for render culling.
    pub fn visible_features(&self) -> impl Iterator<Item = &LandscapeFeature> {
        self.route
            .features
            .iter()
            .filter(|f| self.viewport.contains(f.position))
    }

    fn refresh_activation(&mut self) {
        let position = self.position;
        let mut spotted = false;
        for feature in &mut self.route.features {
            let active =
                feature.in_range(position, FEATURE_INTERACTION_RANGE_MILES) && !feature.is_completed;
            if active && !feature.is_active {
                spotted = true;
            }
            feature.is_active = active;
        }
        if spotted {
            self.push_log(LOG_FEATURE_SPOTTED);
        }

        let reading_lapsed = self.reading.as_ref().is_some_and(|reading| {
            !self
                .route
                .features
                .iter()
                .any(|f| f.id == reading.feature_id && f.is_active)
        });
        if reading_lapsed {
            self.stop_reading();
        }
    }

    fn evaluate_outcome(&mut self) {
        let reached = self.position >= self.route.distance;
        let scored = self.points >= self.target_points;
        // Win is checked first so finishing exactly as the clock hits zero
        // still counts.
        if reached && scored {
            self.end(CompletionReason::Success);
            return;
        }
        if self.time_remaining() <= 0.0 {
            let reason = if reached {
                CompletionReason::InsufficientPoints
            } else {
                CompletionReason::TimeUp
            };
            self.end(reason);
        }
    }

    fn snapshot_result(&self, reason: CompletionReason) -> GameResult {
        let found = self
            .route
            .features
            .iter()
            .filter(|f| f.position - FEATURE_INTERACTION_RANGE_MILES <= self.position)
            .count() as u32;
        let completed = self
            .route
            .features
            .iter()
            .filter(|f| f.is_completed)
            .count() as u32;
        let average_speed = if self.elapsed > 0.0 {
            (f64::from(self.position) / self.elapsed * f64::from(SECONDS_PER_HOUR)) as f32
        } else {
            0.0
        };
        GameResult {
            id: result_id(&self.route.id, self.started_at_ms, self.points),
            timestamp_ms: self.started_at_ms,
            route_id: self.route.id.clone(),
            route_name: self.route.name.clone(),
            final_score: self.points,
            target_score: self.target_points,
            won: reason.is_win(),
            reason,
            duration_seconds: self.elapsed,
            average_speed,
            top_speed: self.top_speed,
            features_found: found,
            features_completed: completed,
            completion_rate: safe_ratio(completed, found),
            distance_covered: self.position.min(self.route.distance),
            time_remaining: self.time_remaining(),
        }
    }

    fn push_log(&mut self, key: &str) {
        if self.logs.len() >= MAX_SESSION_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(key.to_string());
    }
}

fn empty_route() -> Route {
    Route {
        id: String::new(),
        name: String::new(),
        description: String::new(),
        distance: 0.0,
        duration: 0.0,
        target_points: 0,
        terrain: Terrain::Desert,
        features: Vec::new(),
    }
}
