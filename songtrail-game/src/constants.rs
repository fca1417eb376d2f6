//! Centralized balance and tuning constants for Songtrail game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_SESSION_START: &str = "log.session.start";
pub(crate) const LOG_SESSION_WON: &str = "log.session.won";
pub(crate) const LOG_SESSION_LOST: &str = "log.session.lost";
pub(crate) const LOG_FEATURE_SPOTTED: &str = "log.feature.spotted";
pub(crate) const LOG_INTERACTION_START: &str = "log.interaction.start";
pub(crate) const LOG_INTERACTION_COMPLETE: &str = "log.interaction.complete";
pub(crate) const LOG_INTERACTION_TIMEOUT: &str = "log.interaction.timeout";
pub(crate) const LOG_INTERACTION_CANCEL: &str = "log.interaction.cancel";
pub(crate) const LOG_READING_CREDIT: &str = "log.reading.credit";
pub(crate) const LOG_HISTORY_SAVE_FAILED: &str = "log.history.save-failed";

/// Upper bound on the in-session log ledger; older keys are dropped.
pub(crate) const MAX_SESSION_LOGS: usize = 64;

// Physics tuning -----------------------------------------------------------
pub(crate) const MIN_SPEED_MPH: f32 = 0.0;
pub(crate) const MAX_SPEED_MPH: f32 = 80.0;
pub(crate) const ACCELERATION_MPH_PER_SEC: f32 = 15.0;
pub(crate) const FRICTION_MPH_PER_SEC: f32 = 5.0;
pub(crate) const SECONDS_PER_HOUR: f32 = 3600.0;

/// Tick deltas above this are clamped before integration so a stalled
/// driver cannot produce a large-step jump through the route.
pub(crate) const MAX_TICK_SECONDS: f64 = 1.0;

// Speed tier boundaries (mph, inclusive upper edge of each tier) -----------
pub(crate) const TIER_CRAWLING_MAX_MPH: f32 = 15.0;
pub(crate) const TIER_MODERATE_MAX_MPH: f32 = 35.0;
pub(crate) const TIER_FAST_MAX_MPH: f32 = 55.0;

// Scoring multipliers per tier; descending by design ----------------------
pub(crate) const TIER_CRAWLING_MULTIPLIER: f32 = 1.0;
pub(crate) const TIER_MODERATE_MULTIPLIER: f32 = 0.75;
pub(crate) const TIER_FAST_MULTIPLIER: f32 = 0.5;
pub(crate) const TIER_RACING_MULTIPLIER: f32 = 0.25;

// Interaction deadline scaling per tier ------------------------------------
pub(crate) const TIER_CRAWLING_TIME_SCALE: f32 = 1.0;
pub(crate) const TIER_MODERATE_TIME_SCALE: f32 = 0.8;
pub(crate) const TIER_FAST_TIME_SCALE: f32 = 0.6;
pub(crate) const TIER_RACING_TIME_SCALE: f32 = 0.4;

// Interaction tuning -------------------------------------------------------
pub(crate) const CLICK_BASE_SECONDS: f32 = 0.5;
pub(crate) const HOLD_BASE_SECONDS: f32 = 3.0;
pub(crate) const SEQUENCE_BASE_SECONDS: f32 = 5.0;
pub(crate) const TRACE_BASE_SECONDS: f32 = 4.0;

/// Player-to-feature distance within which an interaction may start.
pub(crate) const FEATURE_INTERACTION_RANGE_MILES: f32 = 0.5;

/// Mean nearest-point distance at which a traced path scores zero.
pub(crate) const TRACE_TOLERANCE: f32 = 40.0;

// Dwell reading tuning -----------------------------------------------------
pub(crate) const DWELL_POINTS_PER_SECOND: f64 = 10.0;
pub(crate) const DWELL_MIN_MULTIPLIER: f32 = 0.5;

// Feature base values ------------------------------------------------------
pub(crate) const SACRED_SITE_BASE_POINTS: i32 = 100;
pub(crate) const ANIMAL_TRACKS_BASE_POINTS: i32 = 60;
pub(crate) const PLANT_SIGNS_BASE_POINTS: i32 = 40;
pub(crate) const GEOLOGICAL_BASE_POINTS: i32 = 80;

// Feature generation tuning ------------------------------------------------
pub(crate) const FEATURES_PER_MILE_MIN: f32 = 2.0;
pub(crate) const FEATURES_PER_MILE_MAX: f32 = 6.0;
pub(crate) const CLUSTER_FRACTION: f32 = 0.3;
pub(crate) const CLUSTER_SIZE_MIN: u32 = 2;
pub(crate) const CLUSTER_SIZE_MAX: u32 = 4;
pub(crate) const CLUSTER_SPREAD_MILES: f32 = 0.5;
pub(crate) const CLUSTER_EDGE_MARGIN_MILES: f32 = 1.0;
pub(crate) const SCATTER_EDGE_MARGIN_MILES: f32 = 0.5;
pub(crate) const POSITION_CLAMP_MARGIN_MILES: f32 = 0.1;
/// Degenerate routes still receive at least this many scattered features.
pub(crate) const MIN_SCATTERED_FEATURES: usize = 2;
pub(crate) const FEATURE_SIZE_MIN: f32 = 24.0;
pub(crate) const FEATURE_SIZE_MAX: f32 = 40.0;

// Viewport window over the route (miles relative to the vehicle) -----------
pub(crate) const VIEW_BEHIND_MILES: f32 = 0.5;
pub(crate) const VIEW_AHEAD_MILES: f32 = 3.5;

// History tuning -----------------------------------------------------------
pub(crate) const HISTORY_VERSION: u32 = 1;
pub(crate) const MAX_STORED_GAMES: usize = 100;
pub(crate) const RECENT_WINDOW: usize = 10;
pub(crate) const TREND_MIN_GAMES: usize = 5;
pub(crate) const TREND_THRESHOLD: f64 = 0.10;

// Achievement thresholds ---------------------------------------------------
pub(crate) const ACHIEVEMENT_SPEED_DEMON_MPH: f32 = 70.0;
pub(crate) const ACHIEVEMENT_SLOW_WIN_MPH: f32 = 20.0;
pub(crate) const ACHIEVEMENT_MARATHON_MINUTES: f64 = 60.0;
pub(crate) const ACHIEVEMENT_DEDICATED_GAMES: u32 = 50;
pub(crate) const ACHIEVEMENT_EXPERT_WINS: u32 = 20;
pub(crate) const ACHIEVEMENT_MASTER_WIN_RATE: f64 = 0.8;
pub(crate) const ACHIEVEMENT_MASTER_MIN_GAMES: u32 = 10;
pub(crate) const ACHIEVEMENT_CONSISTENT_WIN_RATE: f64 = 0.7;
pub(crate) const ACHIEVEMENT_OBSERVANT_COMPLETIONS: u32 = 100;
pub(crate) const ACHIEVEMENT_STORYTELLER_RATE: f64 = 0.8;
