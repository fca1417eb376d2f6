//! Songtrail Game Engine
//!
//! Platform-agnostic core game logic for Songtrail, an arcade driving game
//! about trading travel speed against the stories read from the landscape.
//! This crate provides all game mechanics without UI or platform-specific
//! dependencies: the shell ticks the session, forwards input, renders the
//! read-only state, and supplies persistence.

pub mod constants;
pub mod feature;
pub mod format;
pub mod generate;
pub mod history;
pub mod interaction;
pub mod numbers;
pub mod physics;
pub mod result;
pub mod rng;
pub mod route;
pub mod scoring;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use feature::{FeatureKind, FeatureVisual, InteractionKind, LandscapeFeature};
pub use format::{format_distance, format_points, format_speed, format_time};
pub use generate::{build_route, generate_features, validate_features};
pub use history::{
    Achievements, GameStats, HistoryReport, RouteStats, Trend, achievements, game_stats,
    history_report, improvement_trend, route_stats,
};
pub use interaction::{
    Interaction, InteractionPayload, PathPoint, SequenceStep, Symbol, SymbolSeq, path_similarity,
};
pub use physics::{SpeedTier, advance_position, tier_for_speed, update_speed};
pub use result::{CompletionReason, GameResult};
pub use rng::{RngBundle, weighted_index};
pub use route::{Route, RouteCatalog, RouteError, RouteTemplate, Terrain, UnlockRule};
pub use scoring::{dwell_points, feature_points, interaction_deadline};
pub use session::{GameSession, ReadingState, SessionStatus, Viewport};
pub use store::{MemoryStore, StorageInfo, StoredHistory, decode_history, encode_history};

/// Trait for abstracting the history persistence collaborator.
/// Platform-specific implementations should provide this.
pub trait HistoryStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append one finished-session record to the bounded history log.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted. The engine treats
    /// this as fire-and-forget; terminal session state stands regardless.
    fn save(&self, result: &GameResult) -> Result<(), Self::Error>;

    /// Load every stored record, newest first, capped at the store limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read. Corrupt
    /// payloads are an empty history, not an error.
    fn load_all(&self) -> Result<Vec<GameResult>, Self::Error>;

    /// Drop all stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the removal.
    fn clear(&self) -> Result<(), Self::Error>;
}

/// Main engine facade: route catalog plus the persistence collaborator.
pub struct GameEngine<S>
where
    S: HistoryStore,
{
    catalog: RouteCatalog,
    store: S,
}

impl<S> GameEngine<S>
where
    S: HistoryStore,
{
    /// Create an engine over the built-in route catalog.
    pub fn new(store: S) -> Self {
        Self {
            catalog: RouteCatalog::builtin(),
            store,
        }
    }

    /// Create an engine over an explicit catalog (fixtures, mods).
    pub const fn with_catalog(catalog: RouteCatalog, store: S) -> Self {
        Self { catalog, store }
    }

    /// Borrow the route catalog.
    #[must_use]
    pub const fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    /// Start a session on a catalog route. `seed` pins generation for
    /// reproducible sessions; `None` draws from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownRoute`] when the id is not cataloged.
    pub fn start_session(
        &self,
        route_id: &str,
        seed: Option<u64>,
        now_ms: i64,
    ) -> Result<GameSession, RouteError> {
        let template = self.catalog.get(route_id)?;
        let rng = seed.map_or_else(RngBundle::from_entropy, RngBundle::from_user_seed);
        Ok(GameSession::new(build_route(template, &rng), now_ms))
    }

    /// Tick a session and persist its result if this tick finished it.
    /// Persistence failure is logged into the session and otherwise
    /// ignored; the terminal state stands.
    pub fn tick(
        &self,
        session: &mut GameSession,
        dt_seconds: f64,
        accelerating: bool,
    ) -> Option<GameResult> {
        session.update(dt_seconds, accelerating);
        self.flush_result(session)
    }

    /// End a session explicitly (quit-to-results) and persist the record.
    pub fn finish(&self, session: &mut GameSession, reason: CompletionReason) -> Option<GameResult> {
        session.end(reason);
        self.flush_result(session)
    }

    /// Full history, newest first. Store failures surface to the caller;
    /// corrupt payloads arrive as an empty list from the store layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    pub fn load_history(&self) -> Result<Vec<GameResult>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        self.store.load_all().map_err(Into::into)
    }

    /// History report for the stats screen. An unreadable store is treated
    /// as an empty history, never an error.
    #[must_use]
    pub fn history_report(&self) -> HistoryReport {
        let games = self.store.load_all().unwrap_or_default();
        history_report(&games)
    }

    /// Drop all stored history.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the removal.
    pub fn clear_history(&self) -> Result<(), S::Error> {
        self.store.clear()
    }

    fn flush_result(&self, session: &mut GameSession) -> Option<GameResult> {
        let result = session.take_result()?;
        if self.store.save(&result).is_err() {
            session
                .logs
                .push_back(constants::LOG_HISTORY_SAVE_FAILED.to_string());
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fmt;

    #[derive(Debug)]
    struct RejectedWrite;

    impl fmt::Display for RejectedWrite {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("write rejected")
        }
    }

    impl std::error::Error for RejectedWrite {}

    /// Store that always refuses writes, for the fire-and-forget contract.
    #[derive(Default)]
    struct BrokenStore {
        attempts: Cell<u32>,
    }

    impl HistoryStore for BrokenStore {
        type Error = RejectedWrite;

        fn save(&self, _result: &GameResult) -> Result<(), Self::Error> {
            self.attempts.set(self.attempts.get() + 1);
            Err(RejectedWrite)
        }

        fn load_all(&self) -> Result<Vec<GameResult>, Self::Error> {
            Err(RejectedWrite)
        }

        fn clear(&self) -> Result<(), Self::Error> {
            Err(RejectedWrite)
        }
    }

    #[test]
    fn engine_starts_sessions_from_catalog() {
        let engine = GameEngine::new(MemoryStore::new());
        let session = engine
            .start_session("desert-crossing", Some(11), 1_700_000_000_000)
            .unwrap();
        assert_eq!(session.status, SessionStatus::Playing);
        assert!(!session.route.features.is_empty());
        assert!(validate_features(
            &session.route.features,
            session.route.distance
        ));
        assert!(engine.start_session("nullarbor", Some(11), 0).is_err());
    }

    #[test]
    fn finished_sessions_land_in_history() {
        let engine = GameEngine::new(MemoryStore::new());
        let mut session = engine.start_session("desert-crossing", Some(3), 42).unwrap();
        let result = engine
            .finish(&mut session, CompletionReason::TimeUp)
            .expect("result on finish");
        assert!(!result.won);

        let games = engine.load_history().unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, result.id);
        let report = engine.history_report();
        assert_eq!(report.stats.total_games, 1);

        engine.clear_history().unwrap();
        assert!(engine.load_history().unwrap().is_empty());
    }

    #[test]
    fn persistence_failure_leaves_terminal_state_intact() {
        let engine = GameEngine::with_catalog(RouteCatalog::builtin(), BrokenStore::default());
        let mut session = engine.start_session("desert-crossing", Some(3), 42).unwrap();
        let result = engine.finish(&mut session, CompletionReason::TimeUp);
        assert!(result.is_some());
        assert_eq!(session.status, SessionStatus::Lost);
        assert!(
            session
                .logs
                .contains(&constants::LOG_HISTORY_SAVE_FAILED.to_string())
        );
        // Save attempted exactly once; no retry from the engine.
        assert_eq!(engine.store.attempts.get(), 1);
        // An unreadable store reads as an empty history.
        assert_eq!(engine.history_report().stats.total_games, 0);
    }
}
