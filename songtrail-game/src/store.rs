//! Versioned history payload and the in-memory reference store.
//!
//! The engine talks to persistence through the [`HistoryStore`] trait in
//! the crate root; platform shells (browser storage, files) implement it.
//! This module owns the wire payload those shells share: a versioned JSON
//! blob with a migration path, a bounded newest-first record list, and a
//! decode that treats corrupt input as an empty history.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::convert::Infallible;

use crate::HistoryStore;
use crate::constants::{HISTORY_VERSION, MAX_STORED_GAMES};
use crate::result::GameResult;

/// Stored payload wrapping the record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredHistory {
    pub version: u32,
    pub games: Vec<GameResult>,
    /// Wall-clock milliseconds of the last write, supplied by the shell.
    #[serde(default)]
    pub saved_at_ms: i64,
}

impl Default for StoredHistory {
    fn default() -> Self {
        Self {
            version: HISTORY_VERSION,
            games: Vec::new(),
            saved_at_ms: 0,
        }
    }
}

impl StoredHistory {
    /// Prepend a result and trim the log to its cap.
    pub fn insert(&mut self, result: GameResult) {
        self.games.insert(0, result);
        self.games.truncate(MAX_STORED_GAMES);
    }

    /// Bring an older payload up to the current version.
    ///
    /// Version 1 is the only schema so far, so migration is identity plus
    /// a version stamp; the hook exists so a future bump has somewhere to
    /// live.
    #[must_use]
    pub fn migrate(mut self) -> Self {
        self.version = HISTORY_VERSION;
        self
    }
}

/// Encode a payload for storage.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized to JSON.
pub fn encode_history(history: &StoredHistory) -> Result<String, serde_json::Error> {
    serde_json::to_string(history)
}

/// Decode a stored payload, running migration on version mismatch.
/// Corrupt or unreadable input yields an empty history, never an error.
#[must_use]
pub fn decode_history(raw: &str) -> StoredHistory {
    match serde_json::from_str::<StoredHistory>(raw) {
        Ok(history) if history.version == HISTORY_VERSION => history,
        Ok(history) => history.migrate(),
        Err(_) => StoredHistory::default(),
    }
}

/// Shell-facing storage diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInfo {
    pub game_count: usize,
    pub estimated_bytes: usize,
}

/// Size and count estimate for a stored payload.
#[must_use]
pub fn storage_info(history: &StoredHistory) -> StorageInfo {
    StorageInfo {
        game_count: history.games.len(),
        estimated_bytes: encode_history(history).map_or(0, |encoded| encoded.len()),
    }
}

/// In-memory store for tests, the headless tester, and demo shells.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    history: RefCell<StoredHistory>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current payload.
    #[must_use]
    pub fn snapshot(&self) -> StoredHistory {
        self.history.borrow().clone()
    }
}

impl HistoryStore for MemoryStore {
    type Error = Infallible;

    fn save(&self, result: &GameResult) -> Result<(), Self::Error> {
        self.history.borrow_mut().insert(result.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<GameResult>, Self::Error> {
        Ok(self.history.borrow().games.clone())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        *self.history.borrow_mut() = StoredHistory::default();
        Ok(())
    }
}
