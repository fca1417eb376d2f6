//! Immutable end-of-session records.

use serde::{Deserialize, Serialize};
use std::fmt;
use twox_hash::XxHash64;

const RESULT_ID_SEED: u64 = 0x5254_4C53;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionReason {
    /// Reached the destination with the target met.
    Success,
    /// The clock ran out short of the destination.
    TimeUp,
    /// Reached the destination, but below the point target.
    InsufficientPoints,
}

impl CompletionReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::TimeUp => "time-up",
            Self::InsufficientPoints => "insufficient-points",
        }
    }

    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one finished session, appended to the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub id: String,
    /// Wall-clock milliseconds at session start, supplied by the shell.
    pub timestamp_ms: i64,
    pub route_id: String,
    pub route_name: String,
    pub final_score: i32,
    pub target_score: i32,
    pub won: bool,
    pub reason: CompletionReason,
    /// Simulated play time in seconds.
    pub duration_seconds: f64,
    pub average_speed: f32,
    pub top_speed: f32,
    pub features_found: u32,
    pub features_completed: u32,
    pub completion_rate: f64,
    pub distance_covered: f32,
    pub time_remaining: f64,
}

/// Collision-resistant record id from the session identity.
#[must_use]
pub(crate) fn result_id(route_id: &str, timestamp_ms: i64, final_score: i32) -> String {
    let mut bytes = Vec::with_capacity(route_id.len() + 12);
    bytes.extend_from_slice(route_id.as_bytes());
    bytes.extend_from_slice(&timestamp_ms.to_le_bytes());
    bytes.extend_from_slice(&final_score.to_le_bytes());
    format!("run-{:016x}", XxHash64::oneshot(RESULT_ID_SEED, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_strings_match_wire_format() {
        assert_eq!(CompletionReason::Success.as_str(), "success");
        assert_eq!(CompletionReason::TimeUp.as_str(), "time-up");
        assert_eq!(
            serde_json::to_string(&CompletionReason::InsufficientPoints).unwrap(),
            "\"insufficient-points\""
        );
        assert!(CompletionReason::Success.is_win());
        assert!(!CompletionReason::TimeUp.is_win());
    }

    #[test]
    fn result_ids_are_stable_and_distinct() {
        let a = result_id("desert-crossing", 1_700_000_000_000, 850);
        let b = result_id("desert-crossing", 1_700_000_000_000, 850);
        let c = result_id("desert-crossing", 1_700_000_000_001, 850);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("run-"));
    }
}
