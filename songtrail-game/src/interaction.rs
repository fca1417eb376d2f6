//! Timed mini-games attached to landscape features.
//!
//! At most one interaction is live per session. Kind-specific data lives in
//! a tagged payload so a trace path can never appear on a click
//! interaction. Sequence targets and trace paths are derived from the
//! feature id, so a feature poses the same puzzle every time it is opened.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use twox_hash::XxHash64;

use crate::constants::TRACE_TOLERANCE;
use crate::feature::{InteractionKind, LandscapeFeature};
use crate::scoring::interaction_deadline;

const SEQUENCE_LEN: usize = 4;
const TRACE_TARGET_POINTS: usize = 5;
const PUZZLE_HASH_SEED: u64 = 0x534f_4e47;

/// Elements of the traditional sequence puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Fire,
    Water,
    Earth,
    Air,
}

impl Symbol {
    pub const ALL: [Self; SEQUENCE_LEN] = [Self::Fire, Self::Water, Self::Earth, Self::Air];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Earth => "earth",
            Self::Air => "air",
        }
    }

    /// Renderer glyph hint.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Fire => "🔥",
            Self::Water => "💧",
            Self::Earth => "🌍",
            Self::Air => "💨",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline storage for the four-symbol sequence puzzles.
pub type SymbolSeq = SmallVec<[Symbol; SEQUENCE_LEN]>;

/// A 2D point in the trace canvas coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f32,
    pub y: f32,
}

impl PathPoint {
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Kind-specific interaction data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InteractionPayload {
    Click,
    Hold,
    Sequence { target: SymbolSeq, entered: SymbolSeq },
    Trace { target: Vec<PathPoint>, drawn: Vec<PathPoint> },
}

/// Outcome of feeding one symbol into a sequence puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    /// Correct symbol; the prefix grew.
    Advanced,
    /// Wrong symbol; the entered prefix was reset.
    Rejected,
    /// The full sequence has been matched.
    Finished,
    /// The live interaction is not a sequence puzzle.
    Ignored,
}

/// The single live mini-game bound to one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub feature_id: String,
    pub kind: InteractionKind,
    /// Progress in [0, 1].
    pub progress: f32,
    /// Deadline in seconds, already compressed by the speed tier at start.
    pub time_limit: f32,
    /// Session-clock second at which the interaction opened.
    pub started_at: f64,
    pub payload: InteractionPayload,
}

impl Interaction {
    /// Open a mini-game on a feature at the current speed and session time.
    #[must_use]
    pub fn open(feature: &LandscapeFeature, speed_mph: f32, now_seconds: f64) -> Self {
        Self {
            feature_id: feature.id.clone(),
            kind: feature.interaction,
            progress: 0.0,
            time_limit: interaction_deadline(feature.interaction, speed_mph),
            started_at: now_seconds,
            payload: payload_for(feature.interaction, &feature.id),
        }
    }

    /// Whether the deadline has passed at the given session time.
    #[must_use]
    pub fn expired(&self, now_seconds: f64) -> bool {
        now_seconds - self.started_at > f64::from(self.time_limit)
    }

    /// Seconds left before expiry, clamped at zero.
    #[must_use]
    pub fn remaining(&self, now_seconds: f64) -> f64 {
        (f64::from(self.time_limit) - (now_seconds - self.started_at)).max(0.0)
    }

    /// Clamp and store progress reported by the shell (hold timers, etc.).
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    /// Feed one symbol into a sequence puzzle.
    pub fn enter_symbol(&mut self, symbol: Symbol) -> SequenceStep {
        let InteractionPayload::Sequence { target, entered } = &mut self.payload else {
            return SequenceStep::Ignored;
        };
        if entered.len() >= target.len() {
            return SequenceStep::Finished;
        }
        if target[entered.len()] == symbol {
            entered.push(symbol);
            self.progress = entered.len() as f32 / target.len() as f32;
            if entered.len() == target.len() {
                SequenceStep::Finished
            } else {
                SequenceStep::Advanced
            }
        } else {
            entered.clear();
            self.progress = 0.0;
            SequenceStep::Rejected
        }
    }

    /// Append a drawn point to a trace puzzle and rescore its similarity.
    pub fn push_trace_point(&mut self, point: PathPoint) {
        let InteractionPayload::Trace { target, drawn } = &mut self.payload else {
            return;
        };
        drawn.push(point);
        self.progress = path_similarity(target, drawn);
    }
}

fn payload_for(kind: InteractionKind, feature_id: &str) -> InteractionPayload {
    match kind {
        InteractionKind::Click => InteractionPayload::Click,
        InteractionKind::Hold => InteractionPayload::Hold,
        InteractionKind::Sequence => InteractionPayload::Sequence {
            target: sequence_target(feature_id),
            entered: SymbolSeq::new(),
        },
        InteractionKind::Trace => InteractionPayload::Trace {
            target: trace_target(feature_id),
            drawn: Vec::new(),
        },
    }
}

/// Deterministic permutation of the four symbols for this feature.
#[must_use]
pub fn sequence_target(feature_id: &str) -> SymbolSeq {
    let mut code = XxHash64::oneshot(PUZZLE_HASH_SEED, feature_id.as_bytes());
    let mut deck: SymbolSeq = SymbolSeq::from_slice(&Symbol::ALL);
    let mut target = SymbolSeq::new();
    while !deck.is_empty() {
        let index = (code % deck.len() as u64) as usize;
        code /= SEQUENCE_LEN as u64;
        target.push(deck.remove(index));
    }
    target
}

/// Deterministic zigzag path for this feature's trace puzzle.
#[must_use]
pub fn trace_target(feature_id: &str) -> Vec<PathPoint> {
    let hash = XxHash64::oneshot(PUZZLE_HASH_SEED ^ 0x5452_4143, feature_id.as_bytes());
    (0..TRACE_TARGET_POINTS)
        .map(|i| {
            let jitter = ((hash >> (i * 8)) & 0xFF) as f32 / 255.0;
            PathPoint {
                x: 50.0 + 50.0 * i as f32,
                y: if i % 2 == 0 { 50.0 } else { 75.0 } + 10.0 * jitter,
            }
        })
        .collect()
}

/// Score a drawn path against a target path: 1.0 for a perfect overlay
/// falling off linearly with the mean nearest-point distance.
#[must_use]
pub fn path_similarity(target: &[PathPoint], drawn: &[PathPoint]) -> f32 {
    if target.is_empty() || drawn.is_empty() {
        return 0.0;
    }
    let total: f32 = target
        .iter()
        .map(|t| {
            drawn
                .iter()
                .map(|d| t.distance_to(*d))
                .fold(f32::MAX, f32::min)
        })
        .sum();
    let mean = total / target.len() as f32;
    (1.0 - mean / TRACE_TOLERANCE).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureKind, FeatureVisual};

    fn fixture(kind: InteractionKind) -> LandscapeFeature {
        LandscapeFeature {
            id: "desert-crossing-feature-3".into(),
            kind: FeatureKind::SacredSite,
            position: 5.0,
            base_points: 100,
            interaction: kind,
            visual: FeatureVisual {
                icon: "🗿".into(),
                color: "#8B4513".into(),
                size: 30.0,
            },
            lore: String::new(),
            is_active: true,
            is_completed: false,
        }
    }

    #[test]
    fn deadline_uses_speed_tier_at_open() {
        let slow = Interaction::open(&fixture(InteractionKind::Hold), 10.0, 0.0);
        let fast = Interaction::open(&fixture(InteractionKind::Hold), 60.0, 0.0);
        assert!((slow.time_limit - 3.0).abs() < f32::EPSILON);
        assert!((fast.time_limit - 1.2).abs() < 1e-6);
    }

    #[test]
    fn expiry_tracks_session_clock() {
        let interaction = Interaction::open(&fixture(InteractionKind::Click), 10.0, 10.0);
        assert!(!interaction.expired(10.4));
        assert!(interaction.expired(10.6));
        assert!((interaction.remaining(10.2) - 0.3).abs() < 1e-6);
        assert!((interaction.remaining(99.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_is_clamped() {
        let mut interaction = Interaction::open(&fixture(InteractionKind::Hold), 10.0, 0.0);
        interaction.set_progress(1.7);
        assert!((interaction.progress - 1.0).abs() < f32::EPSILON);
        interaction.set_progress(-0.3);
        assert!((interaction.progress - 0.0).abs() < f32::EPSILON);
        interaction.set_progress(f32::NAN);
        assert!((interaction.progress - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn sequence_targets_are_stable_permutations() {
        let first = sequence_target("desert-crossing-feature-3");
        let second = sequence_target("desert-crossing-feature-3");
        assert_eq!(first, second);
        assert_eq!(first.len(), SEQUENCE_LEN);
        let mut sorted: Vec<Symbol> = first.to_vec();
        sorted.sort_by_key(|s| s.as_str());
        sorted.dedup();
        assert_eq!(sorted.len(), SEQUENCE_LEN);
    }

    #[test]
    fn sequence_entry_advances_resets_and_finishes() {
        let mut interaction = Interaction::open(&fixture(InteractionKind::Sequence), 10.0, 0.0);
        let InteractionPayload::Sequence { target, .. } = interaction.payload.clone() else {
            panic!("sequence payload expected");
        };

        // Wrong first symbol resets the prefix.
        let wrong = Symbol::ALL
            .into_iter()
            .find(|s| *s != target[0])
            .expect("four symbols");
        assert_eq!(interaction.enter_symbol(wrong), SequenceStep::Rejected);
        assert!((interaction.progress - 0.0).abs() < f32::EPSILON);

        for (i, symbol) in target.iter().enumerate() {
            let step = interaction.enter_symbol(*symbol);
            if i + 1 == target.len() {
                assert_eq!(step, SequenceStep::Finished);
            } else {
                assert_eq!(step, SequenceStep::Advanced);
            }
        }
        assert!((interaction.progress - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn symbols_ignored_outside_sequence_puzzles() {
        let mut interaction = Interaction::open(&fixture(InteractionKind::Hold), 10.0, 0.0);
        assert_eq!(interaction.enter_symbol(Symbol::Fire), SequenceStep::Ignored);
    }

    #[test]
    fn tracing_the_target_path_scores_high() {
        let mut interaction = Interaction::open(&fixture(InteractionKind::Trace), 10.0, 0.0);
        let InteractionPayload::Trace { target, .. } = interaction.payload.clone() else {
            panic!("trace payload expected");
        };
        for point in &target {
            interaction.push_trace_point(*point);
        }
        assert!(interaction.progress > 0.9);
    }

    #[test]
    fn wild_scribbles_score_low() {
        let target = trace_target("f");
        let drawn = vec![PathPoint { x: 900.0, y: 900.0 }];
        assert!(path_similarity(&target, &drawn) < 0.1);
        assert!((path_similarity(&target, &[]) - 0.0).abs() < f32::EPSILON);
    }
}
