//! Landscape feature data model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    ANIMAL_TRACKS_BASE_POINTS, CLICK_BASE_SECONDS, GEOLOGICAL_BASE_POINTS, HOLD_BASE_SECONDS,
    PLANT_SIGNS_BASE_POINTS, SACRED_SITE_BASE_POINTS, SEQUENCE_BASE_SECONDS, TRACE_BASE_SECONDS,
};

/// Closed set of landscape feature categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureKind {
    SacredSite,
    AnimalTracks,
    PlantSigns,
    Geological,
}

impl FeatureKind {
    /// All categories in weight-table order.
    pub const ALL: [Self; 4] = [
        Self::SacredSite,
        Self::AnimalTracks,
        Self::PlantSigns,
        Self::Geological,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SacredSite => "sacred-site",
            Self::AnimalTracks => "animal-tracks",
            Self::PlantSigns => "plant-signs",
            Self::Geological => "geological",
        }
    }

    /// Points awarded for a completed interaction before speed modulation.
    #[must_use]
    pub const fn base_points(self) -> i32 {
        match self {
            Self::SacredSite => SACRED_SITE_BASE_POINTS,
            Self::AnimalTracks => ANIMAL_TRACKS_BASE_POINTS,
            Self::PlantSigns => PLANT_SIGNS_BASE_POINTS,
            Self::Geological => GEOLOGICAL_BASE_POINTS,
        }
    }

    /// Renderer icon hint.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::SacredSite => "🗿",
            Self::AnimalTracks => "🦘",
            Self::PlantSigns => "🌿",
            Self::Geological => "🪨",
        }
    }

    /// Renderer color hint.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::SacredSite => "#8B4513",
            Self::AnimalTracks => "#CD853F",
            Self::PlantSigns => "#228B22",
            Self::Geological => "#A0522D",
        }
    }

    /// Display name for HUD copy.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::SacredSite => "Sacred Site",
            Self::AnimalTracks => "Animal Tracks",
            Self::PlantSigns => "Plant Signs",
            Self::Geological => "Geological Formation",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sacred-site" => Ok(Self::SacredSite),
            "animal-tracks" => Ok(Self::AnimalTracks),
            "plant-signs" => Ok(Self::PlantSigns),
            "geological" => Ok(Self::Geological),
            _ => Err(()),
        }
    }
}

/// Mini-game kind attached to a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Click,
    Hold,
    Sequence,
    Trace,
}

impl InteractionKind {
    /// All kinds in weight-table order.
    pub const ALL: [Self; 4] = [Self::Click, Self::Hold, Self::Sequence, Self::Trace];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Hold => "hold",
            Self::Sequence => "sequence",
            Self::Trace => "trace",
        }
    }

    /// Base deadline in seconds before speed-tier compression.
    #[must_use]
    pub const fn base_seconds(self) -> f32 {
        match self {
            Self::Click => CLICK_BASE_SECONDS,
            Self::Hold => HOLD_BASE_SECONDS,
            Self::Sequence => SEQUENCE_BASE_SECONDS,
            Self::Trace => TRACE_BASE_SECONDS,
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(Self::Click),
            "hold" => Ok(Self::Hold),
            "sequence" => Ok(Self::Sequence),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

/// Rendering hints carried alongside a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVisual {
    pub icon: String,
    pub color: String,
    pub size: f32,
}

/// A point of interest along the route.
///
/// Features are generated before a session starts and stay sorted ascending
/// by position for the whole session. `is_completed` is monotonic; only the
/// session state machine flips either boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandscapeFeature {
    pub id: String,
    pub kind: FeatureKind,
    /// Distance along the route in miles.
    pub position: f32,
    pub base_points: i32,
    pub interaction: InteractionKind,
    pub visual: FeatureVisual,
    pub lore: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_completed: bool,
}

impl LandscapeFeature {
    /// Proximity test against the player position.
    #[must_use]
    pub fn in_range(&self, player_position: f32, range: f32) -> bool {
        (self.position - player_position).abs() <= range
    }

    /// Whether the player may start this feature's mini-game right now.
    #[must_use]
    pub const fn interactable(&self) -> bool {
        self.is_active && !self.is_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_roundtrip() {
        for kind in FeatureKind::ALL {
            assert_eq!(kind.as_str().parse::<FeatureKind>(), Ok(kind));
        }
        for kind in InteractionKind::ALL {
            assert_eq!(kind.as_str().parse::<InteractionKind>(), Ok(kind));
        }
        assert!("billboard".parse::<FeatureKind>().is_err());
    }

    #[test]
    fn range_test_is_symmetric() {
        let feature = LandscapeFeature {
            id: "f-0".into(),
            kind: FeatureKind::Geological,
            position: 4.0,
            base_points: FeatureKind::Geological.base_points(),
            interaction: InteractionKind::Hold,
            visual: FeatureVisual {
                icon: FeatureKind::Geological.icon().into(),
                color: FeatureKind::Geological.color().into(),
                size: 32.0,
            },
            lore: String::new(),
            is_active: false,
            is_completed: false,
        };
        assert!(feature.in_range(4.4, 0.5));
        assert!(feature.in_range(3.6, 0.5));
        assert!(!feature.in_range(4.6, 0.5));
    }

    #[test]
    fn completed_features_are_not_interactable() {
        let mut feature = LandscapeFeature {
            id: "f-1".into(),
            kind: FeatureKind::SacredSite,
            position: 1.0,
            base_points: 100,
            interaction: InteractionKind::Click,
            visual: FeatureVisual {
                icon: "🗿".into(),
                color: "#8B4513".into(),
                size: 30.0,
            },
            lore: String::new(),
            is_active: true,
            is_completed: false,
        };
        assert!(feature.interactable());
        feature.is_completed = true;
        assert!(!feature.interactable());
    }
}
