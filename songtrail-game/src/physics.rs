//! Speed and position integration.
//!
//! Pure functions of their inputs; the session feeds identical tick
//! sequences through them for exact replay. Out-of-range inputs are
//! clamped, never rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    ACCELERATION_MPH_PER_SEC, FRICTION_MPH_PER_SEC, MAX_SPEED_MPH, MIN_SPEED_MPH,
    SECONDS_PER_HOUR, TIER_CRAWLING_MAX_MPH, TIER_CRAWLING_MULTIPLIER, TIER_CRAWLING_TIME_SCALE,
    TIER_FAST_MAX_MPH, TIER_FAST_MULTIPLIER, TIER_FAST_TIME_SCALE, TIER_MODERATE_MAX_MPH,
    TIER_MODERATE_MULTIPLIER, TIER_MODERATE_TIME_SCALE, TIER_RACING_MULTIPLIER,
    TIER_RACING_TIME_SCALE,
};

/// One of four speed bands; each carries a scoring multiplier and an
/// interaction-deadline scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    #[default]
    Crawling,
    Moderate,
    Fast,
    Racing,
}

impl SpeedTier {
    pub const ALL: [Self; 4] = [Self::Crawling, Self::Moderate, Self::Fast, Self::Racing];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crawling => "crawling",
            Self::Moderate => "moderate",
            Self::Fast => "fast",
            Self::Racing => "racing",
        }
    }

    /// Display name for HUD copy.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Crawling => "Crawling",
            Self::Moderate => "Moderate",
            Self::Fast => "Fast",
            Self::Racing => "Racing",
        }
    }

    /// Scoring multiplier; descending across tiers by design.
    #[must_use]
    pub const fn multiplier(self) -> f32 {
        match self {
            Self::Crawling => TIER_CRAWLING_MULTIPLIER,
            Self::Moderate => TIER_MODERATE_MULTIPLIER,
            Self::Fast => TIER_FAST_MULTIPLIER,
            Self::Racing => TIER_RACING_MULTIPLIER,
        }
    }

    /// Interaction deadline compression; faster tiers leave less time.
    #[must_use]
    pub const fn time_scale(self) -> f32 {
        match self {
            Self::Crawling => TIER_CRAWLING_TIME_SCALE,
            Self::Moderate => TIER_MODERATE_TIME_SCALE,
            Self::Fast => TIER_FAST_TIME_SCALE,
            Self::Racing => TIER_RACING_TIME_SCALE,
        }
    }
}

impl fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeedTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crawling" => Ok(Self::Crawling),
            "moderate" => Ok(Self::Moderate),
            "fast" => Ok(Self::Fast),
            "racing" => Ok(Self::Racing),
            _ => Err(()),
        }
    }
}

/// Classify a speed into its tier. Total over every representable input:
/// NaN and negatives land in `Crawling`, anything past the fast edge in
/// `Racing`, including speeds beyond `MAX_SPEED_MPH`.
#[must_use]
pub fn tier_for_speed(speed_mph: f32) -> SpeedTier {
    if speed_mph <= TIER_CRAWLING_MAX_MPH || speed_mph.is_nan() {
        SpeedTier::Crawling
    } else if speed_mph <= TIER_MODERATE_MAX_MPH {
        SpeedTier::Moderate
    } else if speed_mph <= TIER_FAST_MAX_MPH {
        SpeedTier::Fast
    } else {
        SpeedTier::Racing
    }
}

/// Integrate speed over one tick. Friction always applies when the player
/// is not accelerating; there is no coasting band.
#[must_use]
pub fn update_speed(current_mph: f32, accelerating: bool, dt_seconds: f32) -> f32 {
    let dt = dt_seconds.max(0.0);
    let next = if accelerating {
        current_mph + ACCELERATION_MPH_PER_SEC * dt
    } else {
        current_mph - FRICTION_MPH_PER_SEC * dt
    };
    next.clamp(MIN_SPEED_MPH, MAX_SPEED_MPH)
}

/// Advance position along the route from the current speed.
#[must_use]
pub fn advance_position(position_miles: f32, speed_mph: f32, dt_seconds: f32) -> f32 {
    let miles_per_second = speed_mph.clamp(MIN_SPEED_MPH, MAX_SPEED_MPH) / SECONDS_PER_HOUR;
    position_miles + miles_per_second * dt_seconds.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceleration_saturates_at_max_speed() {
        let mut speed = 0.0;
        let mut previous = speed;
        for _ in 0..40 {
            speed = update_speed(speed, true, 1.0);
            assert!(speed >= previous);
            previous = speed;
        }
        assert!((speed - MAX_SPEED_MPH).abs() < f32::EPSILON);
        assert!((update_speed(speed, true, 1.0) - MAX_SPEED_MPH).abs() < f32::EPSILON);
    }

    #[test]
    fn friction_never_drops_below_zero() {
        let mut speed = 12.0;
        for _ in 0..10 {
            let next = update_speed(speed, false, 1.0);
            assert!(next <= speed);
            assert!(next >= 0.0);
            speed = next;
        }
        assert!((speed - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn position_advances_with_speed() {
        // 36 mph = 0.01 miles per second.
        let next = advance_position(2.0, 36.0, 10.0);
        assert!((next - 2.1).abs() < 1e-5);
        // Negative deltas are clamped, not integrated backwards.
        assert!((advance_position(2.0, 36.0, -5.0) - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn tier_classification_covers_edges() {
        assert_eq!(tier_for_speed(0.0), SpeedTier::Crawling);
        assert_eq!(tier_for_speed(15.0), SpeedTier::Crawling);
        assert_eq!(tier_for_speed(15.1), SpeedTier::Moderate);
        assert_eq!(tier_for_speed(35.0), SpeedTier::Moderate);
        assert_eq!(tier_for_speed(55.0), SpeedTier::Fast);
        assert_eq!(tier_for_speed(55.1), SpeedTier::Racing);
        assert_eq!(tier_for_speed(MAX_SPEED_MPH), SpeedTier::Racing);
        assert_eq!(tier_for_speed(500.0), SpeedTier::Racing);
        assert_eq!(tier_for_speed(f32::NAN), SpeedTier::Crawling);
    }

    #[test]
    fn tier_strings_roundtrip() {
        for tier in SpeedTier::ALL {
            assert_eq!(tier.as_str().parse::<SpeedTier>(), Ok(tier));
        }
    }
}
