//! Scoring model: interaction completion points and dwell reading credit.
//!
//! Both sources run through the same speed-tier multiplier table, so faster
//! travel always yields fewer points per unit of engagement.

use crate::constants::{DWELL_MIN_MULTIPLIER, DWELL_POINTS_PER_SECOND};
use crate::feature::InteractionKind;
use crate::numbers::{floor_f64_to_i32, round_f32_to_i32};
use crate::physics::tier_for_speed;

/// Points for completing a feature's mini-game at the given travel speed.
#[must_use]
pub fn feature_points(base_points: i32, speed_mph: f32) -> i32 {
    let multiplier = tier_for_speed(speed_mph).multiplier();
    round_f32_to_i32(base_points as f32 * multiplier)
}

/// Deadline in seconds for a freshly started interaction. Higher speed
/// tiers compress the window; this is the central risk/reward tension.
#[must_use]
pub fn interaction_deadline(kind: InteractionKind, speed_mph: f32) -> f32 {
    kind.base_seconds() * tier_for_speed(speed_mph).time_scale()
}

/// Points credited when a dwell-reading stretch ends.
///
/// Zero or negative dwell yields zero, never a negative award. The tier
/// multiplier is floored at `DWELL_MIN_MULTIPLIER` so even racing players
/// earn something for the time they did spend.
#[must_use]
pub fn dwell_points(dwell_seconds: f64, speed_mph: f32) -> i32 {
    if dwell_seconds <= 0.0 || !dwell_seconds.is_finite() {
        return 0;
    }
    let multiplier = tier_for_speed(speed_mph)
        .multiplier()
        .max(DWELL_MIN_MULTIPLIER);
    floor_f64_to_i32(dwell_seconds * DWELL_POINTS_PER_SECOND * f64::from(multiplier)).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_SPEED_MPH;

    #[test]
    fn completion_points_follow_tier_table() {
        assert_eq!(feature_points(100, 10.0), 100);
        assert_eq!(feature_points(100, 25.0), 75);
        assert_eq!(feature_points(100, 45.0), 50);
        assert_eq!(feature_points(100, 70.0), 25);
    }

    #[test]
    fn scoring_is_monotone_down_in_speed() {
        let speeds = [5.0, 20.0, 45.0, 75.0];
        let mut previous = i32::MAX;
        for speed in speeds {
            let awarded = feature_points(100, speed);
            assert!(awarded <= previous);
            previous = awarded;
        }
    }

    #[test]
    fn max_speed_has_defined_multiplier() {
        assert_eq!(feature_points(100, MAX_SPEED_MPH), 25);
        assert!(interaction_deadline(InteractionKind::Click, MAX_SPEED_MPH) > 0.0);
    }

    #[test]
    fn hold_deadline_shrinks_at_racing_tier() {
        let relaxed = interaction_deadline(InteractionKind::Hold, 10.0);
        let pressed = interaction_deadline(InteractionKind::Hold, 60.0);
        assert!((relaxed - 3.0).abs() < f32::EPSILON);
        assert!((pressed - 1.2).abs() < 1e-6);
    }

    #[test]
    fn dwell_never_goes_negative() {
        assert_eq!(dwell_points(-3.0, 10.0), 0);
        assert_eq!(dwell_points(0.0, 10.0), 0);
        assert_eq!(dwell_points(f64::NAN, 10.0), 0);
    }

    #[test]
    fn dwell_floors_the_fast_tiers() {
        // Crawling: full multiplier.
        assert_eq!(dwell_points(2.0, 10.0), 20);
        // Racing would multiply by 0.25 but is floored at 0.5.
        assert_eq!(dwell_points(2.0, 75.0), 10);
    }
}
