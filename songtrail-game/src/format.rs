//! HUD formatting helpers shared by shells.

use crate::numbers::floor_f64_to_i32;

/// Seconds as `M:SS` for the route clock.
#[must_use]
pub fn format_time(seconds: f64) -> String {
    let total = floor_f64_to_i32(seconds.max(0.0));
    format!("{}:{:02}", total / 60, total % 60)
}

/// Rounded speed readout.
#[must_use]
pub fn format_speed(speed_mph: f32) -> String {
    format!("{} mph", speed_mph.round() as i32)
}

/// Distance readout with one decimal.
#[must_use]
pub fn format_distance(miles: f32) -> String {
    format!("{miles:.1} miles")
}

/// Thousands-separated point total.
#[must_use]
pub fn format_points(points: i32) -> String {
    let digits = points.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if points < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_renders_minutes_and_padded_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(360.0), "6:00");
        assert_eq!(format_time(-5.0), "0:00");
    }

    #[test]
    fn speed_and_distance_round_for_display() {
        assert_eq!(format_speed(54.6), "55 mph");
        assert_eq!(format_speed(0.2), "0 mph");
        assert_eq!(format_distance(12.34), "12.3 miles");
    }

    #[test]
    fn points_group_by_thousands() {
        assert_eq!(format_points(0), "0");
        assert_eq!(format_points(999), "999");
        assert_eq!(format_points(1_600), "1,600");
        assert_eq!(format_points(1_234_567), "1,234,567");
        assert_eq!(format_points(-1_200), "-1,200");
    }
}
