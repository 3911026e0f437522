/// Normalizes a heading into [0, 360).
pub fn normalize_heading(heading: f64) -> f64 {
    ((heading % 360.0) + 360.0) % 360.0
}

/// Signed shortest rotation from `current` to `target`, in degrees.
///
/// Positive is clockwise. Congruent headings (0/360/720, 90/450) yield 0.
/// Exactly opposite headings are a tie and always resolve to -180, so the
/// result lies in [-180, 180) and swapping the arguments does not flip the
/// sign in that one case.
pub fn rotation_delta(current: f64, target: f64) -> f64 {
    let normalized_target = normalize_heading(target);
    ((normalized_target - (current % 360.0) + 540.0) % 360.0) - 180.0
}

/// Continuous (unwrapped) rotation to feed a needle or glyph transform.
///
/// Going from 350 to 10 yields 370 rather than snapping back through 180.
/// Feed the previous output back in as `current` to accumulate.
pub fn unwrapped_bearing(current: f64, target: f64) -> f64 {
    current + rotation_delta(current, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(0.0), 0.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        assert_eq!(normalize_heading(450.0), 90.0);
        assert_eq!(normalize_heading(-90.0), 270.0);
        assert_eq!(normalize_heading(-720.0), 0.0);
    }

    #[test]
    fn test_rotation_delta_identity() {
        for h in [0.0, 90.0, 360.0, 450.0, -90.0] {
            assert_eq!(rotation_delta(h, h), 0.0, "heading {h}");
        }
        assert_eq!(rotation_delta(360.0, 0.0), 0.0);
        assert_eq!(rotation_delta(450.0, 90.0), 0.0);
        assert_eq!(rotation_delta(90.0, 450.0), 0.0);
    }

    #[test]
    fn test_rotation_delta_clockwise_and_counter_clockwise() {
        assert_eq!(rotation_delta(0.0, 90.0), 90.0);
        assert_eq!(rotation_delta(90.0, 180.0), 90.0);
        assert_eq!(rotation_delta(270.0, 360.0), 90.0);

        assert_eq!(rotation_delta(90.0, 0.0), -90.0);
        assert_eq!(rotation_delta(180.0, 90.0), -90.0);
        assert_eq!(rotation_delta(360.0, 270.0), -90.0);
    }

    #[test]
    fn test_rotation_delta_wraparound() {
        assert_eq!(rotation_delta(350.0, 10.0), 20.0);
        assert_eq!(rotation_delta(10.0, 350.0), -20.0);
        assert_eq!(rotation_delta(0.0, 270.0), -90.0);
        assert_eq!(rotation_delta(270.0, 0.0), 90.0);
        assert_eq!(rotation_delta(-45.0, 45.0), 90.0);
        assert_eq!(rotation_delta(450.0, 180.0), 90.0);
    }

    #[test]
    fn test_rotation_delta_opposite_headings_tie_break() {
        // Known ambiguity: both directions report -180
        assert_eq!(rotation_delta(-90.0, 90.0), -180.0);
        assert_eq!(rotation_delta(90.0, -90.0), -180.0);
        assert_eq!(rotation_delta(0.0, 180.0), -180.0);
        assert_eq!(rotation_delta(180.0, 0.0), -180.0);
    }

    #[test]
    fn test_rotation_delta_range() {
        let mut current = -720.0;
        while current <= 720.0 {
            let mut target = -400.0;
            while target <= 400.0 {
                let delta = rotation_delta(current, target);
                assert!((-180.0..180.0).contains(&delta), "{current} -> {target}: {delta}");
                target += 17.5;
            }
            current += 23.0;
        }
    }

    #[test]
    fn test_unwrapped_bearing() {
        assert_eq!(unwrapped_bearing(0.0, 90.0), 90.0);
        assert_eq!(unwrapped_bearing(90.0, 180.0), 180.0);
        assert_eq!(unwrapped_bearing(270.0, 0.0), 360.0);

        assert_eq!(unwrapped_bearing(350.0, 10.0), 370.0);
        assert_eq!(unwrapped_bearing(10.0, 350.0), -10.0);
        assert_eq!(unwrapped_bearing(450.0, 250.0), 610.0);

        assert_eq!(unwrapped_bearing(0.0, 0.0), 0.0);
        assert_eq!(unwrapped_bearing(360.0, 0.0), 360.0);
        assert_eq!(unwrapped_bearing(-90.0, 90.0), -270.0);
    }

    #[test]
    fn test_unwrapped_bearing_accumulates_without_reverse_spin() {
        let headings = [340.0, 355.0, 5.0, 20.0, 10.0, 350.0];
        let mut needle = 340.0;
        let mut previous = needle;
        for heading in headings {
            needle = unwrapped_bearing(needle, heading);
            assert!((needle - previous).abs() <= 180.0);
            assert_eq!(normalize_heading(needle), heading);
            previous = needle;
        }
        assert_eq!(needle, 350.0);
    }
}
