use crate::engine::constants::{SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::engine::dms::{from_dms, to_dms};
use crate::engine::models::Dms;

/// Rounds decimal degrees to the closest whole minute, then shifts by `offset` minutes.
///
/// Seconds of 30 or more round up, cascading through the 60-minute boundary.
/// A value already on a whole minute is returned unchanged whatever the
/// `offset`, so `-0.0` stays `-0.0`. Rounding happens on the absolute value and
/// the input's hemisphere sign is reapplied; a positive `offset` therefore
/// moves away from the equator / prime meridian.
pub fn closest_minute(decimal_degrees: f64, offset: i32) -> f64 {
    let dms = to_dms(decimal_degrees);

    if dms.seconds == 0.0 {
        return decimal_degrees;
    }

    let mut minutes = dms.minutes;
    if dms.seconds >= SECONDS_PER_MINUTE / 2.0 {
        minutes += 1;
    }
    minutes += offset;

    let rounded = Dms::new(dms.degrees, minutes, 0.0).normalized();
    let absolute = from_dms(&rounded);

    if decimal_degrees.is_sign_negative() {
        -absolute
    } else {
        absolute
    }
}

/// Difference between two decimal-degree values in arc-seconds.
pub fn diff_in_seconds(from: f64, to: f64) -> f64 {
    (from - to) * SECONDS_PER_HOUR
}
