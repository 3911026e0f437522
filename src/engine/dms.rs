use std::fmt;

use crate::engine::constants::{DMS_EPSILON, MINUTES_PER_DEGREE, SECONDS_PER_DEGREE, SECONDS_PER_MINUTE};
use crate::engine::models::Dms;

impl Dms {
    /// Cascades seconds into minutes and minutes into degrees.
    ///
    /// Seconds within [`DMS_EPSILON`] of 60 roll over into the next minute, and
    /// seconds within epsilon of 0 are snapped to exactly 0, so the result never
    /// carries `60"` or `60'`.
    pub fn normalized(&self) -> Dms {
        let mut degrees = self.degrees;
        let mut minutes = self.minutes;
        let mut seconds = self.seconds;

        let carry = (seconds / SECONDS_PER_MINUTE).floor();
        if carry.is_finite() && carry != 0.0 {
            seconds -= carry * SECONDS_PER_MINUTE;
            minutes += carry as i32;
        }

        if (seconds - SECONDS_PER_MINUTE).abs() < DMS_EPSILON {
            seconds = 0.0;
            minutes += 1;
        } else if seconds < DMS_EPSILON {
            seconds = 0.0;
        }

        let per_degree = MINUTES_PER_DEGREE as i32;
        degrees += minutes.div_euclid(per_degree);
        minutes = minutes.rem_euclid(per_degree);

        Dms { degrees, minutes, seconds }
    }

    /// Builds a normalized DMS from whole degrees plus a number of arc-seconds past them.
    pub fn from_arc_seconds(degrees: i32, arc_seconds: f64) -> Dms {
        Dms::new(degrees, 0, arc_seconds).normalized()
    }

    /// Arc-seconds past the whole degree (`minutes * 60 + seconds`).
    pub fn seconds_past_degree(&self) -> f64 {
        self.minutes as f64 * SECONDS_PER_MINUTE + self.seconds
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_dms(self, 2))
    }
}

/// Converts decimal degrees to the DMS of their absolute value.
pub fn to_dms(decimal_degrees: f64) -> Dms {
    let absolute = decimal_degrees.abs();
    let degrees = absolute.floor();
    let minutes_raw = (absolute - degrees) * MINUTES_PER_DEGREE;
    let minutes = minutes_raw.floor();
    let seconds = (minutes_raw - minutes) * SECONDS_PER_MINUTE;

    Dms::new(degrees as i32, minutes as i32, seconds).normalized()
}

/// Converts DMS back to decimal degrees. The sign is left to the caller.
pub fn from_dms(dms: &Dms) -> f64 {
    dms.degrees as f64 + dms.minutes as f64 / MINUTES_PER_DEGREE + dms.seconds / SECONDS_PER_DEGREE
}

/// Formats as `DDD° M' S.SS"`. Seconds of exactly zero render as a bare `0`.
///
/// Seconds that round up to 60 at the requested precision carry into the
/// minutes, so a label never reads `60.00"`.
pub fn format_dms(dms: &Dms, decimal_places: usize) -> String {
    let scale = 10f64.powi(decimal_places.min(i32::MAX as usize) as i32);
    let rounded = (dms.seconds * scale).round() / scale;
    let dms = if rounded >= SECONDS_PER_MINUTE {
        Dms::new(dms.degrees, dms.minutes, rounded).normalized()
    } else {
        *dms
    };

    let seconds = if dms.seconds == 0.0 {
        "0".to_string()
    } else {
        format!("{:.*}", decimal_places, dms.seconds)
    };

    format!("{:03}° {}' {}\"", dms.degrees, dms.minutes, seconds)
}

pub fn dd_to_dms_formatted(decimal_degrees: f64, decimal_places: usize) -> String {
    format_dms(&to_dms(decimal_degrees), decimal_places)
}
