use crate::engine::constants::{EARTH_RADIUS, METERS_PER_NAUTICAL_MILE, SECONDS_PER_HOUR};
use crate::engine::models::Coordinate;

/// Converts a speed in knots to meters per second.
pub fn knots_to_meters_per_second(speed_knots: f64) -> f64 {
    speed_knots * (METERS_PER_NAUTICAL_MILE / SECONDS_PER_HOUR)
}

/// Great-circle distance between two coordinates in meters (haversine, spherical Earth).
pub fn distance(start: &Coordinate, end: &Coordinate) -> f64 {
    let start_lat = start.lat.to_radians();
    let end_lat = end.lat.to_radians();
    let d_lat = (end.lat - start.lat).to_radians();
    let d_long = (end.long - start.long).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + start_lat.cos() * end_lat.cos() * (d_long / 2.0).sin().powi(2);
    // Round-off can push `a` a hair above 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS * c
}

/// Dead reckoning: the position reached after sailing `duration_secs` at
/// `speed_knots` on a great-circle course starting at `heading_deg`.
///
/// A zero speed or duration returns `position` bit-for-bit. The resulting
/// longitude is not wrapped; use [`Coordinate::normalized`] when needed.
pub fn advance(position: &Coordinate, speed_knots: f64, heading_deg: f64, duration_secs: f64) -> Coordinate {
    if speed_knots == 0.0 || duration_secs == 0.0 {
        return *position;
    }

    let distance_m = knots_to_meters_per_second(speed_knots) * duration_secs;
    let angular_dist = distance_m / EARTH_RADIUS;
    let heading_rad = heading_deg.to_radians();

    let start_lat = position.lat.to_radians();
    let start_long = position.long.to_radians();

    let end_lat = (start_lat.sin() * angular_dist.cos()
        + start_lat.cos() * angular_dist.sin() * heading_rad.cos())
    .asin();

    let end_long = start_long
        + (heading_rad.sin() * angular_dist.sin() * start_lat.cos())
            .atan2(angular_dist.cos() - start_lat.sin() * end_lat.sin());

    Coordinate {
        lat: end_lat.to_degrees(),
        long: end_long.to_degrees(),
    }
}

/// Initial great-circle bearing from `start` towards `end`, in [0, 360).
pub fn bearing(start: &Coordinate, end: &Coordinate) -> f64 {
    let start_lat = start.lat.to_radians();
    let end_lat = end.lat.to_radians();
    let d_long = (end.long - start.long).to_radians();

    let y = d_long.sin() * end_lat.cos();
    let x = start_lat.cos() * end_lat.sin() - start_lat.sin() * end_lat.cos() * d_long.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}
