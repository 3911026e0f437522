/// Mean spherical Earth radius in meters. The engine does not model the WGS84 ellipsoid.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// One nautical mile in meters (one arc-minute of latitude).
pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const MINUTES_PER_DEGREE: f64 = 60.0;
pub const SECONDS_PER_HOUR: f64 = 3600.0;
/// Arc-seconds in one degree.
pub const SECONDS_PER_DEGREE: f64 = SECONDS_PER_MINUTE * MINUTES_PER_DEGREE;

/// Tolerance used when snapping DMS seconds to 0 or 60.
pub const DMS_EPSILON: f64 = 1e-4;

/// Default horizontal density of the plotting grid.
pub const PIXELS_PER_LONG_SECOND: f64 = 15.0;
/// Default vertical density of the plotting grid.
pub const PIXELS_PER_LAT_SECOND: f64 = 13.0;
