use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
///
/// `long` is conventionally within [-180, 180] but unnormalized values (e.g. 181)
/// are accepted everywhere; see [`Coordinate::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub long: f64,
}

impl Coordinate {
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    /// Wraps the longitude into [-180, 180). Latitude is left untouched.
    pub fn normalized(&self) -> Self {
        Self {
            lat: self.lat,
            long: (self.long + 180.0).rem_euclid(360.0) - 180.0,
        }
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(coord: Coordinate) -> Self {
        geo::Point::new(coord.long, coord.lat)
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(point: geo::Point<f64>) -> Self {
        Self {
            lat: point.y(),
            long: point.x(),
        }
    }
}

/// Degrees/minutes/seconds of the absolute value of one axis.
///
/// The hemisphere sign is carried by the caller. Minutes are signed so that
/// offsets can be applied before [`Dms::normalized`] cascades them back into range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    pub degrees: i32,
    pub minutes: i32,
    pub seconds: f64,
}

impl Dms {
    pub fn new(degrees: i32, minutes: i32, seconds: f64) -> Self {
        Self { degrees, minutes, seconds }
    }
}

/// Pixel-space offset from the canvas origin (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

impl GridPoint {
    pub const ZERO: GridPoint = GridPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The state of the simulated vessel at a specific point in time.
///
/// Owned by the simulation driver; the engine only ever computes the next value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselState {
    pub position: Coordinate,
    /// Degrees, nominally [0, 360)
    pub heading: f64,
    /// Knots
    pub speed: f64,
    pub time: chrono::DateTime<chrono::Utc>,
    /// Elapsed time since the start of the exercise in seconds
    pub elapsed_time: f64,
}
