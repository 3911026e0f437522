//! Event contracts exchanged between a plotter client and the simulation.
//!
//! Both directions serialise as `{"event": "<name>", "payload": {...}}`;
//! events without a payload omit the `payload` key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::dms::from_dms;
use crate::engine::models::{Coordinate, Dms};

/// Where and how the vessel starts a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartPosition {
    pub position: Coordinate,
    /// Degrees
    pub heading: f64,
    /// Knots
    #[serde(default)]
    pub speed: f64,
}

impl Default for StartPosition {
    fn default() -> Self {
        // 52°57'N 004°47'E, off Den Helder
        Self {
            position: Coordinate::new(from_dms(&Dms::new(52, 57, 0.0)), from_dms(&Dms::new(4, 47, 0.0))),
            heading: 45.0,
            speed: 6.0,
        }
    }
}

/// One position report of a running simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionPayload {
    pub position: Coordinate,
    /// Straight-line distance from the start of the run in meters
    pub distance: f64,
    pub heading: f64,
    pub speed: f64,
    /// Seconds since the run started
    pub elapsed: f64,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "lowercase")]
pub enum ClientEvent {
    Init(StartPosition),
    Start(StartPosition),
    Stop,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "lowercase")]
pub enum ServerEvent {
    Init(StartPosition),
    Position(PositionPayload),
    Reset(StartPosition),
    Stopped,
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Init(_) => "init",
            ServerEvent::Position(_) => "position",
            ServerEvent::Reset(_) => "reset",
            ServerEvent::Stopped => "stopped",
        }
    }
}
