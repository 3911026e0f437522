//! Tick-driven man-overboard exercise.
//!
//! `Simulation` owns the vessel state and advances it one fixed interval per
//! [`Simulation::tick`]. The caller decides when ticks happen (a timer loop in
//! the driver binary, or directly in tests), so the state machine itself is
//! deterministic for a given seed.

use chrono::Utc;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::SimulationConfig;
use crate::engine::geodesy::{advance, distance};
use crate::engine::models::{Coordinate, VesselState};
use crate::sim::events::{ClientEvent, PositionPayload, ServerEvent, StartPosition};
use crate::sim::track::Track;

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A reset arrived before any init event stored a start position.
    #[error("Simulation has not been initialised")]
    NotInitialized,

    /// `tick` was called while the simulation is stopped.
    #[error("Simulation is not running")]
    NotRunning,

    #[error("Malformed client event: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct Simulation {
    tick_interval: f64,
    max_bearing_wander: i32,
    max_wander_interval: f64,
    rng: ChaCha8Rng,
    initial: Option<StartPosition>,
    running: bool,
    /// Where the current run started; distances are measured from here
    origin: Coordinate,
    vessel: Option<VesselState>,
    /// Seconds left until the next heading change
    wander_countdown: f64,
    max_track_points: Option<usize>,
    track: Track,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            tick_interval: config.tick_interval_secs,
            max_bearing_wander: config.max_bearing_wander.min(i32::MAX as u32) as i32,
            max_wander_interval: config.max_wander_interval_secs,
            rng,
            initial: None,
            running: false,
            origin: config.start.position,
            vessel: None,
            wander_countdown: 0.0,
            max_track_points: config.max_track_points,
            track: Track::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn vessel(&self) -> Option<&VesselState> {
        self.vessel.as_ref()
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn initial(&self) -> Option<&StartPosition> {
        self.initial.as_ref()
    }

    pub fn tick_interval(&self) -> f64 {
        self.tick_interval
    }

    /// Applies one client event and returns the events to send back.
    pub fn handle(&mut self, event: ClientEvent) -> Result<Vec<ServerEvent>, SimulationError> {
        match event {
            ClientEvent::Init(start) => {
                info!(
                    "Initialising exercise at {:?}, heading {}, speed {} kn",
                    start.position, start.heading, start.speed
                );
                self.initial = Some(start.clone());
                Ok(vec![ServerEvent::Init(start)])
            }
            ClientEvent::Start(start) => {
                info!("Starting run from {:?}", start.position);
                self.start(start);
                Ok(vec![self.step()])
            }
            ClientEvent::Stop => {
                info!("Stopping run after {} track points", self.track.len());
                self.running = false;
                Ok(vec![ServerEvent::Stopped])
            }
            ClientEvent::Reset => {
                let initial = self.initial.clone().ok_or(SimulationError::NotInitialized)?;
                info!("Resetting exercise to {:?}", initial.position);
                self.running = false;
                self.vessel = None;
                self.track.clear();
                Ok(vec![ServerEvent::Reset(initial)])
            }
        }
    }

    /// Decodes a JSON client event and applies it.
    pub fn handle_json(&mut self, json: &str) -> Result<Vec<ServerEvent>, SimulationError> {
        let event: ClientEvent = serde_json::from_str(json)?;
        self.handle(event)
    }

    /// Advances the running simulation by one tick interval.
    pub fn tick(&mut self) -> Result<ServerEvent, SimulationError> {
        if !self.running {
            return Err(SimulationError::NotRunning);
        }

        self.wander_countdown -= self.tick_interval;
        if self.wander_countdown <= 0.0 {
            self.wander_heading();
        }

        Ok(self.step())
    }

    fn start(&mut self, start: StartPosition) {
        self.origin = start.position;
        self.vessel = Some(VesselState {
            position: start.position,
            heading: start.heading,
            speed: start.speed,
            time: Utc::now(),
            elapsed_time: 0.0,
        });
        self.track = match self.max_track_points {
            Some(max_points) => Track::with_limit(max_points),
            None => Track::new(),
        };
        self.track.push(start.position);
        self.running = true;
        self.wander_heading();
    }

    /// Sails one interval from the current state and reports the new position.
    fn step(&mut self) -> ServerEvent {
        let origin = self.origin;
        let interval = self.tick_interval;

        let Some(vessel) = self.vessel.as_mut() else {
            return ServerEvent::Stopped;
        };

        vessel.position = advance(&vessel.position, vessel.speed, vessel.heading, interval);
        vessel.elapsed_time += interval;
        vessel.time += chrono::Duration::milliseconds((interval * 1000.0).round() as i64);

        let payload = PositionPayload {
            position: vessel.position,
            distance: distance(&origin, &vessel.position),
            heading: vessel.heading,
            speed: vessel.speed,
            elapsed: vessel.elapsed_time,
            time: vessel.time,
        };
        self.track.push(vessel.position);

        debug!(
            "Position {:?} after {}, {:.1} m from start",
            payload.position,
            format_elapsed(payload.elapsed),
            payload.distance
        );
        ServerEvent::Position(payload)
    }

    /// Turns the vessel by a random whole number of degrees and schedules the next turn.
    fn wander_heading(&mut self) {
        self.wander_countdown = if self.max_wander_interval > 0.0 {
            self.rng.gen_range(0.0..self.max_wander_interval)
        } else {
            0.0
        };

        if self.max_bearing_wander == 0 {
            return;
        }
        let change = self.rng.gen_range(-self.max_bearing_wander..=self.max_bearing_wander);
        if let Some(vessel) = self.vessel.as_mut() {
            vessel.heading = apply_bearing_change(vessel.heading, change as f64);
            debug!(
                "Heading changed by {} to {}, next change in {:.2}s",
                change, vessel.heading, self.wander_countdown
            );
        }
    }
}

/// Adds `change` to `heading`, wrapping once into [0, 360), and rounds to a whole degree.
pub fn apply_bearing_change(heading: f64, change: f64) -> f64 {
    let mut next = heading + change;
    if next < 0.0 {
        next += 360.0;
    } else if next >= 360.0 {
        next -= 360.0;
    }
    next.round()
}

/// Formats a duration in seconds as `hh:mm:ss`.
pub fn format_elapsed(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds.floor() as u64 } else { 0 };
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
