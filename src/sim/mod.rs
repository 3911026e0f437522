pub mod events;
pub mod simulation;
pub mod track;

pub use events::{ClientEvent, PositionPayload, ServerEvent, StartPosition};
pub use simulation::{format_elapsed, Simulation, SimulationError};
pub use track::Track;
