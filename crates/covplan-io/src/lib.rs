//! # covplan-io: QGC WPL waypoint file I/O and mission emission
//!
//! - [`waypoint`] — QGC WPL 110 record format, reader and writer.
//! - [`mission`] — the input mission DSL (area rings, agent starts) and the
//!   per-agent mission emitter (§4.6, §6).

pub mod mission;
pub mod waypoint;

pub use mission::{build_agent_mission, parse_input, MissionError, POINT_ZONE, TAKEOFF_ALT};
pub use waypoint::{Waypoint, WaypointError};

use thiserror::Error;

/// Aggregated error type for mission file I/O (§7).
#[derive(Error, Debug)]
pub enum MissionIoError {
    #[error(transparent)]
    Waypoint(#[from] WaypointError),

    #[error(transparent)]
    Mission(#[from] MissionError),
}
