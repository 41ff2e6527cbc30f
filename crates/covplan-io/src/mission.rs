//! Mission input parsing and per-agent mission emission (§4.6, §6).
//!
//! The input mission file is itself a `QGC WPL` waypoint list, read as a
//! small DSL: grounded on `UBPlanner::startPlanner` for how `NAV_TAKEOFF` /
//! `NAV_LAND` pairs become area rings and `NAV_RETURN_TO_LAUNCH` waypoints
//! become agent starts. The emitter side is grounded on
//! `UBPlanner::missionAgent`.

use thiserror::Error;
use tracing::info;

use covplan_core::{AreaSet, GeoPoint, NodeGraph, Polygon, Tour};

use crate::waypoint::{command, Waypoint, FRAME_GLOBAL_RELATIVE_ALT};

/// Acceptance radius (meters) on every emitted waypoint.
pub const POINT_ZONE: f64 = 2.0;

/// Fixed relative altitude (meters) for takeoff and coverage waypoints.
pub const TAKEOFF_ALT: f64 = 20.0;

/// Errors raised while interpreting a mission file as the area/agent DSL.
#[derive(Error, Debug)]
pub enum MissionError {
    #[error("a NAV_TAKEOFF waypoint has no matching NAV_LAND before the file ends")]
    UnterminatedArea,

    #[error("mission file declares no area (no NAV_TAKEOFF/NAV_LAND ring found)")]
    NoArea,
}

/// Parse the input mission's waypoint list into an [`AreaSet`] and the list
/// of agent start positions (§6, input semantics).
pub fn parse_input(waypoints: &[Waypoint]) -> Result<(AreaSet, Vec<GeoPoint>), MissionError> {
    let mut polygons = Vec::new();
    let mut starts = Vec::new();

    let mut i = 0;
    while i < waypoints.len() {
        let wp = waypoints[i];
        if wp.command == command::TAKEOFF {
            let mut ring = vec![GeoPoint::new(wp.lat, wp.lon)];
            let mut j = i + 1;
            let mut closed = false;
            while j < waypoints.len() {
                let next = waypoints[j];
                ring.push(GeoPoint::new(next.lat, next.lon));
                if next.command == command::LAND {
                    closed = true;
                    break;
                }
                j += 1;
            }
            if !closed {
                return Err(MissionError::UnterminatedArea);
            }
            polygons.push(Polygon::new(ring));
            i = j + 1;
        } else if wp.command == command::RETURN_TO_LAUNCH {
            starts.push(GeoPoint::new(wp.lat, wp.lon));
            i += 1;
        } else {
            i += 1;
        }
    }

    if polygons.is_empty() {
        return Err(MissionError::NoArea);
    }

    info!(
        areas = polygons.len(),
        agents = starts.len(),
        "parsed mission input"
    );

    Ok((AreaSet::new(polygons), starts))
}

/// Build one agent's mission waypoint list from its solved tour (§4.6):
/// a placeholder first waypoint at the depot, a TAKEOFF, one WAYPOINT per
/// node visited in tour order, and a LAND at the closing node (the depot).
pub fn build_agent_mission(nodes: &NodeGraph, tour: &Tour, depot: usize) -> Vec<Waypoint> {
    let depot_point = nodes.get(depot);

    let mut waypoints = vec![
        Waypoint {
            seq: 0,
            current: false,
            frame: FRAME_GLOBAL_RELATIVE_ALT,
            command: 0,
            param1: 0.0,
            param2: 0.0,
            param3: 0.0,
            param4: 0.0,
            lat: depot_point.lat,
            lon: depot_point.lon,
            alt: 0.0,
            autocontinue: true,
        },
        Waypoint {
            seq: 0,
            current: true,
            frame: FRAME_GLOBAL_RELATIVE_ALT,
            command: command::TAKEOFF,
            param1: 0.0,
            param2: 0.0,
            param3: 0.0,
            param4: 0.0,
            lat: depot_point.lat,
            lon: depot_point.lon,
            alt: TAKEOFF_ALT,
            autocontinue: true,
        },
    ];

    let mut last = depot_point;
    if tour.is_empty() {
        last = depot_point;
    } else {
        let mut node = depot;
        loop {
            node = tour.next(node).expect("tour is a closed cycle");
            let point = nodes.get(node);
            waypoints.push(Waypoint {
                seq: 0,
                current: false,
                frame: FRAME_GLOBAL_RELATIVE_ALT,
                command: command::WAYPOINT,
                param1: 0.0,
                param2: 0.0,
                param3: 0.0,
                param4: 0.0,
                lat: point.lat,
                lon: point.lon,
                alt: TAKEOFF_ALT,
                autocontinue: true,
            });
            last = point;
            if node == depot {
                break;
            }
        }
    }

    waypoints.push(Waypoint {
        seq: 0,
        current: false,
        frame: FRAME_GLOBAL_RELATIVE_ALT,
        command: command::LAND,
        param1: 0.0,
        param2: 0.0,
        param3: 0.0,
        param4: 0.0,
        lat: last.lat,
        lon: last.lon,
        alt: 0.0,
        autocontinue: true,
    });

    for (seq, wp) in waypoints.iter_mut().enumerate() {
        wp.seq = seq as u32;
    }

    waypoints
}
