//! Per-agent routing: depot selection plus the Hamiltonian-cycle MILP (§4.4).

pub mod solver;
pub mod tensors;

pub use solver::{route, RouteError, RouteParams};
pub use tensors::CostTensors;

use covplan_core::{GeoPoint, NodeGraph};

/// Pick the assigned node closest to the agent's start as its depot (§4.4,
/// depot selection). Returns the local index into `assigned`.
pub fn choose_depot(start: GeoPoint, assigned: &[usize], nodes: &NodeGraph) -> usize {
    assigned
        .iter()
        .enumerate()
        .min_by(|(_, &a), (_, &b)| {
            start
                .distance(nodes.get(a))
                .partial_cmp(&start.distance(nodes.get(b)))
                .expect("distances are always finite")
        })
        .map(|(local, _)| local)
        .unwrap_or(0)
}
