//! Min-max load-balancing partition of nodes across agents (§4.3).
//!
//! Grounded on `gat-algo::tep::solver`'s `good_lp` usage: a `variables!`
//! builder, a `minimise(...).using(...)` model, and `constraint!` macros
//! accumulated with `model.with(...)`. Unlike the TEP solver (which relaxes
//! its build decisions to continuous `[0, 1]` under `clarabel`), this stage
//! needs genuinely binary assignment variables, so it solves over HiGHS.

use good_lp::solvers::highs::highs;
use good_lp::{constraint, variable, variables, Expression, Solution, SolverModel};
use thiserror::Error;
use tracing::{debug, info};

use covplan_core::{GeoPoint, NodeGraph};

/// Errors raised while partitioning nodes across agents.
#[derive(Error, Debug)]
pub enum AssignError {
    /// There are nodes to cover but no agents to assign them to.
    #[error("no agents to assign {0} nodes to")]
    NoAgents(usize),

    /// The solver could not find a feasible assignment.
    #[error("unable to divide the area between agents: {0}")]
    Infeasible(String),
}

/// Solve the min-max assignment MILP and return, for each agent (in input
/// order), the list of node indices it owns (in node-index order).
pub fn assign(starts: &[GeoPoint], nodes: &NodeGraph) -> Result<Vec<Vec<usize>>, AssignError> {
    let n_agents = starts.len();
    let n_nodes = nodes.len();

    if n_agents == 0 {
        return Err(AssignError::NoAgents(n_nodes));
    }

    info!(n_agents, n_nodes, "solving min-max assignment");

    let dist: Vec<Vec<f64>> = starts
        .iter()
        .map(|start| nodes.iter().map(|(_, center)| start.distance(center)).collect())
        .collect();

    let mut vars = variables!();

    let z = vars.add(variable().min(0.0));
    let x: Vec<Vec<_>> = (0..n_agents)
        .map(|_| (0..n_nodes).map(|_| vars.add(variable().binary())).collect())
        .collect();

    let mut model = vars.minimise(z).using(highs);

    for a in 0..n_agents {
        let mut load = Expression::from(0.0);
        for i in 0..n_nodes {
            load += dist[a][i] * x[a][i];
        }
        model = model.with(constraint!(load <= z));
    }

    for i in 0..n_nodes {
        let mut coverage = Expression::from(0.0);
        for a in 0..n_agents {
            coverage += x[a][i];
        }
        model = model.with(constraint!(coverage == 1));
    }

    let solution = model
        .solve()
        .map_err(|e| AssignError::Infeasible(format!("{e:?}")))?;

    let mut assigned = vec![Vec::new(); n_agents];
    for i in 0..n_nodes {
        for a in 0..n_agents {
            if solution.value(x[a][i]) > 0.5 {
                assigned[a].push(i);
                break;
            }
        }
    }

    for (a, nodes) in assigned.iter().enumerate() {
        debug!(agent = a, load = nodes.len(), "assigned nodes");
    }

    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use covplan_core::NodeGraph;

    fn grid_nodes() -> NodeGraph {
        let mut nodes = NodeGraph::new();
        for i in 0..4 {
            for j in 0..4 {
                nodes.push(GeoPoint::new(i as f64 * 0.0001, j as f64 * 0.0001));
            }
        }
        nodes
    }

    #[test]
    fn every_node_is_assigned_exactly_once() {
        let nodes = grid_nodes();
        let starts = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0003, 0.0003),
        ];
        let assigned = assign(&starts, &nodes).expect("should assign");

        let mut seen = vec![0usize; nodes.len()];
        for subset in &assigned {
            for &i in subset {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn no_agents_is_an_error_when_nodes_exist() {
        let nodes = grid_nodes();
        assert!(matches!(
            assign(&[], &nodes),
            Err(AssignError::NoAgents(16))
        ));
    }

    #[test]
    fn two_symmetric_agents_get_balanced_load() {
        let nodes = grid_nodes();
        let starts = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0003, 0.0003),
        ];
        let assigned = assign(&starts, &nodes).expect("should assign");
        let diff = assigned[0].len() as i64 - assigned[1].len() as i64;
        assert!(diff.abs() <= 2);
    }
}
