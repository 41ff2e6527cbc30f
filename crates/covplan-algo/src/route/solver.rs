//! Per-agent Hamiltonian-cycle MILP with MTZ subtour elimination and a
//! linearized turn penalty (§4.4.1–§4.4.3).
//!
//! Grounded on `UBPlanner::planAgent` for the exact tensor/constraint
//! semantics, and on `gat-algo::tep::solver`'s `good_lp` scaffolding for how
//! to build and solve the model. The quadratic `x[i][j]*x[j][k]` term has no
//! counterpart in the teacher (TEP's objective is linear), so the
//! product-of-binaries linearization here is new code written in the same
//! `model.with(constraint!(...))` accumulation style.

use good_lp::solvers::highs::highs;
use good_lp::{constraint, variable, variables, Expression, Solution, SolverModel, Variable};
use thiserror::Error;
use tracing::debug;

use super::tensors::CostTensors;
use covplan_core::Tour;

/// Tuning parameters for one agent's routing solve (§4.4.4).
#[derive(Debug, Clone, Copy)]
pub struct RouteParams {
    pub dim: f64,
    pub lambda: f64,
    pub gamma: f64,
    pub kappa: i64,
    pub pcs: i64,
    pub gap: f64,
    pub limit: f64,
}

impl Default for RouteParams {
    fn default() -> Self {
        Self {
            dim: 10.0,
            lambda: 1.0,
            gamma: 1.0,
            kappa: 1_000_000_000,
            pcs: 100,
            gap: 0.01,
            limit: 1_000_000_000.0,
        }
    }
}

/// Errors raised while routing one agent's coverage tour.
#[derive(Error, Debug)]
pub enum RouteError {
    /// The depot index is out of range for the assigned subset.
    #[error("depot index {0} is out of range for {1} assigned nodes")]
    InvalidDepot(usize, usize),

    /// The solver failed outright (infeasible model, numeric failure, ...).
    #[error("routing solver failed: {0}")]
    SolverFailed(String),

    /// The solver returned a solution, but its objective implies a
    /// forbidden edge is in use (§4.4.2).
    #[error("routing objective {objective:.1} implies a forbidden edge (kappa = {kappa})")]
    ForbiddenEdge { objective: f64, kappa: i64 },
}

/// Solve the Hamiltonian-cycle MILP for one agent's assigned node subset.
///
/// `centers` are the agent's assigned node centers in local index order;
/// `depot` is the local index of the depot (closest assigned node to the
/// agent's start). Returns a `Tour` over local indices; the caller is
/// responsible for translating back to global node indices.
pub fn route(
    centers: &[covplan_core::GeoPoint],
    depot: usize,
    params: &RouteParams,
) -> Result<Tour, RouteError> {
    let n = centers.len();
    if depot >= n {
        return Err(RouteError::InvalidDepot(depot, n));
    }

    if n <= 1 {
        let mut tour = Tour::new();
        if n == 1 {
            tour.set_next(depot, depot);
        }
        return Ok(tour);
    }

    let tensors = CostTensors::build(centers, params.dim, params.pcs, params.kappa);

    let mut vars = variables!();

    let x: Vec<Vec<Option<Variable>>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        None
                    } else {
                        Some(vars.add(variable().binary()))
                    }
                })
                .collect()
        })
        .collect();

    let u: Vec<Option<Variable>> = (0..n)
        .map(|i| {
            if i == depot {
                None
            } else {
                Some(vars.add(variable().min(0.0)))
            }
        })
        .collect();

    // y[i][j][k] linearizes x[i][j] * x[j][k], only needed for j != depot
    // rows since the depot's wrap is excluded from the turn sum (§4.4.1).
    let mut y: Vec<Vec<Vec<Option<Variable>>>> = vec![vec![vec![None; n]; n]; n];
    for j in 0..n {
        if j == depot {
            continue;
        }
        for i in 0..n {
            if i == j {
                continue;
            }
            for k in 0..n {
                if k == j {
                    continue;
                }
                y[i][j][k] = Some(vars.add(variable().binary()));
            }
        }
    }

    let mut objective = Expression::from(0.0);
    for i in 0..n {
        for j in 0..n {
            if let Some(xij) = x[i][j] {
                objective += params.lambda * tensors.dist[i][j] as f64 * xij;
            }
        }
    }
    for j in 0..n {
        if j == depot {
            continue;
        }
        for i in 0..n {
            if i == j {
                continue;
            }
            for k in 0..n {
                if k == j {
                    continue;
                }
                if let Some(yijk) = y[i][j][k] {
                    objective += params.gamma * tensors.turn[i][j][k] as f64 * yijk;
                }
            }
        }
    }

    let mut model = vars.minimise(objective.clone()).using(highs);
    // Mirrors the original's `IloCplex::EpGap`/`TiLim` parameters (§4.4.4):
    // bound the relative MIP gap and wall-clock time for this agent's solve.
    model.set_option("mip_rel_gap", params.gap);
    model.set_option("time_limit", params.limit);

    // Unique predecessor / successor (§4.4.1 flow constraints).
    for j in 0..n {
        let mut flow_in = Expression::from(0.0);
        for i in 0..n {
            if let Some(xij) = x[i][j] {
                flow_in += xij;
            }
        }
        model = model.with(constraint!(flow_in == 1));
    }
    for i in 0..n {
        let mut flow_out = Expression::from(0.0);
        for j in 0..n {
            if let Some(xij) = x[i][j] {
                flow_out += xij;
            }
        }
        model = model.with(constraint!(flow_out == 1));
    }

    // MTZ subtour elimination.
    for i in 0..n {
        if i == depot {
            continue;
        }
        for j in 0..n {
            if j == depot || j == i {
                continue;
            }
            let ui = u[i].unwrap();
            let uj = u[j].unwrap();
            let xij = x[i][j].unwrap();
            model = model.with(constraint!(
                ui - uj + n as f64 * xij <= n as f64 - 1.0
            ));
        }
    }

    // Product-of-binaries linearization: y <= x[i][j], y <= x[j][k],
    // y >= x[i][j] + x[j][k] - 1.
    for j in 0..n {
        if j == depot {
            continue;
        }
        for i in 0..n {
            if i == j {
                continue;
            }
            for k in 0..n {
                if k == j {
                    continue;
                }
                let yijk = y[i][j][k].unwrap();
                let xij = x[i][j].unwrap();
                let xjk = x[j][k].unwrap();
                model = model.with(constraint!(yijk <= xij));
                model = model.with(constraint!(yijk <= xjk));
                model = model.with(constraint!(yijk >= xij + xjk - 1.0));
            }
        }
    }

    let solution = model
        .solve()
        .map_err(|e| RouteError::SolverFailed(format!("{e:?}")))?;

    let objective_value = solution.eval(&objective);
    if objective_value / params.pcs as f64 >= params.kappa as f64 {
        return Err(RouteError::ForbiddenEdge {
            objective: objective_value,
            kappa: params.kappa,
        });
    }

    let mut tour = Tour::new();
    for i in 0..n {
        for j in 0..n {
            if let Some(xij) = x[i][j] {
                if solution.value(xij) > 0.5 {
                    tour.set_next(i, j);
                    break;
                }
            }
        }
    }

    debug!(n, objective = objective_value, "agent tour solved");

    Ok(tour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use covplan_core::GeoPoint;

    fn square_grid(n: usize, step_deg: f64) -> Vec<GeoPoint> {
        let mut centers = Vec::new();
        for i in 0..n {
            for j in 0..n {
                centers.push(GeoPoint::new(i as f64 * step_deg, j as f64 * step_deg));
            }
        }
        centers
    }

    #[test]
    fn single_node_tour_is_trivial() {
        let centers = vec![GeoPoint::new(0.0, 0.0)];
        let params = RouteParams::default();
        let tour = route(&centers, 0, &params).expect("trivial tour");
        assert_eq!(tour.next(0), Some(0));
    }

    #[test]
    fn three_by_three_grid_routes_to_a_closed_cycle() {
        let centers = square_grid(3, 0.0001);
        let mut params = RouteParams::default();
        params.dim = 11.0; // roughly matches the degree step above
        let tour = route(&centers, 0, &params).expect("should route");

        let visited: Vec<(usize, usize)> = tour.walk(0).collect();
        assert_eq!(visited.len(), centers.len());

        let mut seen = vec![false; centers.len()];
        for (from, _) in &visited {
            assert!(!seen[*from]);
            seen[*from] = true;
        }
        assert!(seen.iter().all(|&v| v));
    }
}
