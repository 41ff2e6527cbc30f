//! # covplan-algo: decomposition, assignment, and routing
//!
//! The planning pipeline proper: turn an [`covplan_core::AreaSet`] into a
//! grid of cells, partition the cells across agents, solve each agent's
//! coverage tour, and audit the result before it reaches the emitter.
//!
//! ## Modules
//!
//! - [`decompose`] — grid decomposition (§4.2).
//! - [`assign`] — min-max load-balancing partition (§4.3).
//! - [`route`] — per-agent Hamiltonian-cycle MILP (§4.4).
//! - [`audit`] — post-solve path statistics (§4.5).

pub mod assign;
pub mod audit;
pub mod decompose;
pub mod route;

pub use assign::{assign, AssignError};
pub use audit::{audit, AuditError, PathStats};
pub use decompose::{decompose, DecomposeError};
pub use route::{choose_depot, route, RouteError, RouteParams};

use thiserror::Error;

/// Aggregated error type for the decompose -> assign -> route -> audit
/// pipeline (§7).
#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Decompose(#[from] DecomposeError),

    #[error(transparent)]
    Assign(#[from] AssignError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}
