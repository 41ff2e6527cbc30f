use thiserror::Error;

use covplan_algo::PlanError;
use covplan_io::MissionIoError;

/// Top-level error type for the CLI driver (§7), aggregating every stage's
/// failure mode so `main` has one place to map errors to an exit code.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    MissionIo(#[from] MissionIoError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

impl PlannerError {
    /// Process exit code for this failure (§6: non-zero on fatal
    /// infeasibility or I/O error).
    pub fn exit_code(&self) -> i32 {
        match self {
            PlannerError::Io(_) | PlannerError::MissionIo(_) => 2,
            PlannerError::Plan(_) => 1,
        }
    }
}
