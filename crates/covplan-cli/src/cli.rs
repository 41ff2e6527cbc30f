use std::path::PathBuf;

use clap::Parser;

use covplan_algo::RouteParams;

/// Plan coverage flights for a fleet of agents over a surveyed area.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the input mission file (QGC WPL, area rings + agent starts).
    pub input: PathBuf,

    /// Cell side length, in meters (§4.2).
    #[arg(long, default_value_t = 10.0)]
    pub dim: f64,

    /// Distance weight in the routing objective (§4.4.4).
    #[arg(long, default_value_t = 1.0)]
    pub lambda: f64,

    /// Turn-angle weight in the routing objective (§4.4.4).
    #[arg(long, default_value_t = 1.0)]
    pub gamma: f64,

    /// Forbidden-edge sentinel cost (§4.4.4).
    #[arg(long, default_value_t = 1_000_000_000)]
    pub kappa: i64,

    /// Integer cost scale factor (§4.4.4).
    #[arg(long, default_value_t = 100)]
    pub pcs: i64,

    /// Solver MIP gap tolerance (§4.4.4).
    #[arg(long, default_value_t = 0.01)]
    pub gap: f64,

    /// Solver time limit, in seconds, per agent (§4.4.4).
    #[arg(long, default_value_t = 1_000_000_000.0)]
    pub limit: f64,

    /// Directory to write per-agent mission files into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Worker thread count override, or "auto" to use all cores (§5).
    #[arg(long, default_value = "auto")]
    pub threads: String,

    /// Set the logging level.
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

impl Cli {
    /// Collect the routing tuning knobs into one [`RouteParams`] (§4.4.4).
    pub fn route_params(&self) -> RouteParams {
        RouteParams {
            dim: self.dim,
            lambda: self.lambda,
            gamma: self.gamma,
            kappa: self.kappa,
            pcs: self.pcs,
            gap: self.gap,
            limit: self.limit,
        }
    }
}
