use std::fs::{self, File};
use std::io::BufReader;
use std::time::Instant;

use clap::Parser;
use rayon::ThreadPoolBuilder;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;
mod error;

use cli::Cli;
use error::PlannerError;

use covplan_algo::{assign, audit, choose_depot, decompose, route};
use covplan_io::{build_agent_mission, mission, waypoint};

fn configure_threads(spec: &str) {
    let count = if spec.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        spec.parse().unwrap_or_else(|_| num_cpus::get())
    };
    let _ = ThreadPoolBuilder::new().num_threads(count).build_global();
}

fn run(cli: &Cli) -> Result<(), PlannerError> {
    configure_threads(&cli.threads);

    let total_time = Instant::now();

    let file = File::open(&cli.input)?;
    let waypoints = waypoint::read(BufReader::new(file)).map_err(covplan_io::MissionIoError::from)?;
    let (areas, starts) = mission::parse_input(&waypoints).map_err(covplan_io::MissionIoError::from)?;

    info!(agents = starts.len(), "loaded mission");

    let (nodes, _cells) = decompose(&areas, cli.dim).map_err(covplan_algo::PlanError::from)?;
    info!(nodes = nodes.len(), "decomposed survey area");

    let assigned = assign(&starts, &nodes).map_err(covplan_algo::PlanError::from)?;

    fs::create_dir_all(&cli.out_dir)?;

    let route_params = cli.route_params();

    for (agent_index, node_indices) in assigned.iter().enumerate() {
        let agent_time = Instant::now();

        let centers: Vec<_> = node_indices.iter().map(|&i| nodes.get(i)).collect();
        let local_depot = choose_depot(starts[agent_index], node_indices, &nodes);

        let local_tour =
            route(&centers, local_depot, &route_params).map_err(covplan_algo::PlanError::from)?;

        // Translate the local (subset-relative) tour back into global node
        // indices so the audit and emitter work in the same index space as
        // `nodes`.
        let mut global_tour = covplan_core::Tour::new();
        for (local_from, &global_from) in node_indices.iter().enumerate() {
            if let Some(local_to) = local_tour.next(local_from) {
                global_tour.set_next(global_from, node_indices[local_to]);
            }
        }
        let global_depot = node_indices[local_depot];

        let stats = audit(&nodes, &global_tour, global_depot, cli.dim)
            .map_err(covplan_algo::PlanError::from)?;
        info!(
            agent = agent_index,
            total_distance_m = stats.total_distance_m,
            total_turn_rad = stats.total_turn_rad,
            elapsed_s = agent_time.elapsed().as_secs_f64(),
            "agent routed and audited"
        );

        let agent_mission = build_agent_mission(&nodes, &global_tour, global_depot);
        let out_path = cli.out_dir.join(format!("mission_{agent_index}.txt"));
        let out_file = File::create(&out_path)?;
        waypoint::write(out_file, &agent_mission).map_err(covplan_io::MissionIoError::from)?;
    }

    info!(
        elapsed_s = total_time.elapsed().as_secs_f64(),
        "planning complete"
    );

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_string()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    if let Err(err) = run(&cli) {
        error!("{err}");
        std::process::exit(err.exit_code());
    }
}
