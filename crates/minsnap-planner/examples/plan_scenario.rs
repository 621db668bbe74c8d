//! Scenario Planning Demonstration
//!
//! Plans a minimum-snap trajectory through a built-in scenario (or a
//! waypoint file) and logs the sampled references.
//!
//! ```text
//! RUST_LOG=info cargo run --example plan_scenario -- [scenario|waypoints.yaml] [config.yaml]
//! ```

use std::env;
use std::process::ExitCode;

use minsnap_planner::config::PlannerConfig;
use minsnap_planner::integration::load_waypoints;
use minsnap_planner::sampling::decimate;
use minsnap_planner::{PlannerError, Scenario, TrajectoryPlanner};

fn run() -> Result<(), PlannerError> {
    let mut args = env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "descent".to_string());

    let config = match args.next() {
        Some(path) => PlannerConfig::from_file(&path)?,
        None => PlannerConfig::default(),
    };

    let waypoints = match Scenario::by_name(&source) {
        Some(scenario) => {
            log::info!("Using built-in scenario '{}'", scenario.name);
            scenario.waypoints
        }
        None => {
            log::info!("Loading waypoints from {source}");
            load_waypoints(&source)?
        }
    };

    let mut planner = TrajectoryPlanner::new(config)?;
    let trajectory = planner.plan(&waypoints)?;
    log::info!(
        "Planned {} segments over {:.2} s (knots {:?})",
        trajectory.segment_count(),
        trajectory.duration(),
        trajectory.knots()
    );

    let samples = planner.samples()?;
    // Log about one reference per second
    let stride = planner.config().sampling.rate_hz.round() as usize;
    for point in decimate(&samples, stride) {
        log::info!(
            "t={:6.2}  pos=[{:7.4}, {:7.4}, {:7.4}]  vel=[{:7.4}, {:7.4}, {:7.4}]  yaw={:7.4}",
            point.t,
            point.position.x,
            point.position.y,
            point.position.z,
            point.velocity.x,
            point.velocity.y,
            point.velocity.z,
            point.yaw
        );
    }
    log::info!("{} samples at {} Hz", samples.len(), planner.config().sampling.rate_hz);

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
