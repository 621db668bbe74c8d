//! minsnap Planner
//!
//! Planning front-end for minimum-snap trajectories.
//!
//! Takes waypoint paths (timed, or untimed with a fixed timestep), solves
//! all four flat outputs with [`minsnap_core`] and serves reference points
//! to a tracking controller.
//!
//! # Components
//!
//! - [`config`]: YAML-backed planner configuration
//! - [`assembler`]: Four-channel trajectory construction
//! - [`integration`]: Conversion from path planner output and waypoint files
//! - [`sampling`]: Fixed-rate sampling of trajectories
//! - [`controller`]: Stateful trajectory planner
//! - [`scenarios`]: Reference waypoint sets

pub mod config;
pub mod assembler;
pub mod integration;
pub mod sampling;
pub mod controller;
pub mod scenarios;

// Re-exports
pub use assembler::{build_trajectory, AssemblyError, TrajectoryAssembler};
pub use config::{ConfigError, PlannerConfig};
pub use controller::{PlannerError, PlannerState, TrajectoryPlanner};
pub use scenarios::Scenario;
