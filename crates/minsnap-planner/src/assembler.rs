//! Four-channel trajectory assembly
//!
//! Solves x, y, z and yaw over the same timed waypoints and bundles the
//! results into one [`Trajectory`]. The constraint matrix depends only on
//! the timestamps, so it is factored once and shared by every channel.

use std::thread;

use thiserror::Error;

use minsnap_core::{
    AxisTrajectory, AxisTrajectorySolver, Channel, SolverError, TimedWaypoint, Trajectory,
    TrajectoryError,
};

use crate::config::SolveConfig;

/// Assembly errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    #[error("Invalid waypoints: {0}")]
    Waypoints(#[source] SolverError),
    #[error("Failed to solve {channel} axis: {source}")]
    Axis {
        channel: Channel,
        #[source]
        source: SolverError,
    },
    #[error("Failed to bundle axes: {0}")]
    Bundle(#[from] TrajectoryError),
    #[error("Axis worker for {0} panicked")]
    WorkerPanicked(Channel),
}

impl AssemblyError {
    /// Underlying solver error, if any
    pub fn solver_error(&self) -> Option<&SolverError> {
        match self {
            Self::Waypoints(e) | Self::Axis { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

/// Builds trajectories from timed waypoints
#[derive(Debug, Clone, Default)]
pub struct TrajectoryAssembler {
    config: SolveConfig,
}

impl TrajectoryAssembler {
    pub fn new(config: SolveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolveConfig {
        &self.config
    }

    /// Solve every channel and bundle the result
    ///
    /// Any per-axis failure aborts the build; no partial trajectory is
    /// returned.
    pub fn build(&self, waypoints: &[TimedWaypoint]) -> Result<Trajectory, AssemblyError> {
        let solver = AxisTrajectorySolver::new(waypoints).map_err(AssemblyError::Waypoints)?;

        let [x, y, z, yaw] = if self.config.parallel_axes {
            Self::solve_parallel(&solver)?
        } else {
            Self::solve_sequential(&solver)?
        };

        let trajectory = Trajectory::new(x, y, z, yaw)?;
        log::info!(
            "Built trajectory: {} waypoints, {} segments, {:.3} s",
            waypoints.len(),
            trajectory.segment_count(),
            trajectory.duration()
        );
        Ok(trajectory)
    }

    fn solve_channel(
        solver: &AxisTrajectorySolver,
        channel: Channel,
    ) -> Result<AxisTrajectory, AssemblyError> {
        solver
            .solve(channel)
            .map_err(|source| AssemblyError::Axis { channel, source })
    }

    fn solve_sequential(
        solver: &AxisTrajectorySolver,
    ) -> Result<[AxisTrajectory; 4], AssemblyError> {
        Ok([
            Self::solve_channel(solver, Channel::X)?,
            Self::solve_channel(solver, Channel::Y)?,
            Self::solve_channel(solver, Channel::Z)?,
            Self::solve_channel(solver, Channel::Yaw)?,
        ])
    }

    fn solve_parallel(
        solver: &AxisTrajectorySolver,
    ) -> Result<[AxisTrajectory; 4], AssemblyError> {
        thread::scope(|s| {
            let handles = Channel::ALL.map(|channel| {
                (channel, s.spawn(move || Self::solve_channel(solver, channel)))
            });
            // Joined in channel order so the reported failure matches the
            // sequential path.
            let [x, y, z, yaw] = handles.map(|(channel, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(AssemblyError::WorkerPanicked(channel)))
            });
            Ok([x?, y?, z?, yaw?])
        })
    }
}

/// Build a trajectory with default settings
pub fn build_trajectory(waypoints: &[TimedWaypoint]) -> Result<Trajectory, AssemblyError> {
    TrajectoryAssembler::default().build(waypoints)
}
