//! Trajectory Planner
//!
//! Main interface for turning waypoint requests into reference
//! trajectories for the onboard tracking controllers.

use std::collections::VecDeque;
use std::sync::Arc;

use thiserror::Error;

use minsnap_core::{EvalError, TimedWaypoint, Trajectory, TrajectoryPoint, Waypoint};

use crate::assembler::{AssemblyError, TrajectoryAssembler};
use crate::config::{ConfigError, PlannerConfig};
use crate::integration::assign_uniform_times;
use crate::sampling::{sample_uniform, SamplingError};

/// Trajectory planner errors
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),
    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),
    #[error("No valid trajectory available")]
    NoValidTrajectory,
}

/// Trajectory planner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerState {
    /// No trajectory planned yet
    Idle,
    /// Holding a valid trajectory
    Ready,
    /// Last request was rejected
    Error,
}

/// Waypoint-to-trajectory planner
///
/// Each successful request replaces the current trajectory wholesale.
/// A rejected request leaves the previous trajectory in place, so
/// references already handed out stay valid.
pub struct TrajectoryPlanner {
    /// Planner configuration
    config: PlannerConfig,
    /// Builds trajectories from waypoints
    assembler: TrajectoryAssembler,
    /// Current planner state
    state: PlannerState,
    /// Current trajectory
    trajectory: Option<Arc<Trajectory>>,
    /// Previously planned trajectories, oldest first
    history: VecDeque<Arc<Trajectory>>,
    /// Maximum history size
    max_history: usize,
}

impl TrajectoryPlanner {
    /// Create a new planner
    pub fn new(config: PlannerConfig) -> Result<Self, PlannerError> {
        config.validate()?;
        let assembler = TrajectoryAssembler::new(config.solve.clone());
        Ok(Self {
            config,
            assembler,
            state: PlannerState::Idle,
            trajectory: None,
            history: VecDeque::new(),
            max_history: 10,
        })
    }

    /// Plan through timed waypoints
    pub fn plan(&mut self, waypoints: &[TimedWaypoint]) -> Result<Arc<Trajectory>, PlannerError> {
        match self.assembler.build(waypoints) {
            Ok(trajectory) => {
                let trajectory = Arc::new(trajectory);
                if let Some(previous) = self.trajectory.replace(Arc::clone(&trajectory)) {
                    if self.history.len() >= self.max_history {
                        self.history.pop_front();
                    }
                    self.history.push_back(previous);
                }
                self.state = PlannerState::Ready;
                Ok(trajectory)
            }
            Err(e) => {
                log::warn!("Rejected planning request: {e}");
                self.state = PlannerState::Error;
                Err(e.into())
            }
        }
    }

    /// Plan through untimed path states spaced by the configured timestep
    pub fn plan_path(&mut self, path: &[Waypoint]) -> Result<Arc<Trajectory>, PlannerError> {
        let timed = assign_uniform_times(path, self.config.timing.timestep);
        self.plan(&timed)
    }

    /// Reference point on the current trajectory at time t
    pub fn reference_at(&self, t: f64) -> Result<TrajectoryPoint, PlannerError> {
        let trajectory = self.trajectory.as_ref().ok_or(PlannerError::NoValidTrajectory)?;
        Ok(trajectory.sample(t)?)
    }

    /// Current trajectory sampled at the configured rate
    pub fn samples(&self) -> Result<Vec<TrajectoryPoint>, PlannerError> {
        let trajectory = self.trajectory.as_ref().ok_or(PlannerError::NoValidTrajectory)?;
        Ok(sample_uniform(trajectory, self.config.sampling.rate_hz)?)
    }

    /// Get current planner state
    pub fn state(&self) -> PlannerState {
        self.state
    }

    /// Get current trajectory (if any)
    pub fn trajectory(&self) -> Option<Arc<Trajectory>> {
        self.trajectory.clone()
    }

    /// Previously planned trajectories, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Trajectory> {
        self.history.iter().map(|t| t.as_ref())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Time left on the current trajectory at time t
    pub fn remaining_time(&self, t: f64) -> f64 {
        self.trajectory
            .as_ref()
            .map(|traj| (traj.end_time() - t).max(0.0))
            .unwrap_or(0.0)
    }

    /// Reset the planner
    pub fn reset(&mut self) {
        self.state = PlannerState::Idle;
        self.trajectory = None;
        self.history.clear();
    }
}
