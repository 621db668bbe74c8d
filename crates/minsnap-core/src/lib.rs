//! # minsnap Core
//!
//! Minimum-snap piecewise polynomial trajectories for multirotor waypoint
//! following.
//!
//! Given timed waypoints for x, y, z and yaw, each channel is fitted
//! independently (differential flatness) with degree-7 segments that start
//! and end at rest and stay continuous through the 6th derivative at every
//! interior waypoint.
//!
//! ## Modules
//!
//! - [`math`]: Polynomials and piecewise polynomial curves
//! - [`waypoint`]: Waypoint and channel types
//! - [`solver`]: Per-axis constraint system construction and solve
//! - [`trajectory`]: Four-channel trajectory and sampled points

pub mod math;
pub mod waypoint;
pub mod solver;
pub mod trajectory;

pub use math::{EvalError, PiecewisePolynomial, Polynomial, POLY_COEFFS};
pub use solver::{solve_axis, AxisTrajectorySolver, SolverError};
pub use trajectory::{AxisTrajectory, Trajectory, TrajectoryError, TrajectoryPoint};
pub use waypoint::{Channel, TimedWaypoint, Waypoint};

use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// Absolute tolerance used when checking fitted trajectories
pub const FIT_TOLERANCE: f64 = 1e-6;
