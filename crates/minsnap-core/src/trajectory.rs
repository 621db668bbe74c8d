//! Trajectory representation and sampling
//!
//! A [`Trajectory`] bundles one [`AxisTrajectory`] per channel on a shared
//! time base and samples them into [`TrajectoryPoint`]s for the tracking
//! side.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{EvalError, PiecewisePolynomial, Polynomial};
use crate::waypoint::Channel;

/// Trajectory assembly errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    #[error("Axis solved for {found} supplied as {expected}")]
    ChannelMismatch { expected: Channel, found: Channel },
    #[error("Axis {0} does not share the trajectory time base")]
    TimeBaseMismatch(Channel),
}

/// Single point on a trajectory with position and derivatives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Sample time [s]
    pub t: f64,
    /// Position [m]
    pub position: Vector3<f64>,
    /// Velocity [m/s]
    pub velocity: Vector3<f64>,
    /// Acceleration [m/s²]
    pub acceleration: Vector3<f64>,
    /// Jerk [m/s³]
    pub jerk: Vector3<f64>,
    /// Snap [m/s⁴]
    pub snap: Vector3<f64>,
    /// Yaw angle [rad]
    pub yaw: f64,
    /// Yaw rate [rad/s]
    pub yaw_rate: f64,
    /// Yaw acceleration [rad/s²]
    pub yaw_acceleration: f64,
}

impl Default for TrajectoryPoint {
    fn default() -> Self {
        Self {
            t: 0.0,
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            jerk: Vector3::zeros(),
            snap: Vector3::zeros(),
            yaw: 0.0,
            yaw_rate: 0.0,
            yaw_acceleration: 0.0,
        }
    }
}

impl TrajectoryPoint {
    /// True if every derivative is zero within `tolerance`
    pub fn is_at_rest(&self, tolerance: f64) -> bool {
        self.velocity.norm() <= tolerance
            && self.acceleration.norm() <= tolerance
            && self.jerk.norm() <= tolerance
            && self.yaw_rate.abs() <= tolerance
            && self.yaw_acceleration.abs() <= tolerance
    }
}

/// Solved curve for a single channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTrajectory {
    channel: Channel,
    curve: PiecewisePolynomial,
}

impl AxisTrajectory {
    pub fn new(channel: Channel, curve: PiecewisePolynomial) -> Self {
        Self { channel, curve }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Segment polynomials in local time
    pub fn segments(&self) -> &[Polynomial] {
        self.curve.segments()
    }

    /// Piecewise curve over global time
    pub fn curve(&self) -> &PiecewisePolynomial {
        &self.curve
    }

    /// Evaluate the `order`-th derivative at global time t
    pub fn evaluate(&self, t: f64, order: usize) -> Result<f64, EvalError> {
        self.curve.evaluate(t, order)
    }
}

/// Four-channel trajectory on one time base
///
/// Built once per planning request and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    x: AxisTrajectory,
    y: AxisTrajectory,
    z: AxisTrajectory,
    yaw: AxisTrajectory,
}

impl Trajectory {
    /// Bundle four axes, checking channel assignment and shared knots
    pub fn new(
        x: AxisTrajectory,
        y: AxisTrajectory,
        z: AxisTrajectory,
        yaw: AxisTrajectory,
    ) -> Result<Self, TrajectoryError> {
        let knots = x.curve.knots();
        for (expected, axis) in Channel::ALL.into_iter().zip([&x, &y, &z, &yaw]) {
            if axis.channel != expected {
                return Err(TrajectoryError::ChannelMismatch {
                    expected,
                    found: axis.channel,
                });
            }
            if axis.curve.knots() != knots {
                return Err(TrajectoryError::TimeBaseMismatch(expected));
            }
        }
        Ok(Self { x, y, z, yaw })
    }

    pub fn axis(&self, channel: Channel) -> &AxisTrajectory {
        match channel {
            Channel::X => &self.x,
            Channel::Y => &self.y,
            Channel::Z => &self.z,
            Channel::Yaw => &self.yaw,
        }
    }

    /// Evaluate one channel's `order`-th derivative at time t
    pub fn evaluate(&self, channel: Channel, t: f64, order: usize) -> Result<f64, EvalError> {
        self.axis(channel).evaluate(t, order)
    }

    /// Knot times shared by all channels
    pub fn knots(&self) -> &[f64] {
        self.x.curve.knots()
    }

    pub fn segment_count(&self) -> usize {
        self.x.curve.segment_count()
    }

    pub fn start_time(&self) -> f64 {
        self.x.curve.start_time()
    }

    pub fn end_time(&self) -> f64 {
        self.x.curve.end_time()
    }

    /// Total trajectory duration
    pub fn duration(&self) -> f64 {
        self.x.curve.duration()
    }

    /// Check if time is within trajectory bounds
    pub fn is_within(&self, t: f64) -> bool {
        t >= self.start_time() && t <= self.end_time()
    }

    fn vector(&self, t: f64, order: usize) -> Result<Vector3<f64>, EvalError> {
        Ok(Vector3::new(
            self.x.evaluate(t, order)?,
            self.y.evaluate(t, order)?,
            self.z.evaluate(t, order)?,
        ))
    }

    /// Sample position through snap and yaw derivatives at time t
    pub fn sample(&self, t: f64) -> Result<TrajectoryPoint, EvalError> {
        Ok(TrajectoryPoint {
            t,
            position: self.vector(t, 0)?,
            velocity: self.vector(t, 1)?,
            acceleration: self.vector(t, 2)?,
            jerk: self.vector(t, 3)?,
            snap: self.vector(t, 4)?,
            yaw: self.yaw.evaluate(t, 0)?,
            yaw_rate: self.yaw.evaluate(t, 1)?,
            yaw_acceleration: self.yaw.evaluate(t, 2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn constant_axis(channel: Channel, value: f64, knots: Vec<f64>) -> AxisTrajectory {
        let segments = vec![Polynomial::from_slice(&[value]).unwrap(); knots.len() - 1];
        AxisTrajectory::new(
            channel,
            PiecewisePolynomial::from_knots(segments, knots).unwrap(),
        )
    }

    fn hover_trajectory(position: Vector3<f64>, yaw: f64, duration: f64) -> Trajectory {
        let knots = vec![0.0, duration];
        Trajectory::new(
            constant_axis(Channel::X, position.x, knots.clone()),
            constant_axis(Channel::Y, position.y, knots.clone()),
            constant_axis(Channel::Z, position.z, knots.clone()),
            constant_axis(Channel::Yaw, yaw, knots),
        )
        .unwrap()
    }

    #[test]
    fn test_hover_trajectory() {
        let pos = Vector3::new(1.0, 2.0, 3.0);
        let traj = hover_trajectory(pos, 0.5, 10.0);

        let p0 = traj.sample(0.0).unwrap();
        let p5 = traj.sample(5.0).unwrap();
        let p10 = traj.sample(10.0).unwrap();

        assert_relative_eq!(p0.position, pos, epsilon = 1e-10);
        assert_relative_eq!(p5.position, pos, epsilon = 1e-10);
        assert_relative_eq!(p10.position, pos, epsilon = 1e-10);
        assert_relative_eq!(p5.yaw, 0.5, epsilon = 1e-10);
        assert!(p5.is_at_rest(1e-12));
        assert_eq!(
            p5,
            TrajectoryPoint {
                t: 5.0,
                position: pos,
                yaw: 0.5,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_no_extrapolation() {
        let traj = hover_trajectory(Vector3::new(1.0, 2.0, 3.0), 0.0, 5.0);
        assert!(traj.sample(-1.0).is_err());
        assert!(traj.sample(5.5).is_err());
        assert!(traj.is_within(5.0));
        assert!(!traj.is_within(5.5));
        assert_relative_eq!(traj.duration(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let knots = vec![0.0, 1.0];
        let result = Trajectory::new(
            constant_axis(Channel::Y, 0.0, knots.clone()),
            constant_axis(Channel::X, 0.0, knots.clone()),
            constant_axis(Channel::Z, 0.0, knots.clone()),
            constant_axis(Channel::Yaw, 0.0, knots),
        );
        assert_eq!(
            result.unwrap_err(),
            TrajectoryError::ChannelMismatch {
                expected: Channel::X,
                found: Channel::Y
            }
        );
    }

    #[test]
    fn test_time_base_mismatch_rejected() {
        let result = Trajectory::new(
            constant_axis(Channel::X, 0.0, vec![0.0, 1.0]),
            constant_axis(Channel::Y, 0.0, vec![0.0, 1.0]),
            constant_axis(Channel::Z, 0.0, vec![0.0, 2.0]),
            constant_axis(Channel::Yaw, 0.0, vec![0.0, 1.0]),
        );
        assert_eq!(
            result.unwrap_err(),
            TrajectoryError::TimeBaseMismatch(Channel::Z)
        );
    }
}
