//! Waypoint types
//!
//! A waypoint carries one target value per controlled channel
//! (x, y, z, yaw). Trajectory requests are sequences of timed waypoints.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Independently solved output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    X,
    Y,
    Z,
    Yaw,
}

impl Channel {
    /// All channels in solve order
    pub const ALL: [Channel; 4] = [Channel::X, Channel::Y, Channel::Z, Channel::Yaw];

    pub fn name(self) -> &'static str {
        match self {
            Channel::X => "x",
            Channel::Y => "y",
            Channel::Z => "z",
            Channel::Yaw => "yaw",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target position [m] and heading [rad]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, z: f64, yaw: f64) -> Self {
        Self { x, y, z, yaw }
    }

    /// Build from a position vector and heading
    pub fn from_position(position: Vector3<f64>, yaw: f64) -> Self {
        Self::new(position.x, position.y, position.z, yaw)
    }

    /// Value of one channel
    pub fn channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::X => self.x,
            Channel::Y => self.y,
            Channel::Z => self.z,
            Channel::Yaw => self.yaw,
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// First channel holding NaN or infinity, if any
    pub fn non_finite_channel(&self) -> Option<Channel> {
        Channel::ALL
            .into_iter()
            .find(|&c| !self.channel(c).is_finite())
    }
}

/// Waypoint with the absolute time [s] it must be reached at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedWaypoint {
    #[serde(flatten)]
    pub waypoint: Waypoint,
    pub t: f64,
}

impl TimedWaypoint {
    pub fn new(waypoint: Waypoint, t: f64) -> Self {
        Self { waypoint, t }
    }

    /// Shorthand for `TimedWaypoint::new(Waypoint::new(x, y, z, yaw), t)`
    pub fn at(x: f64, y: f64, z: f64, yaw: f64, t: f64) -> Self {
        Self::new(Waypoint::new(x, y, z, yaw), t)
    }

    pub fn channel(&self, channel: Channel) -> f64 {
        self.waypoint.channel(channel)
    }
}
