//! Integration with path planners
//!
//! Conversion utilities from planner output (untimed poses or waypoint
//! files) to the timed waypoints consumed by the trajectory solver.

use std::fs::File;
use std::path::Path;

use nalgebra::Vector3;
use serde::Deserialize;

use minsnap_core::{TimedWaypoint, Waypoint};

use crate::config::ConfigError;

/// Assign `t_i = i * timestep` to consecutive path states
pub fn assign_uniform_times(waypoints: &[Waypoint], timestep: f64) -> Vec<TimedWaypoint> {
    waypoints
        .iter()
        .enumerate()
        .map(|(i, wp)| TimedWaypoint::new(*wp, i as f64 * timestep))
        .collect()
}

/// Convert planner poses (position, yaw) to waypoints
pub fn waypoints_from_poses(poses: &[(Vector3<f64>, f64)]) -> Vec<Waypoint> {
    poses
        .iter()
        .map(|(position, yaw)| Waypoint::from_position(*position, *yaw))
        .collect()
}

/// Waypoint file layout: either a list of timed waypoints or an untimed
/// path with a fixed timestep
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WaypointFile {
    Timed {
        waypoints: Vec<TimedWaypoint>,
    },
    Path {
        timestep: f64,
        path: Vec<Waypoint>,
    },
}

impl WaypointFile {
    fn into_timed(self) -> Result<Vec<TimedWaypoint>, ConfigError> {
        match self {
            Self::Timed { waypoints } => Ok(waypoints),
            Self::Path { timestep, path } => {
                if !(timestep.is_finite() && timestep > 0.0) {
                    return Err(ConfigError::Invalid(format!(
                        "path timestep must be positive, got {timestep}"
                    )));
                }
                Ok(assign_uniform_times(&path, timestep))
            }
        }
    }
}

/// Parse timed waypoints from YAML
///
/// Accepts either
/// ```yaml
/// waypoints:
///   - { x: 0.0, y: 0.0, z: 1.0, yaw: 0.0, t: 0.0 }
/// ```
/// or an untimed path with uniform spacing
/// ```yaml
/// timestep: 2.0
/// path:
///   - { x: 0.0, y: 0.0, z: 1.0, yaw: 0.0 }
/// ```
pub fn parse_waypoints(yaml: &str) -> Result<Vec<TimedWaypoint>, ConfigError> {
    let file: WaypointFile = serde_yaml::from_str(yaml)?;
    file.into_timed()
}

/// Load timed waypoints from a YAML file
pub fn load_waypoints(path: impl AsRef<Path>) -> Result<Vec<TimedWaypoint>, ConfigError> {
    let file: WaypointFile = serde_yaml::from_reader(File::open(path)?)?;
    file.into_timed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_times() {
        let path = vec![Waypoint::new(0.0, 0.0, 1.0, 0.0); 4];
        let timed = assign_uniform_times(&path, 2.0);
        let times: Vec<f64> = timed.iter().map(|wp| wp.t).collect();
        assert_eq!(times, vec![0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_empty_path() {
        assert!(assign_uniform_times(&[], 1.0).is_empty());
    }

    #[test]
    fn test_from_poses() {
        let poses = vec![
            (Vector3::new(1.0, 2.0, 3.0), 0.5),
            (Vector3::new(-1.0, 0.0, 2.0), -0.5),
        ];
        let wps = waypoints_from_poses(&poses);
        assert_eq!(wps.len(), 2);
        assert_relative_eq!(wps[0].position(), poses[0].0);
        assert_relative_eq!(wps[1].yaw, -0.5);
    }

    #[test]
    fn test_parse_timed() {
        let yaml = "waypoints:\n  - { x: 0.0, y: 0.0, z: 1.0, yaw: 0.0, t: 0.0 }\n  - { x: 1.0, y: 2.0, z: 1.5, yaw: 0.1, t: 1.5 }\n";
        let wps = parse_waypoints(yaml).unwrap();
        assert_eq!(wps.len(), 2);
        assert_eq!(wps[1], TimedWaypoint::at(1.0, 2.0, 1.5, 0.1, 1.5));
    }

    #[test]
    fn test_parse_untimed_path() {
        let yaml = "timestep: 0.5\npath:\n  - { x: 0.0, y: 0.0, z: 1.0, yaw: 0.0 }\n  - { x: 1.0, y: 0.0, z: 1.0, yaw: 0.0 }\n  - { x: 2.0, y: 0.0, z: 1.0, yaw: 0.0 }\n";
        let wps = parse_waypoints(yaml).unwrap();
        assert_eq!(wps.len(), 3);
        assert_relative_eq!(wps[2].t, 1.0);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            parse_waypoints("timestep: 0.0\npath: []\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            parse_waypoints("something: else\n"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
