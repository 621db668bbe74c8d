//! Reference Scenarios
//!
//! Waypoint sets used by the demo and the validation tests:
//! - A short three-waypoint hop with 2 s spacing
//! - A descending 18-state path as produced by the rigid-body path planner,
//!   timed at 2 s per state
//! - A coarse hop with uneven segment durations

use minsnap_core::{TimedWaypoint, Waypoint};

use crate::integration::assign_uniform_times;

/// Spacing between states of the reference path [s]
pub const REFERENCE_TIMESTEP: f64 = 2.0;

/// Descending path from the rigid-body planner as (x, y, z, yaw)
const DESCENT_PATH: [[f64; 4]; 18] = [
    [-1.0, 5.0, 1.0, 0.0],
    [-0.9105214656082087, 4.866527813557898, 0.9821609406403813, 0.02039080103534039],
    [-0.8225743363589189, 4.73288554489947, 0.964441662764501, 0.04077309721300639],
    [-0.7361272257466368, 4.5990008095166175, 0.946841139664208, 0.06113820463325185],
    [-0.6511925243577015, 4.464831726680945, 0.9293520786300249, 0.08147761001670759],
    [-0.5677385453806084, 4.3303072795034305, 0.9119680575644483, 0.10178299225536093],
    [-0.4857652247831987, 4.19536539455793, 0.8946893929748612, 0.12204500119949559],
    [-0.40523866600088, 4.05994725771634, 0.8775065705250998, 0.14225598708544368],
    [-0.3261547497876769, 3.923993481128284, 0.8604168009043632, 0.16240701194973708],
    [-0.2484752985307498, 3.78743548705188, 0.84341227981323, 0.1824899882345422],
    [-0.17219220053404993, 3.6502373470789204, 0.8264894614074699, 0.20249698043707148],
    [-0.09725801527295008, 3.51232995673728, 0.8096428181876703, 0.22241799607297275],
    [-0.02365621826047004, 3.37365871553904, 0.7928635266349502, 0.24224499181234838],
    [0.04864606691479989, 3.23417214717458, 0.7761488620638199, 0.2619709834334211],
    [0.11968750758167002, 3.0938169790745595, 0.75949244060815, 0.2815870183901405],
    [0.18949994071968002, 2.95253000758626, 0.7428843320283001, 0.3010839819518382],
    [0.2581249596866899, 2.8102848216266, 0.72632388402931, 0.32045501331803433],
    [0.32560330474396, 2.667021932848, 0.70980157478244, 0.3396910397023212],
];

/// Named waypoint set
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Scenario name
    pub name: &'static str,
    /// Timed waypoints, first at t = 0
    pub waypoints: Vec<TimedWaypoint>,
}

impl Scenario {
    /// Three waypoints 2 s apart
    pub fn three_waypoint() -> Self {
        Self {
            name: "three_waypoint",
            waypoints: vec![
                TimedWaypoint::at(-1.0, 5.0, 1.0, 0.0, 0.0),
                TimedWaypoint::at(-0.91, 4.87, 0.98, 0.02, 2.0),
                TimedWaypoint::at(-0.82, 4.73, 0.96, 0.04, 4.0),
            ],
        }
    }

    /// 18-state descending path, 34 s total
    pub fn descent() -> Self {
        Self {
            name: "descent",
            waypoints: assign_uniform_times(&descent_path(), REFERENCE_TIMESTEP),
        }
    }

    /// Climbing hop with 1 s and 2 s segments
    pub fn uneven_hop() -> Self {
        Self {
            name: "uneven_hop",
            waypoints: vec![
                TimedWaypoint::at(0.0, 0.0, 0.0, 0.0, 0.0),
                TimedWaypoint::at(2.0, 2.2, 0.3, 0.0, 1.0),
                TimedWaypoint::at(4.0, 8.0, 0.8, 0.0, 3.0),
            ],
        }
    }

    /// All built-in scenarios
    pub fn all() -> Vec<Self> {
        vec![Self::three_waypoint(), Self::descent(), Self::uneven_hop()]
    }

    /// Look up a built-in scenario by name
    pub fn by_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.name == name)
    }

    /// Total duration [s]
    pub fn duration(&self) -> f64 {
        self.waypoints.last().map_or(0.0, |wp| wp.t)
    }
}

/// Untimed states of the descending reference path
pub fn descent_path() -> Vec<Waypoint> {
    DESCENT_PATH
        .iter()
        .map(|&[x, y, z, yaw]| Waypoint::new(x, y, z, yaw))
        .collect()
}
