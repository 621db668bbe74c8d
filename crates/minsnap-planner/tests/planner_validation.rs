//! Planner Validation Tests
//!
//! End-to-end checks of the planning front-end on the reference scenarios:
//! four-channel assembly, sampling, and error propagation.

use approx::assert_relative_eq;

use minsnap_core::{Channel, SolverError, TimedWaypoint, FIT_TOLERANCE};
use minsnap_planner::config::{PlannerConfig, SolveConfig};
use minsnap_planner::integration::parse_waypoints;
use minsnap_planner::sampling::sample_uniform;
use minsnap_planner::{
    build_trajectory, AssemblyError, PlannerError, PlannerState, Scenario, TrajectoryAssembler,
    TrajectoryPlanner,
};

/// Reference scenarios solved by the assembler
mod scenario_tests {
    use super::*;

    #[test]
    fn test_three_waypoint_scenario() {
        let scenario = Scenario::three_waypoint();
        let traj = build_trajectory(&scenario.waypoints).unwrap();

        assert_eq!(traj.segment_count(), 2);
        assert_relative_eq!(traj.evaluate(Channel::X, 0.0, 0).unwrap(), -1.0, epsilon = FIT_TOLERANCE);
        assert_relative_eq!(traj.evaluate(Channel::X, 4.0, 0).unwrap(), -0.82, epsilon = FIT_TOLERANCE);
        assert_relative_eq!(traj.evaluate(Channel::Y, 2.0, 0).unwrap(), 4.87, epsilon = FIT_TOLERANCE);
        assert_relative_eq!(traj.evaluate(Channel::Yaw, 4.0, 0).unwrap(), 0.04, epsilon = FIT_TOLERANCE);
        for channel in Channel::ALL {
            assert_relative_eq!(traj.evaluate(channel, 0.0, 1).unwrap(), 0.0, epsilon = FIT_TOLERANCE);
            assert_relative_eq!(traj.evaluate(channel, 4.0, 1).unwrap(), 0.0, epsilon = FIT_TOLERANCE);
        }
    }

    #[test]
    fn test_descent_interpolates_all_states() {
        let scenario = Scenario::descent();
        let traj = build_trajectory(&scenario.waypoints).unwrap();

        assert_eq!(traj.segment_count(), 17);
        assert_relative_eq!(traj.duration(), 34.0);
        for wp in &scenario.waypoints {
            let point = traj.sample(wp.t).unwrap();
            assert_relative_eq!(point.position, wp.waypoint.position(), epsilon = FIT_TOLERANCE);
            assert_relative_eq!(point.yaw, wp.waypoint.yaw, epsilon = FIT_TOLERANCE);
        }
    }

    #[test]
    fn test_uneven_hop_rest_to_rest() {
        let scenario = Scenario::uneven_hop();
        let traj = build_trajectory(&scenario.waypoints).unwrap();

        assert!(traj.sample(0.0).unwrap().is_at_rest(FIT_TOLERANCE));
        assert!(traj.sample(3.0).unwrap().is_at_rest(FIT_TOLERANCE));
        assert!(!traj.sample(1.0).unwrap().is_at_rest(FIT_TOLERANCE));
    }
}

/// Sequential and threaded solving
mod assembly_tests {
    use super::*;

    #[test]
    fn test_parallel_matches_sequential() {
        for scenario in Scenario::all() {
            let sequential = TrajectoryAssembler::default().build(&scenario.waypoints).unwrap();
            let parallel = TrajectoryAssembler::new(SolveConfig {
                parallel_axes: true,
            })
            .build(&scenario.waypoints)
            .unwrap();
            assert_eq!(sequential, parallel, "scenario {}", scenario.name);
        }
    }

    #[test]
    fn test_knots_shared_across_channels() {
        let traj = build_trajectory(&Scenario::uneven_hop().waypoints).unwrap();
        for channel in Channel::ALL {
            assert_eq!(traj.axis(channel).curve().knots(), &[0.0, 1.0, 3.0]);
            assert_eq!(traj.axis(channel).channel(), channel);
        }
    }

    #[test]
    fn test_non_finite_yaw_names_field() {
        let wps = vec![
            TimedWaypoint::at(0.0, 0.0, 0.0, 0.0, 0.0),
            TimedWaypoint::at(1.0, 0.0, 0.0, f64::NAN, 1.0),
        ];
        let err = build_trajectory(&wps).unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::Waypoints(SolverError::NonFiniteValue { index: 1, .. })
        ));
    }
}

/// Fixed-rate sampling of assembled trajectories
mod sampling_tests {
    use super::*;

    #[test]
    fn test_descent_sampled_at_default_rate() {
        let traj = build_trajectory(&Scenario::descent().waypoints).unwrap();
        let samples = sample_uniform(&traj, 50.0).unwrap();

        // 34 s at 50 Hz plus the end point
        assert_eq!(samples.len(), 1701);
        assert_eq!(samples[0].t, 0.0);
        assert_eq!(samples[samples.len() - 1].t, 34.0);
        assert!(samples.windows(2).all(|w| w[1].t > w[0].t));
    }

    #[test]
    fn test_samples_are_continuous() {
        let traj = build_trajectory(&Scenario::three_waypoint().waypoints).unwrap();
        let samples = sample_uniform(&traj, 200.0).unwrap();

        for w in samples.windows(2) {
            assert!((w[1].position - w[0].position).norm() < 1e-2);
            assert!((w[1].velocity - w[0].velocity).norm() < 1e-2);
        }
    }
}

/// Stateful planner behaviour
mod planner_tests {
    use super::*;

    #[test]
    fn test_plan_from_yaml() {
        let config = PlannerConfig::from_yaml_str("timing:\n  timestep: 1.0\nsampling:\n  rate_hz: 10.0\n")
            .unwrap();
        let mut planner = TrajectoryPlanner::new(config).unwrap();

        let wps = parse_waypoints(
            "timestep: 1.0\npath:\n  - { x: 0.0, y: 0.0, z: 1.0, yaw: 0.0 }\n  - { x: 1.0, y: 1.0, z: 1.5, yaw: 0.5 }\n",
        )
        .unwrap();
        planner.plan(&wps).unwrap();

        let samples = planner.samples().unwrap();
        assert_eq!(samples.len(), 11);
        assert_relative_eq!(samples[10].position.z, 1.5, epsilon = FIT_TOLERANCE);
    }

    #[test]
    fn test_rejected_request_reports_state() {
        let mut planner = TrajectoryPlanner::new(PlannerConfig::default()).unwrap();
        planner.plan(&Scenario::three_waypoint().waypoints).unwrap();

        let wps = vec![
            TimedWaypoint::at(0.0, 0.0, 0.0, 0.0, 0.0),
            TimedWaypoint::at(1.0, 0.0, 0.0, 0.0, 2.0),
            TimedWaypoint::at(2.0, 0.0, 0.0, 0.0, 2.0),
        ];
        let err = planner.plan(&wps).unwrap_err();
        assert!(matches!(
            err,
            PlannerError::Assembly(AssemblyError::Waypoints(SolverError::SingularSystem(_)))
        ));
        assert_eq!(planner.state(), PlannerState::Error);

        // Previous trajectory still serves references
        let reference = planner.reference_at(2.0).unwrap();
        assert_relative_eq!(reference.position.y, 4.87, epsilon = FIT_TOLERANCE);
    }

    #[test]
    fn test_reference_outside_span() {
        let mut planner = TrajectoryPlanner::new(PlannerConfig::default()).unwrap();
        planner.plan(&Scenario::three_waypoint().waypoints).unwrap();
        assert!(matches!(planner.reference_at(4.5), Err(PlannerError::Eval(_))));
    }
}
