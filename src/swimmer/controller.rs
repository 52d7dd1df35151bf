//! A swimmer whose joints follow parameterized reference trajectories.

use std::f32::consts::PI;

use tracing::{debug, trace};

use crate::config::{Stroke, SwimmerConfig};
use crate::control_strategies::pd::track_trajectory;
use crate::control_strategies::{Character, DebugDraw};
use crate::error::{ConfigError, ControlError};
use crate::multibody_util::{multibody_link_position, JointActuator};
use crate::physics::PhysicsWorld;
use crate::swimmer::joint_map::{
    BodySide, JointTorques, PeriodicJoint, PeriodicJointMap, SideMap, NUM_CONTROLLED_JOINTS,
};
use crate::swimmer::SwimmerBodyPartIndex;
use crate::trajectory::{Trajectory, PARAMS_PER_PERIODIC_TERM};

/// Drives a [`SwimmerBodyPartIndex`] with one trajectory per joint.
///
/// The control vector only reaches the periodic trajectories of the neck and of the
/// right side. Left trajectories reuse the right side's slice, shifted by half a
/// cycle when swimming the crawl. The shoulders follow a fixed ramp.
#[derive(Debug, Clone)]
pub struct ReferenceTrajectorySwimmer {
    config: SwimmerConfig,
    swimmer: SwimmerBodyPartIndex,
    shoulders: SideMap<Trajectory>,
    periodic: PeriodicJointMap<Trajectory>,
    control_params: Vec<f32>,
    last_torques: JointTorques,
    prev_torque: f32,
}

impl ReferenceTrajectorySwimmer {
    /// Bind a trajectory to every joint of an already spawned swimmer.
    pub fn new(config: SwimmerConfig, swimmer: SwimmerBodyPartIndex) -> Result<Self, ConfigError> {
        config.validate()?;

        let slope = config.shoulder_slope();
        let shoulders = SideMap::from_fn(|side| {
            Trajectory::polynomial_from(swimmer.shoulder_joint(side), vec![0.0, slope])
        });

        let periodic = PeriodicJointMap::from_fn(|joint| {
            Trajectory::periodic(swimmer.periodic_joint(joint), config.basis_count)
        });

        Ok(ReferenceTrajectorySwimmer {
            config,
            swimmer,
            shoulders,
            periodic,
            control_params: Vec::new(),
            last_torques: JointTorques::zero(),
            prev_torque: 0.0,
        })
    }

    pub fn params_per_trajectory(&self) -> usize {
        self.config.basis_count * PARAMS_PER_PERIODIC_TERM
    }

    pub fn config(&self) -> &SwimmerConfig {
        &self.config
    }

    pub fn body_parts(&self) -> &SwimmerBodyPartIndex {
        &self.swimmer
    }

    pub fn periodic_trajectory(&self, joint: PeriodicJoint) -> &Trajectory {
        &self.periodic[joint]
    }

    pub fn shoulder_trajectory(&self, side: BodySide) -> &Trajectory {
        &self.shoulders[side]
    }

    /// The last control vector that was accepted.
    pub fn control_params(&self) -> &[f32] {
        &self.control_params
    }

    /// Per-joint torques of the last tick that did something.
    pub fn last_torques(&self) -> &JointTorques {
        &self.last_torques
    }

    /// Start of the slice of the control vector feeding `joint`.
    fn params_start(&self, joint: PeriodicJoint) -> usize {
        joint.control_slot() * self.params_per_trajectory()
    }

    /// Shoulders first, then the periodic joints in assembly order. Stops at the first failure.
    fn track_all(
        &self,
        world: &mut dyn JointActuator,
        runtime: f32,
        dt: f32,
        torques: &mut JointTorques,
    ) -> Result<(), ControlError> {
        let gains = self.config.gains;
        for (side, trajectory) in self.shoulders.iter() {
            torques.shoulders[side] = track_trajectory(world, trajectory, &gains, runtime, dt)?;
        }
        for (joint, trajectory) in self.periodic.iter() {
            torques.periodic[joint] = track_trajectory(world, trajectory, &gains, runtime, dt)?;
        }
        Ok(())
    }

    fn phase_shift(&self, joint: PeriodicJoint) -> f32 {
        match (self.config.stroke, joint.side()) {
            (Stroke::Crawl, Some(BodySide::Left)) => PI,
            _ => 0.0,
        }
    }
}

impl Character for ReferenceTrajectorySwimmer {
    fn num_control_dimensions(&self) -> usize {
        NUM_CONTROLLED_JOINTS * self.params_per_trajectory()
    }

    fn set_control_params(&mut self, params: &[f32]) -> Result<(), ControlError> {
        let expected = self.num_control_dimensions();
        if params.len() != expected {
            return Err(ControlError::DimensionMismatch {
                expected,
                actual: params.len(),
            });
        }

        let per_traj = self.params_per_trajectory();
        for joint in PeriodicJoint::ALL.iter().copied() {
            let start = self.params_start(joint);
            let shift = self.phase_shift(joint);
            let slice = &params[start..start + per_traj];

            for (term, raw) in slice.chunks_exact(PARAMS_PER_PERIODIC_TERM).enumerate() {
                self.periodic[joint].set_periodic_term(term, raw[0], raw[1], raw[2] + shift)?;
            }
        }

        self.control_params.clear();
        self.control_params.extend_from_slice(params);

        debug!(dims = expected, stroke = %self.config.stroke, "applied control params");
        Ok(())
    }

    fn step(&mut self, world: &mut dyn JointActuator, dt: f32, runtime: f32) -> Result<(), ControlError> {
        if dt == 0.0 {
            return Ok(());
        }

        let mut torques = JointTorques::zero();
        let tracked = self.track_all(world, runtime, dt, &mut torques);

        // Joints before a failing one have already been pushed, so their torques count.
        self.prev_torque = torques.total();
        self.last_torques = torques;
        tracked?;

        trace!(runtime, torque = self.prev_torque, "swimmer step");
        Ok(())
    }

    fn prev_torque(&self) -> f32 {
        self.prev_torque
    }

    fn debug_draw(&self, physics: &PhysicsWorld, draw: &mut dyn DebugDraw) {
        for (part, side) in self.swimmer.body_parts() {
            if let Some(position) = multibody_link_position(physics, part) {
                draw.draw_body_part(part, &position, side);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_abs_diff_eq;
    use nalgebra::Isometry3;
    use nphysics3d::object::DefaultBodyPartHandle;

    use crate::multibody_util::JointState;
    use crate::swimmer::spawn::make_multibody;
    use crate::trajectory::{BasisFunctions, PeriodicTerm, MIN_STROKE_PERIOD};

    use super::*;

    /// Joints that never move, recording every torque they receive.
    #[derive(Default)]
    struct MockJoints {
        states: HashMap<DefaultBodyPartHandle, JointState>,
        applied: Vec<(DefaultBodyPartHandle, f32)>,
    }

    impl JointActuator for MockJoints {
        fn joint_state(&self, joint: DefaultBodyPartHandle) -> Option<JointState> {
            self.states.get(&joint).copied()
        }

        fn apply_joint_torque(&mut self, joint: DefaultBodyPartHandle, torque: f32) -> Option<()> {
            self.states.get(&joint)?;
            self.applied.push((joint, torque));
            Some(())
        }
    }

    fn spawn_swimmer(stroke: Stroke) -> (ReferenceTrajectorySwimmer, MockJoints) {
        let mut physics = PhysicsWorld::new();
        let config = SwimmerConfig::new(stroke, 2.0);
        let index = make_multibody(&mut physics, &config, Isometry3::identity());

        let mut joints = MockJoints::default();
        for (part, _) in index.body_parts() {
            if part != index.torso {
                joints.states.insert(part, JointState::default());
            }
        }

        (ReferenceTrajectorySwimmer::new(config, index).unwrap(), joints)
    }

    fn periodic_terms(swimmer: &ReferenceTrajectorySwimmer, joint: PeriodicJoint) -> Vec<PeriodicTerm> {
        match swimmer.periodic_trajectory(joint).basis() {
            BasisFunctions::Periodic(terms) => terms.to_vec(),
            BasisFunctions::Polynomial(_) => panic!("{:?} has a polynomial trajectory", joint),
        }
    }

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| 0.1 * i as f32 - 0.7).collect()
    }

    #[test]
    fn control_dimensions_cover_neck_and_one_side() {
        let (swimmer, _) = spawn_swimmer(Stroke::Crawl);
        assert_eq!(swimmer.num_control_dimensions(), (1 + 1 + 1 + 1) * (2 * 3));

        let mut config = SwimmerConfig::default();
        config.basis_count = 3;
        let mut physics = PhysicsWorld::new();
        let index = make_multibody(&mut physics, &config, Isometry3::identity());
        let bigger = ReferenceTrajectorySwimmer::new(config, index).unwrap();
        assert_eq!(bigger.num_control_dimensions(), 4 * 9);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut physics = PhysicsWorld::new();
        let mut config = SwimmerConfig::default();
        let index = make_multibody(&mut physics, &config, Isometry3::identity());
        config.basis_count = 0;
        assert_eq!(
            ReferenceTrajectorySwimmer::new(config, index).err(),
            Some(ConfigError::NoBasisTerms)
        );
    }

    #[test]
    fn wrong_length_is_rejected_without_side_effects() {
        let (mut swimmer, _) = spawn_swimmer(Stroke::Crawl);
        let dims = swimmer.num_control_dimensions();
        swimmer.set_control_params(&ramp(dims)).unwrap();
        let before = swimmer.clone();

        for len in &[dims - 1, dims + 1, 0] {
            assert_eq!(
                swimmer.set_control_params(&ramp(*len)),
                Err(ControlError::DimensionMismatch {
                    expected: dims,
                    actual: *len
                })
            );
        }
        for joint in PeriodicJoint::ALL.iter().copied() {
            assert_eq!(swimmer.periodic_trajectory(joint), before.periodic_trajectory(joint));
        }
        assert_eq!(swimmer.control_params(), before.control_params());
        assert_eq!(swimmer.num_control_dimensions(), dims);
    }

    #[test]
    fn reapplying_params_is_idempotent() {
        let (mut swimmer, _) = spawn_swimmer(Stroke::Crawl);
        let params = ramp(swimmer.num_control_dimensions());

        swimmer.set_control_params(&params).unwrap();
        let first: Vec<_> = PeriodicJoint::ALL.iter().map(|j| periodic_terms(&swimmer, *j)).collect();
        swimmer.set_control_params(&params).unwrap();
        let second: Vec<_> = PeriodicJoint::ALL.iter().map(|j| periodic_terms(&swimmer, *j)).collect();

        assert_eq!(first, second);
        assert_eq!(swimmer.num_control_dimensions(), params.len());
        assert_eq!(swimmer.control_params(), params.as_slice());
    }

    #[test]
    fn slices_are_laid_out_neck_then_right_side() {
        let (mut swimmer, _) = spawn_swimmer(Stroke::Fly);
        let params = ramp(swimmer.num_control_dimensions());
        swimmer.set_control_params(&params).unwrap();

        for (slot, joint) in [
            PeriodicJoint::Neck,
            PeriodicJoint::RightElbow,
            PeriodicJoint::RightHip,
            PeriodicJoint::RightKnee,
        ]
        .iter()
        .enumerate()
        {
            let terms = periodic_terms(&swimmer, *joint);
            for (term, t) in terms.iter().enumerate() {
                let base = slot * 6 + term * 3;
                assert_eq!(t.weight, params[base]);
                assert_eq!(t.period, MIN_STROKE_PERIOD + params[base + 1].abs());
                assert_eq!(t.phase_offset, params[base + 2]);
            }
        }
    }

    #[test]
    fn crawl_mirrors_left_side_half_a_cycle_late() {
        let (mut swimmer, _) = spawn_swimmer(Stroke::Crawl);
        swimmer.set_control_params(&ramp(swimmer.num_control_dimensions())).unwrap();

        for joint in PeriodicJoint::ALL.iter().copied() {
            if joint.side() != Some(BodySide::Left) {
                continue;
            }
            let left = periodic_terms(&swimmer, joint);
            let right = periodic_terms(&swimmer, joint.mirrored());
            for (l, r) in left.iter().zip(right.iter()) {
                assert_eq!(l.weight, r.weight);
                assert_eq!(l.period, r.period);
                assert_abs_diff_eq!(l.phase_offset - r.phase_offset, PI, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn crawl_leaves_neck_and_right_side_unshifted() {
        let (mut crawl, _) = spawn_swimmer(Stroke::Crawl);
        let (mut fly, _) = spawn_swimmer(Stroke::Fly);
        let params = ramp(crawl.num_control_dimensions());
        crawl.set_control_params(&params).unwrap();
        fly.set_control_params(&params).unwrap();

        for joint in PeriodicJoint::ALL.iter().copied() {
            if joint.side() == Some(BodySide::Left) {
                continue;
            }
            assert_eq!(periodic_terms(&crawl, joint), periodic_terms(&fly, joint));
        }
    }

    #[test]
    fn fly_mirrors_left_side_in_phase() {
        let (mut swimmer, _) = spawn_swimmer(Stroke::Fly);
        swimmer.set_control_params(&ramp(swimmer.num_control_dimensions())).unwrap();

        for joint in PeriodicJoint::ALL.iter().copied() {
            assert_eq!(
                periodic_terms(&swimmer, joint),
                periodic_terms(&swimmer, joint.mirrored())
            );
        }
    }

    #[test]
    fn shoulders_ramp_through_a_full_rotation() {
        let (swimmer, _) = spawn_swimmer(Stroke::Crawl);
        for side in BodySide::BOTH.iter().copied() {
            let shoulder = swimmer.shoulder_trajectory(side);
            assert_eq!(shoulder.joint(), swimmer.body_parts().shoulder_joint(side));
            assert_abs_diff_eq!(shoulder.evaluate(0.0, 0.01), 0.0);
            assert_abs_diff_eq!(shoulder.evaluate(1.0, 0.01), -PI, epsilon = 1e-5);
        }
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let (mut swimmer, mut joints) = spawn_swimmer(Stroke::Crawl);
        swimmer.set_control_params(&ramp(swimmer.num_control_dimensions())).unwrap();
        swimmer.step(&mut joints, 0.01, 0.3).unwrap();
        let torque = swimmer.prev_torque();
        let applied = joints.applied.len();

        swimmer.step(&mut joints, 0.0, 0.7).unwrap();

        assert_eq!(swimmer.prev_torque(), torque);
        assert_eq!(joints.applied.len(), applied);
    }

    #[test]
    fn every_joint_receives_one_torque_per_tick() {
        let (mut swimmer, mut joints) = spawn_swimmer(Stroke::Crawl);
        swimmer.set_control_params(&ramp(swimmer.num_control_dimensions())).unwrap();
        swimmer.step(&mut joints, 0.01, 0.42).unwrap();

        assert_eq!(joints.applied.len(), 9);
        let shoulders = swimmer.body_parts().limbs;
        assert_eq!(joints.applied[0].0, shoulders.right.upper_arm);
        assert_eq!(joints.applied[1].0, shoulders.left.upper_arm);

        let sum: f32 = joints.applied.iter().map(|(_, t)| *t).sum();
        assert_abs_diff_eq!(swimmer.prev_torque(), sum, epsilon = 1e-5);
        assert_abs_diff_eq!(swimmer.last_torques().total(), sum, epsilon = 1e-5);
    }

    #[test]
    fn neck_tracks_quarter_period_peak() {
        let (mut swimmer, mut joints) = spawn_swimmer(Stroke::Crawl);
        let mut params = vec![0.0; swimmer.num_control_dimensions()];
        // weight 1, effective period 1, phase 0
        params[0] = 1.0;
        params[1] = 1.0 - MIN_STROKE_PERIOD;
        swimmer.set_control_params(&params).unwrap();

        assert_abs_diff_eq!(
            swimmer.periodic_trajectory(PeriodicJoint::Neck).evaluate(0.25, 0.01),
            1.0,
            epsilon = 1e-5
        );

        swimmer.step(&mut joints, 0.01, 0.25).unwrap();
        let torques = swimmer.last_torques();
        assert_abs_diff_eq!(torques.periodic[PeriodicJoint::Neck], 1.0, epsilon = 1e-5);
        for joint in PeriodicJoint::ALL.iter().copied().skip(1) {
            assert_abs_diff_eq!(torques.periodic[joint], 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn zero_params_at_rest_apply_no_torque() {
        let (mut swimmer, mut joints) = spawn_swimmer(Stroke::Crawl);
        swimmer.set_control_params(&vec![0.0; 24]).unwrap();
        swimmer.step(&mut joints, 0.01, 0.0).unwrap();
        assert_abs_diff_eq!(swimmer.prev_torque(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn missing_joint_is_reported() {
        let (mut swimmer, mut joints) = spawn_swimmer(Stroke::Crawl);
        let head = swimmer.body_parts().head;
        joints.states.remove(&head);

        assert_eq!(
            swimmer.step(&mut joints, 0.01, 0.0),
            Err(ControlError::MissingJoint { joint: head })
        );
    }

    #[test]
    fn torques_applied_before_a_missing_joint_are_recorded() {
        let (mut swimmer, mut joints) = spawn_swimmer(Stroke::Crawl);
        swimmer.set_control_params(&ramp(swimmer.num_control_dimensions())).unwrap();
        let knee = swimmer.body_parts().periodic_joint(PeriodicJoint::RightKnee);
        joints.states.remove(&knee);

        assert_eq!(
            swimmer.step(&mut joints, 0.01, 0.3),
            Err(ControlError::MissingJoint { joint: knee })
        );

        // Both shoulders, the neck, the right elbow and the right hip.
        assert_eq!(joints.applied.len(), 5);
        let sum: f32 = joints.applied.iter().map(|(_, t)| *t).sum();
        assert_abs_diff_eq!(swimmer.prev_torque(), sum, epsilon = 1e-5);
        assert_abs_diff_eq!(swimmer.last_torques().total(), sum, epsilon = 1e-5);
        assert_eq!(swimmer.last_torques().periodic[PeriodicJoint::RightKnee], 0.0);
    }
}
