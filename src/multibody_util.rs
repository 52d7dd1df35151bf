//! Module containing a few shorthand functions to do common things related to Multibodies,
//! and the [`JointActuator`] seam through which controllers talk to joints.

use nalgebra::{Isometry3, Unit, Vector3};
use nphysics3d::algebra::{Force3, ForceType};
use nphysics3d::joint::RevoluteJoint;
use nphysics3d::object::{Body, BodyPart, DefaultBodyPartHandle, MultibodyLink};

use crate::physics::PhysicsWorld;

/// Angle and angular speed of a single rotational degree of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointState {
    pub angle: f32,
    pub speed: f32,
}

/// Anything that can report the state of a revolute joint and apply a torque to it.
///
/// Joints are identified by the body part handle of the link on the child side of the joint.
/// Both methods return `None` if the handle does not refer to a revolute joint.
pub trait JointActuator {
    fn joint_state(&self, joint: DefaultBodyPartHandle) -> Option<JointState>;

    /// Apply `torque` around the joint axis to the two bodies the joint connects.
    fn apply_joint_torque(&mut self, joint: DefaultBodyPartHandle, torque: f32) -> Option<()>;
}

impl JointActuator for PhysicsWorld {
    fn joint_state(&self, joint: DefaultBodyPartHandle) -> Option<JointState> {
        let multibody = self.bodies.multibody(joint.0)?;
        let link = multibody.link(joint.1)?;
        let angle = link.joint().downcast_ref::<RevoluteJoint<f32>>()?.angle();
        let speed = multibody.joint_velocity(link).get(0).copied()?;
        Some(JointState { angle, speed })
    }

    /// The child link receives `+torque`, its parent `-torque`.
    fn apply_joint_torque(&mut self, joint: DefaultBodyPartHandle, torque: f32) -> Option<()> {
        let axis = global_joint_axis(self, joint)?;
        let parent = get_multibody_link(self, joint)?.parent_id()?;

        let multibody = self.bodies.multibody_mut(joint.0)?;
        let on_child = Force3::new(Vector3::zeros(), axis.into_inner() * torque);
        let on_parent = Force3::new(Vector3::zeros(), axis.into_inner() * -torque);
        multibody.apply_force(joint.1, &on_child, ForceType::Force, true);
        multibody.apply_force(parent, &on_parent, ForceType::Force, true);
        Some(())
    }
}

pub fn get_multibody_link(
    physics: &PhysicsWorld,
    part_handle: DefaultBodyPartHandle,
) -> Option<&MultibodyLink<f32>> {
    physics.bodies.multibody(part_handle.0)?.link(part_handle.1)
}

/// The rotation axis of a revolute joint, in world coordinates.
pub fn global_joint_axis(
    physics: &PhysicsWorld,
    bph: DefaultBodyPartHandle,
) -> Option<Unit<Vector3<f32>>> {
    let link = get_multibody_link(physics, bph)?;
    let rot_axis_local = link.joint().downcast_ref::<RevoluteJoint<f32>>()?.axis();
    Some(link.position().rotation * rot_axis_local)
}

/// Extract the global position of the specified multibody link.
pub fn multibody_link_position(
    physics: &PhysicsWorld,
    bph: DefaultBodyPartHandle,
) -> Option<Isometry3<f32>> {
    get_multibody_link(physics, bph).map(MultibodyLink::position)
}
