//! The interface between characters and whatever drives them, plus the controllers they share.

use nalgebra::Isometry3;
use nphysics3d::object::DefaultBodyPartHandle;

use crate::error::ControlError;
use crate::multibody_util::JointActuator;
use crate::physics::PhysicsWorld;
use crate::swimmer::joint_map::BodySide;

pub mod flailing;
pub mod pd;

/// A trait implemented by characters that can be driven by a flat vector of control values,
/// for instance by an external optimizer.
pub trait Character: Send {
    /// Length of the vector accepted by [`Character::set_control_params`].
    fn num_control_dimensions(&self) -> usize;

    /// Replace the character's control parameters.
    ///
    /// Fails without modifying anything if the vector has the wrong length.
    fn set_control_params(&mut self, params: &[f32]) -> Result<(), ControlError>;

    /// Apply one tick of control. Does nothing if `dt` is zero.
    ///
    /// If a joint cannot be driven, the torques already applied earlier in the tick
    /// are still what [`Character::prev_torque`] reports.
    fn step(&mut self, world: &mut dyn JointActuator, dt: f32, runtime: f32) -> Result<(), ControlError>;

    /// Sum of the torques applied during the last tick that did something.
    fn prev_torque(&self) -> f32;

    /// Report the pose of every body part, tagged with its side of the body.
    fn debug_draw(&self, physics: &PhysicsWorld, draw: &mut dyn DebugDraw);
}

/// Receives body poses for rendering. Carries no control semantics.
pub trait DebugDraw {
    fn draw_body_part(
        &mut self,
        part: DefaultBodyPartHandle,
        position: &Isometry3<f32>,
        side: Option<BodySide>,
    );
}
