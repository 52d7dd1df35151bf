//! Proportional-derivative tracking of reference trajectories.

use std::f32::consts::PI;

use crate::config::PdGains;
use crate::error::ControlError;
use crate::multibody_util::{JointActuator, JointState};
use crate::trajectory::Trajectory;

pub const TWO_PI: f32 = 2.0 * PI;

/// `-kp * (angle - target) - kd * speed`, with both angles wrapped by `% 2π`.
///
/// The wrap is the truncating remainder, so negative angles stay negative.
pub fn pd_torque(gains: &PdGains, state: JointState, target_angle: f32) -> f32 {
    let joint_angle = state.angle % TWO_PI;
    let target_angle = target_angle % TWO_PI;
    -gains.kp * (joint_angle - target_angle) - gains.kd * state.speed
}

/// Push the trajectory's joint towards the trajectory's value at `runtime`.
///
/// Returns the torque that was applied.
pub fn track_trajectory(
    world: &mut dyn JointActuator,
    trajectory: &Trajectory,
    gains: &PdGains,
    runtime: f32,
    dt: f32,
) -> Result<f32, ControlError> {
    let joint = trajectory.joint();
    let missing = ControlError::MissingJoint { joint };

    let state = world.joint_state(joint).ok_or_else(|| missing.clone())?;
    let torque = pd_torque(gains, state, trajectory.evaluate(runtime, dt));
    world.apply_joint_torque(joint, torque).ok_or(missing)?;

    Ok(torque)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn torque_opposes_angle_error_and_speed() {
        let gains = PdGains::default();
        let at_rest = JointState { angle: 0.0, speed: 0.0 };
        assert_abs_diff_eq!(pd_torque(&gains, at_rest, 1.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(pd_torque(&gains, at_rest, 0.0), 0.0, epsilon = 1e-6);

        let moving = JointState { angle: 0.5, speed: 2.0 };
        assert_abs_diff_eq!(pd_torque(&gains, moving, 0.5), -0.1, epsilon = 1e-6);
    }

    #[test]
    fn angles_are_wrapped_with_truncating_remainder() {
        let gains = PdGains { kp: 1.0, kd: 0.0 };
        let wound_up = JointState { angle: TWO_PI + 0.25, speed: 0.0 };
        assert_abs_diff_eq!(pd_torque(&gains, wound_up, 0.0), -0.25, epsilon = 1e-5);

        // -2π - 0.5 wraps to -0.5, not to 2π - 0.5.
        let at_rest = JointState::default();
        assert_abs_diff_eq!(pd_torque(&gains, at_rest, -TWO_PI - 0.5), -0.5, epsilon = 1e-5);
    }
}
