//! This mod contains the swimmer: a roughly humanoid, bilaterally symmetric multibody
//! whose joints track reference trajectories through PD controllers.

use nphysics3d::object::{DefaultBodyHandle, DefaultBodyPartHandle, DefaultColliderHandle};

use joint_map::{BodySide, PeriodicJoint, SideMap};

pub mod controller;
pub mod joint_map;
pub mod spawn;

pub use controller::ReferenceTrajectorySwimmer;

/// Body parts of one side of the swimmer.
///
/// Each part's handle doubles as the handle of the joint connecting it to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbParts {
    pub upper_arm: DefaultBodyPartHandle,
    pub lower_arm: DefaultBodyPartHandle,
    pub upper_leg: DefaultBodyPartHandle,
    pub lower_leg: DefaultBodyPartHandle,
}

/// A struct that contains the body handle and body part handles of the various parts of a swimmer.
#[derive(Debug, Clone)]
pub struct SwimmerBodyPartIndex {
    pub body: DefaultBodyHandle,
    pub torso: DefaultBodyPartHandle,
    pub head: DefaultBodyPartHandle,
    pub limbs: SideMap<LimbParts>,
    pub colliders: Vec<(DefaultBodyPartHandle, DefaultColliderHandle)>,
}

impl SwimmerBodyPartIndex {
    /// The joint driven by the given periodic trajectory.
    pub fn periodic_joint(&self, joint: PeriodicJoint) -> DefaultBodyPartHandle {
        match joint {
            PeriodicJoint::Neck => self.head,
            PeriodicJoint::RightElbow => self.limbs.right.lower_arm,
            PeriodicJoint::RightHip => self.limbs.right.upper_leg,
            PeriodicJoint::RightKnee => self.limbs.right.lower_leg,
            PeriodicJoint::LeftElbow => self.limbs.left.lower_arm,
            PeriodicJoint::LeftHip => self.limbs.left.upper_leg,
            PeriodicJoint::LeftKnee => self.limbs.left.lower_leg,
        }
    }

    pub fn shoulder_joint(&self, side: BodySide) -> DefaultBodyPartHandle {
        self.limbs[side].upper_arm
    }

    /// Every body part with its side, `None` for the torso and head.
    pub fn body_parts(&self) -> Vec<(DefaultBodyPartHandle, Option<BodySide>)> {
        let mut parts = vec![(self.torso, None), (self.head, None)];
        for (side, limb) in self.limbs.iter() {
            parts.extend_from_slice(&[
                (limb.upper_arm, Some(side)),
                (limb.lower_arm, Some(side)),
                (limb.upper_leg, Some(side)),
                (limb.lower_leg, Some(side)),
            ]);
        }
        parts
    }
}
