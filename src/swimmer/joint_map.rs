//! A module containing the joint roles of the swimmer and small fixed-size maps keyed by them.
//!
//! Trajectories are kept in arenas indexed by role instead of growable lists,
//! so the left/right grouping is just an index range.

use std::ops::{Index, IndexMut};

/// Which half of the body a bilateral part belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodySide {
    Right,
    Left,
}

impl BodySide {
    pub const BOTH: [BodySide; 2] = [BodySide::Right, BodySide::Left];
}

pub const NUM_PERIODIC_JOINTS: usize = 7;

/// One each for elbows, hips, and knees (shoulders use a polynomial trajectory).
pub const NUM_PERIODIC_JOINTS_PER_SIDE: usize = 3;

/// Joints with their own slice of the control vector: the neck plus one side.
pub const NUM_CONTROLLED_JOINTS: usize = 1 + NUM_PERIODIC_JOINTS_PER_SIDE;

/// Joints driven by a periodic trajectory, in assembly order.
///
/// The discriminant is the position in the trajectory arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodicJoint {
    Neck = 0,
    RightElbow,
    RightHip,
    RightKnee,
    LeftElbow,
    LeftHip,
    LeftKnee,
}

impl PeriodicJoint {
    pub const ALL: [PeriodicJoint; NUM_PERIODIC_JOINTS] = [
        PeriodicJoint::Neck,
        PeriodicJoint::RightElbow,
        PeriodicJoint::RightHip,
        PeriodicJoint::RightKnee,
        PeriodicJoint::LeftElbow,
        PeriodicJoint::LeftHip,
        PeriodicJoint::LeftKnee,
    ];

    /// Left-side joints start in the second half of the arena once the neck is removed.
    pub const LEFT_START: usize = 1 + (NUM_PERIODIC_JOINTS - 1) / 2;

    pub fn index(self) -> usize {
        self as usize
    }

    /// `None` for the unpaired neck.
    pub fn side(self) -> Option<BodySide> {
        match self.index() {
            0 => None,
            i if i < Self::LEFT_START => Some(BodySide::Right),
            _ => Some(BodySide::Left),
        }
    }

    /// Which trajectory-sized slot of the control vector drives this joint.
    ///
    /// Left joints alias the slot of their right-side counterpart.
    pub fn control_slot(self) -> usize {
        let i = self.index();
        if i >= Self::LEFT_START {
            i - NUM_PERIODIC_JOINTS_PER_SIDE
        } else {
            i
        }
    }

    /// The same joint on the other side of the body. The neck mirrors onto itself.
    pub fn mirrored(self) -> PeriodicJoint {
        match self {
            PeriodicJoint::Neck => PeriodicJoint::Neck,
            PeriodicJoint::RightElbow => PeriodicJoint::LeftElbow,
            PeriodicJoint::RightHip => PeriodicJoint::LeftHip,
            PeriodicJoint::RightKnee => PeriodicJoint::LeftKnee,
            PeriodicJoint::LeftElbow => PeriodicJoint::RightElbow,
            PeriodicJoint::LeftHip => PeriodicJoint::RightHip,
            PeriodicJoint::LeftKnee => PeriodicJoint::RightKnee,
        }
    }
}

//region PeriodicJointMap

/// One entry for every joint driven by a periodic trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicJointMap<T>([T; NUM_PERIODIC_JOINTS]);

impl<T> PeriodicJointMap<T> {
    pub fn from_fn<F: FnMut(PeriodicJoint) -> T>(mut f: F) -> Self {
        PeriodicJointMap(array_init::array_init(|i| f(PeriodicJoint::ALL[i])))
    }

    /// Entries in assembly order.
    pub fn iter(&self) -> impl Iterator<Item = (PeriodicJoint, &T)> {
        PeriodicJoint::ALL.iter().copied().zip(self.0.iter())
    }
}

impl<T> Index<PeriodicJoint> for PeriodicJointMap<T> {
    type Output = T;

    fn index(&self, joint: PeriodicJoint) -> &T {
        &self.0[joint.index()]
    }
}

impl<T> IndexMut<PeriodicJoint> for PeriodicJointMap<T> {
    fn index_mut(&mut self, joint: PeriodicJoint) -> &mut T {
        &mut self.0[joint.index()]
    }
}

//endregion

//region SideMap

/// One entry per side of the body, e.g. for the shoulders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideMap<T> {
    pub right: T,
    pub left: T,
}

impl<T> SideMap<T> {
    pub fn from_fn<F: FnMut(BodySide) -> T>(mut f: F) -> Self {
        let right = f(BodySide::Right);
        let left = f(BodySide::Left);
        SideMap { right, left }
    }

    /// Right side first.
    pub fn iter(&self) -> impl Iterator<Item = (BodySide, &T)> {
        vec![(BodySide::Right, &self.right), (BodySide::Left, &self.left)].into_iter()
    }
}

impl<T> Index<BodySide> for SideMap<T> {
    type Output = T;

    fn index(&self, side: BodySide) -> &T {
        match side {
            BodySide::Right => &self.right,
            BodySide::Left => &self.left,
        }
    }
}

impl<T> IndexMut<BodySide> for SideMap<T> {
    fn index_mut(&mut self, side: BodySide) -> &mut T {
        match side {
            BodySide::Right => &mut self.right,
            BodySide::Left => &mut self.left,
        }
    }
}

//endregion

//region JointTorques

/// The torque last applied to every controlled joint.
#[derive(Debug, Clone, PartialEq)]
pub struct JointTorques {
    pub shoulders: SideMap<f32>,
    pub periodic: PeriodicJointMap<f32>,
}

impl JointTorques {
    pub fn zero() -> Self {
        JointTorques {
            shoulders: SideMap { right: 0.0, left: 0.0 },
            periodic: PeriodicJointMap::from_fn(|_| 0.0),
        }
    }

    pub fn total(&self) -> f32 {
        self.shoulders.iter().map(|(_, t)| *t).sum::<f32>()
            + self.periodic.iter().map(|(_, t)| *t).sum::<f32>()
    }
}

//endregion

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_partition_the_arena() {
        assert_eq!(PeriodicJoint::Neck.side(), None);
        for j in &PeriodicJoint::ALL[1..PeriodicJoint::LEFT_START] {
            assert_eq!(j.side(), Some(BodySide::Right));
        }
        for j in &PeriodicJoint::ALL[PeriodicJoint::LEFT_START..] {
            assert_eq!(j.side(), Some(BodySide::Left));
        }
        assert_eq!(PeriodicJoint::LEFT_START, 4);
    }

    #[test]
    fn left_joints_alias_right_slots() {
        for joint in PeriodicJoint::ALL.iter().copied() {
            assert_eq!(joint.control_slot(), joint.mirrored().control_slot());
            assert!(joint.control_slot() < NUM_CONTROLLED_JOINTS);
            if joint.side() != Some(BodySide::Left) {
                assert_eq!(joint.control_slot(), joint.index());
            }
        }
    }

    #[test]
    fn map_is_indexed_by_role() {
        let mut map = PeriodicJointMap::from_fn(PeriodicJoint::index);
        assert_eq!(map[PeriodicJoint::LeftHip], 5);
        map[PeriodicJoint::LeftHip] = 42;
        assert_eq!(map[PeriodicJoint::RightHip], 2);

        let order: Vec<_> = map.iter().map(|(j, _)| j).collect();
        assert_eq!(order, PeriodicJoint::ALL.to_vec());
    }

    #[test]
    fn torques_sum_over_every_joint() {
        let mut torques = JointTorques::zero();
        torques.shoulders[BodySide::Left] = -0.5;
        torques.periodic[PeriodicJoint::Neck] = 1.0;
        torques.periodic[PeriodicJoint::RightKnee] = 0.25;
        assert_eq!(torques.total(), 0.75);
    }
}
