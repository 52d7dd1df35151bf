//! Utilities related to spawning the swimmer.
//!
//! The swimmer lies in the XY plane with its head towards +X. Every joint is a
//! revolute joint around Z. Right limbs sit slightly towards +Z (the viewer),
//! left limbs towards -Z.

use std::f32::consts::PI;

use nalgebra::{Isometry3, Vector3};
use ncollide3d::pipeline::CollisionGroups;
use ncollide3d::shape::{Cuboid, ShapeHandle};
use nphysics3d::joint::{FreeJoint, RevoluteJoint};
use nphysics3d::object::{
    BodyPartHandle, ColliderDesc, DefaultBodyHandle, DefaultBodyPartHandle,
    DefaultColliderHandle, MultibodyDesc,
};
use tracing::info;

use crate::config::{Stroke, SwimmerConfig, SwimmerDimensions};
use crate::graphics::Graphics;
use crate::physics::PhysicsWorld;
use crate::swimmer::joint_map::{BodySide, SideMap};
use crate::swimmer::{LimbParts, SwimmerBodyPartIndex};

/// Collision group shared by every body part of a swimmer.
/// Members blacklist it, so limbs never collide with each other.
pub const SWIMMER_COLLISION_GROUP: usize = 1;

pub const NECK_LIMIT: f32 = PI / 10.0;
pub const ELBOW_LIMIT: f32 = PI * 0.1;
pub const HIP_LIMIT: f32 = PI / 4.0;
pub const KNEE_MIN_ANGLE: f32 = -PI * 0.9;
pub const KNEE_MAX_ANGLE: f32 = 0.0;

/// Build a physical and visible swimmer.
pub fn make_swimmer(
    physics: &mut PhysicsWorld,
    graphics: &mut Graphics,
    config: &SwimmerConfig,
    position: Isometry3<f32>,
) -> SwimmerBodyPartIndex {
    let swimmer = make_multibody(physics, config, position);
    build_graphics(&swimmer, &config.dimensions, graphics);
    swimmer
}

fn build_graphics(swimmer: &SwimmerBodyPartIndex, dims: &SwimmerDimensions, graphics: &mut Graphics) {
    let mut add_box = |bph: DefaultBodyPartHandle, len: f32, width: f32| {
        let node = graphics.window.add_cube(len, width, width);
        graphics.bp_to_sn.push((node, bph));
    };

    add_box(swimmer.torso, dims.torso_height, dims.torso_width);
    add_box(swimmer.head, dims.head_height, dims.head_width);
    for (_, limb) in swimmer.limbs.iter() {
        add_box(limb.upper_arm, dims.upper_arm_len, dims.upper_arm_width);
        add_box(limb.lower_arm, dims.lower_arm_len, dims.lower_arm_width);
        add_box(limb.upper_leg, dims.upper_leg_len, dims.upper_leg_width);
        add_box(limb.lower_leg, dims.lower_leg_len, dims.lower_leg_width);
    }
}

/// Direction along X in which an arm extends from its shoulder.
///
/// For the crawl, the left arm starts pulled back along the body while the right
/// one reaches beyond the head, so that the two are half a rotation apart.
fn arm_direction(stroke: Stroke, side: BodySide) -> f32 {
    match (stroke, side) {
        (Stroke::Crawl, BodySide::Left) => -1.0,
        _ => 1.0,
    }
}

fn depth_offset(side: BodySide, dims: &SwimmerDimensions) -> f32 {
    let offset = (dims.torso_width + dims.upper_leg_width) / 2.0;
    match side {
        BodySide::Right => offset,
        BodySide::Left => -offset,
    }
}

/// Generates the Multibody of the swimmer and attaches its colliders.
pub fn make_multibody(
    physics: &mut PhysicsWorld,
    config: &SwimmerConfig,
    position: Isometry3<f32>,
) -> SwimmerBodyPartIndex {
    let dims = &config.dimensions;

    let mut torso = MultibodyDesc::new(FreeJoint::new(position)).name("torso".to_string());

    make_link(
        &mut torso,
        Vector3::new(dims.torso_height / 2.0, 0.0, 0.0),
        Vector3::new(-dims.head_height / 2.0, 0.0, 0.0),
        Some((-NECK_LIMIT, NECK_LIMIT)),
        "head".to_string(),
    );

    for side in BodySide::BOTH.iter().copied() {
        let dir = arm_direction(config.stroke, side);
        let z = depth_offset(side, dims);

        let upper_arm = make_link(
            &mut torso,
            Vector3::new(dims.torso_height / 2.0, 0.0, z),
            Vector3::new(-dir * dims.upper_arm_len / 2.0, 0.0, 0.0),
            None,
            link_name("upper_arm", side),
        );
        make_link(
            upper_arm,
            Vector3::new(dir * dims.upper_arm_len / 2.0, 0.0, 0.0),
            Vector3::new(-dir * dims.lower_arm_len / 2.0, 0.0, 0.0),
            Some((-ELBOW_LIMIT, ELBOW_LIMIT)),
            link_name("lower_arm", side),
        );

        let upper_leg = make_link(
            &mut torso,
            Vector3::new(-dims.torso_height / 2.0, 0.0, z),
            Vector3::new(dims.upper_leg_len / 2.0, 0.0, 0.0),
            Some((-HIP_LIMIT, HIP_LIMIT)),
            link_name("upper_leg", side),
        );
        make_link(
            upper_leg,
            Vector3::new(-dims.upper_leg_len / 2.0, 0.0, 0.0),
            Vector3::new(dims.lower_leg_len / 2.0, 0.0, 0.0),
            Some((KNEE_MIN_ANGLE, KNEE_MAX_ANGLE)),
            link_name("lower_leg", side),
        );
    }

    let mb = physics.bodies.insert(torso.build());

    // Otherwise, the swimmer stops responding to torques once it falls asleep.
    if let Some(body) = physics.bodies.get_mut(mb) {
        body.set_deactivation_threshold(None);
    }

    let torso = link_handle(physics, mb, "torso");
    let head = link_handle(physics, mb, "head");
    let limbs = SideMap::from_fn(|side| LimbParts {
        upper_arm: link_handle(physics, mb, &link_name("upper_arm", side)),
        lower_arm: link_handle(physics, mb, &link_name("lower_arm", side)),
        upper_leg: link_handle(physics, mb, &link_name("upper_leg", side)),
        lower_leg: link_handle(physics, mb, &link_name("lower_leg", side)),
    });

    let mut colliders = vec![
        (
            torso,
            attach_box_collider(physics, torso, dims.torso_height, dims.torso_width, dims.torso_density),
        ),
        (
            head,
            attach_box_collider(physics, head, dims.head_height, dims.head_width, dims.default_density),
        ),
    ];
    for (_, limb) in limbs.iter() {
        for (bph, len, width) in &[
            (limb.upper_arm, dims.upper_arm_len, dims.upper_arm_width),
            (limb.lower_arm, dims.lower_arm_len, dims.lower_arm_width),
            (limb.upper_leg, dims.upper_leg_len, dims.upper_leg_width),
            (limb.lower_leg, dims.lower_leg_len, dims.lower_leg_width),
        ] {
            let collider = attach_box_collider(physics, *bph, *len, *width, dims.default_density);
            colliders.push((*bph, collider));
        }
    }

    physics.settle();

    info!(
        stroke = %config.stroke,
        parts = colliders.len(),
        "spawned swimmer"
    );

    SwimmerBodyPartIndex {
        body: mb,
        torso,
        head,
        limbs,
        colliders,
    }
}

fn link_name(part: &str, side: BodySide) -> String {
    match side {
        BodySide::Right => format!("right_{}", part),
        BodySide::Left => format!("left_{}", part),
    }
}

fn link_handle(physics: &PhysicsWorld, mb: DefaultBodyHandle, name: &str) -> DefaultBodyPartHandle {
    let body = physics
        .bodies
        .multibody(mb)
        .expect("Swimmer body is not a multibody.");
    let (link, _) = body
        .links_with_name(name)
        .next()
        .unwrap_or_else(|| panic!("Swimmer has no link named {}.", name));
    BodyPartHandle(mb, link)
}

/// Attach a box of the given length (along X) and square cross-section,
/// in the swimmer's non-colliding group.
fn attach_box_collider(
    physics: &mut PhysicsWorld,
    bph: DefaultBodyPartHandle,
    len: f32,
    width: f32,
    density: f32,
) -> DefaultColliderHandle {
    let shape = Cuboid::new(Vector3::new(len / 2.0, width / 2.0, width / 2.0));
    let groups = CollisionGroups::new()
        .with_membership(&[SWIMMER_COLLISION_GROUP])
        .with_blacklist(&[SWIMMER_COLLISION_GROUP]);

    let collider = ColliderDesc::new(ShapeHandle::new(shape))
        .density(density)
        .collision_groups(groups)
        .build(bph);

    physics.colliders.insert(collider)
}

/// Add a revolute link around Z.
///
/// `parent_shift` is the joint position in the parent's frame, `body_shift` the
/// joint position in the new link's frame.
fn make_link<'a>(
    parent: &'a mut MultibodyDesc<f32>,
    parent_shift: Vector3<f32>,
    body_shift: Vector3<f32>,
    limits: Option<(f32, f32)>,
    name: String,
) -> &'a mut MultibodyDesc<f32> {
    let mut joint = RevoluteJoint::new(Vector3::z_axis(), 0.0);
    if let Some((min_angle, max_angle)) = limits {
        joint.enable_min_angle(min_angle);
        joint.enable_max_angle(max_angle);
    }
    parent
        .add_child(joint)
        .set_name(name)
        .set_parent_shift(parent_shift)
        .set_body_shift(body_shift)
}
