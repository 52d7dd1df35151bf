use nalgebra::Vector3;
use nphysics3d::force_generator::DefaultForceGeneratorSet;
use nphysics3d::joint::DefaultJointConstraintSet;
use nphysics3d::object::{DefaultBodySet, DefaultColliderSet};
use nphysics3d::world::{DefaultGeometricalWorld, DefaultMechanicalWorld};

const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;

pub struct PhysicsWorld {
    pub mechanical_world: DefaultMechanicalWorld<f32>,
    pub geometrical_world: DefaultGeometricalWorld<f32>,
    pub bodies: DefaultBodySet<f32>,
    pub colliders: DefaultColliderSet<f32>,
    pub joint_constraints: DefaultJointConstraintSet<f32>,
    pub force_generators: DefaultForceGeneratorSet<f32>,
}

impl PhysicsWorld {
    /// A world without gravity: the swimmer is assumed to be neutrally buoyant.
    pub fn new() -> Self {
        PhysicsWorld {
            mechanical_world: DefaultMechanicalWorld::new(Vector3::new(0.0, 0.0, 0.0)),
            geometrical_world: DefaultGeometricalWorld::new(),
            bodies: DefaultBodySet::new(),
            colliders: DefaultColliderSet::new(),
            joint_constraints: DefaultJointConstraintSet::new(),
            force_generators: DefaultForceGeneratorSet::new(),
        }
    }

    /// Same as [`PhysicsWorld::new`], integrating with the given timestep.
    pub fn with_timestep(dt: f32) -> Self {
        let mut world = PhysicsWorld::new();
        world.mechanical_world.set_timestep(dt);
        world
    }

    /// Run a single step so that newly inserted multibodies get their Jacobians and
    /// mass matrix. Forces cannot be applied to a multibody before that.
    ///
    /// A world with a zero timestep is stepped with the default one instead.
    pub fn settle(&mut self) {
        let timestep = self.mechanical_world.timestep();
        if timestep == 0.0 {
            self.mechanical_world.set_timestep(DEFAULT_TIMESTEP);
        }
        self.step();
        self.mechanical_world.set_timestep(timestep);
    }

    pub fn step(&mut self) {
        self.mechanical_world.step(
            &mut self.geometrical_world,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joint_constraints,
            &mut self.force_generators,
        );
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        PhysicsWorld::new()
    }
}
