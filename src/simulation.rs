//! The tick loop shared by the windowed and the headless runs.

use tracing::trace;

use crate::config::SimulationSettings;
use crate::control_strategies::flailing::FlailingDriver;
use crate::control_strategies::Character;
use crate::error::ControlError;
use crate::physics::PhysicsWorld;

/// A physics world with one character in it, plus the simulation clock.
pub struct Simulation {
    pub physics: PhysicsWorld,
    pub character: Box<dyn Character>,
    pub settings: SimulationSettings,
    /// Optional source of fresh control vectors, consulted before every tick.
    pub driver: Option<FlailingDriver>,
    runtime: f32,
}

impl Simulation {
    pub fn new(physics: PhysicsWorld, character: Box<dyn Character>, settings: SimulationSettings) -> Self {
        Simulation {
            physics,
            character,
            settings,
            driver: None,
            runtime: 0.0,
        }
    }

    pub fn with_driver(mut self, driver: FlailingDriver) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Simulated seconds elapsed so far.
    pub fn runtime(&self) -> f32 {
        self.runtime
    }

    /// Control, then integrate, then advance the clock.
    ///
    /// While paused, neither the character nor the world moves.
    pub fn tick(&mut self) -> Result<(), ControlError> {
        let dt = self.settings.time_step();
        if dt == 0.0 {
            return Ok(());
        }

        if let Some(driver) = self.driver.as_mut() {
            driver.drive(self.character.as_mut(), self.runtime)?;
        }

        self.character.step(&mut self.physics, dt, self.runtime)?;

        self.physics.mechanical_world.set_timestep(dt);
        self.physics.step();
        self.runtime += dt;

        trace!(runtime = self.runtime, torque = self.character.prev_torque(), "tick");
        Ok(())
    }

    /// Run `steps` ticks without any graphics, returning the aggregate torque after each.
    pub fn run_headless(&mut self, steps: usize) -> Result<Vec<f32>, ControlError> {
        let mut torques = Vec::with_capacity(steps);
        for _ in 0..steps {
            self.tick()?;
            torques.push(self.character.prev_torque());
        }
        Ok(torques)
    }
}
