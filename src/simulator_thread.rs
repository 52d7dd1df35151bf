use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use nalgebra::geometry::Isometry3;
use nphysics3d::object::DefaultBodyPartHandle;
use tracing::{error, warn};

use crate::control_strategies::DebugDraw;
use crate::graphics::Graphics;
use crate::simulation::Simulation;
use crate::swimmer::joint_map::BodySide;
use crate::sync_strategies;
use crate::sync_strategies::WaitStrategy;

/// Message sent from physics thread about the state of the character.
///
/// Filled in through the character's debug-draw hook.
#[derive(Debug, Default)]
pub struct PhysicsUpdate {
    pub positions: HashMap<DefaultBodyPartHandle, Isometry3<f32>>,
    pub sides: HashMap<DefaultBodyPartHandle, Option<BodySide>>,
    pub runtime: f32,
    pub prev_torque: f32,
}

impl DebugDraw for PhysicsUpdate {
    fn draw_body_part(
        &mut self,
        part: DefaultBodyPartHandle,
        position: &Isometry3<f32>,
        side: Option<BodySide>,
    ) {
        self.positions.insert(part, *position);
        self.sides.insert(part, side);
    }
}

/// Take a snapshot of the simulation that can be safely sent to the graphics thread.
pub fn snapshot_simulation(simulation: &Simulation) -> PhysicsUpdate {
    let mut pu = PhysicsUpdate {
        runtime: simulation.runtime(),
        prev_torque: simulation.character.prev_torque(),
        ..Default::default()
    };
    simulation.character.debug_draw(&simulation.physics, &mut pu);
    pu
}

/// Run the "simulation" part of the simulator app, independently of the graphics thread.
/// Returns the JoinHandle of the thread, as well a Receiver, which provides the position
/// of every body part of the character at every frame.
///
/// The provided WaitStrategy can simply hold the simulation until the graphics
/// thread has completed drawing a frame, keeping both roughly in sync, but allowing the simulation
/// to take longer if it needs to.
///
/// The thread stops when the character reports a control error, or when the receiver is dropped.
pub fn start_physics_thread<W>(
    mut simulation: Simulation,
    mut wait_strategy: W,
) -> (JoinHandle<()>, Receiver<PhysicsUpdate>)
where
    W: WaitStrategy,
{
    // Create a channel for updates about positions.
    let (snd, rcv) = channel();

    let join = thread::spawn(move || loop {
        // Apply the waiting strategy, e.g. to synchronize with the graphics thread without blocking it.
        wait_strategy();

        if let Err(e) = simulation.tick() {
            error!("Character control failed: {}", e);
            break;
        }

        // Update any interested parties in the positions of the various body parts.
        if snd.send(snapshot_simulation(&simulation)).is_err() {
            break;
        }
    });

    (join, rcv)
}

pub fn run_synced_to_graphics(graphics: &mut Graphics, simulation: Simulation) {
    let (mut notifier, ws) = sync_strategies::continue_once_of_allowed();

    let (_jh, pos_updates) = start_physics_thread(simulation, ws);

    let mut should_close = false;

    while !should_close {
        notifier();
        should_close |= !graphics.draw_frame();

        match pos_updates.recv_timeout(Duration::from_millis(100)) {
            Ok(update) => {
                graphics.synchronize_physics_to_graphics(&update);
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("Simulation thread taking more than 100ms last timestep.")
            }
            Err(RecvTimeoutError::Disconnected) => {
                error!("Physics thread stopped.");
                should_close = true;
            }
        }
    }
}
