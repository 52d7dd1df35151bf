//! module concerning most graphic-related aspects of the simulator.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use kiss3d::light::Light;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Isometry3, Point3};
use nphysics3d::object::DefaultBodyPartHandle;

use crate::simulator_thread::PhysicsUpdate;
use crate::swimmer::joint_map::BodySide;

/// Tint of bodies on the left side (the side away from the viewer).
pub const LEFT_COLOR: (f32, f32, f32) = (0.2, 0.9, 0.2);
pub const RIGHT_COLOR: (f32, f32, f32) = (0.9, 0.2, 0.2);
pub const UNPAIRED_COLOR: (f32, f32, f32) = (0.8, 0.8, 0.8);

pub fn side_color(side: Option<BodySide>) -> (f32, f32, f32) {
    match side {
        Some(BodySide::Left) => LEFT_COLOR,
        Some(BodySide::Right) => RIGHT_COLOR,
        None => UNPAIRED_COLOR,
    }
}

/// Struct containing data necessary for visualisation of the simulation.
pub struct Graphics {
    pub window: Window,
    /// A table that associates body parts to scene nodes, used to update position information.
    pub bp_to_sn: Vec<(SceneNode, DefaultBodyPartHandle)>,
    frames_drawn: u64,
    traces: Arena<Trace>,
}

impl Graphics {
    /// Initialize the visualisation and open a window with some default settings.
    pub fn init() -> Graphics {
        let mut window = Window::new("Swimmer");
        window.set_framerate_limit(Some(60));
        window.set_light(Light::StickToCamera);

        Graphics {
            window,
            bp_to_sn: vec![],
            frames_drawn: 0,
            traces: Arena::new(),
        }
    }

    /// Start tracing a given target body part.
    /// Will draw a curve that displays a history of the center of the designated part.
    pub fn enable_trace(&mut self, target: DefaultBodyPartHandle, offset: Isometry3<f32>) -> TraceId {
        self.traces.insert(Trace {
            target,
            offset,
            points: vec![],
        })
    }

    /// Draw a frame, incrementing the view counter and processing any input/output as well.
    pub fn draw_frame(&mut self) -> bool {
        self.frames_drawn += 1;
        for (_, trace) in self.traces.iter() {
            trace.draw(&mut self.window)
        }
        self.window.render()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Graphics is mainly a view of the physics thread. Call this method to update that view,
    /// usually once every tick. Parts are tinted by the side of the body they are on.
    pub fn synchronize_physics_to_graphics(&mut self, update: &PhysicsUpdate) {
        for (sn, bph) in self.bp_to_sn.iter_mut() {
            if let Some(position) = update.positions.get(bph) {
                sn.set_local_transformation(*position);
            }
            if let Some(side) = update.sides.get(bph) {
                let (r, g, b) = side_color(*side);
                sn.set_color(r, g, b);
            }
        }

        for (_, tr) in self.traces.iter_mut() {
            tr.update(&update.positions);
        }
    }
}

struct Trace {
    target: DefaultBodyPartHandle,
    offset: Isometry3<f32>,
    points: Vec<Point3<f32>>,
}

impl Trace {
    fn update(&mut self, positions: &HashMap<DefaultBodyPartHandle, Isometry3<f32>>) {
        if let Some(position) = positions.get(&self.target) {
            self.points
                .push(position * self.offset * Point3::new(0.0, 0.0, 0.0));
        }
    }

    fn draw(&self, window: &mut Window) {
        for pair in self.points.windows(2) {
            window.draw_line(&pair[0], &pair[1], &Point3::new(1.0, 0.0, 0.0));
        }
    }
}

pub type TraceId = Index;
