//! PD control of an articulated swimmer along parameterized reference trajectories.
//!
//! A flat control vector (typically produced by an external optimizer) is mapped onto
//! sinusoidal trajectories for the neck and one side of the body, mirrored onto the
//! other side, and tracked every tick by PD controllers acting on an nphysics multibody.

pub mod config;
pub mod control_strategies;
pub mod error;
pub mod graphics;
pub mod multibody_util;
pub mod physics;
pub mod simulation;
pub mod simulator_thread;
pub mod swimmer;
pub mod sync_strategies;
pub mod trajectory;

pub use config::{PdGains, SimulationSettings, Stroke, SwimmerConfig};
pub use control_strategies::Character;
pub use error::{ConfigError, ControlError};
pub use swimmer::ReferenceTrajectorySwimmer;
