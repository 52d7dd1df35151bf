//! Configuration of the swimmer and of the simulation loop driving it.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The swimming stroke. Fixed for the lifetime of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    /// Arms and legs alternate: the left side runs half a cycle behind the right.
    Crawl,
    /// Both sides move in phase.
    Fly,
}

impl FromStr for Stroke {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crawl" => Ok(Stroke::Crawl),
            "fly" | "butterfly" => Ok(Stroke::Fly),
            _ => Err(ConfigError::UnknownStroke(s.to_string())),
        }
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stroke::Crawl => write!(f, "crawl"),
            Stroke::Fly => write!(f, "fly"),
        }
    }
}

/// Proportional and derivative gains of the joint controllers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdGains {
    pub kp: f32,
    pub kd: f32,
}

impl Default for PdGains {
    fn default() -> Self {
        PdGains { kp: 1.0, kd: 0.05 }
    }
}

/// Body proportions, all derived from the total height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwimmerDimensions {
    pub height: f32,
    pub head_height: f32,
    pub head_width: f32,
    pub upper_arm_len: f32,
    pub upper_arm_width: f32,
    pub lower_arm_len: f32,
    pub lower_arm_width: f32,
    pub upper_leg_len: f32,
    pub upper_leg_width: f32,
    pub lower_leg_len: f32,
    pub lower_leg_width: f32,
    pub torso_height: f32,
    pub torso_width: f32,
    pub default_density: f32,
    pub torso_density: f32,
}

impl SwimmerDimensions {
    pub fn for_height(height: f32) -> Self {
        let head_height = height / 8.0;
        let arm_len = height * 0.45;
        let upper_arm_len = arm_len * (1.0 / 2.2);
        let upper_arm_width = height / 16.0;
        let leg_len = height * 0.54;
        let upper_leg_len = leg_len * 0.46;
        let upper_leg_width = height / 10.0;

        SwimmerDimensions {
            height,
            head_height,
            head_width: head_height * 0.85,
            upper_arm_len,
            upper_arm_width,
            lower_arm_len: arm_len - upper_arm_len,
            lower_arm_width: upper_arm_width * 0.85,
            upper_leg_len,
            upper_leg_width,
            lower_leg_len: leg_len - upper_leg_len,
            lower_leg_width: upper_leg_width * 0.7,
            torso_height: height - leg_len - head_height,
            torso_width: height / 8.0,
            default_density: 1.1,
            torso_density: 0.5,
        }
    }
}

impl Default for SwimmerDimensions {
    fn default() -> Self {
        SwimmerDimensions::for_height(2.0)
    }
}

/// Everything needed to assemble a reference-trajectory swimmer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwimmerConfig {
    pub stroke: Stroke,
    /// Time in seconds for the shoulders to complete a full rotation.
    pub shoulder_period: f32,
    /// Sinusoids per periodic trajectory. Increase or decrease to control complexity.
    pub basis_count: usize,
    pub gains: PdGains,
    pub dimensions: SwimmerDimensions,
}

impl SwimmerConfig {
    pub fn new(stroke: Stroke, shoulder_period: f32) -> Self {
        SwimmerConfig {
            stroke,
            shoulder_period,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.basis_count == 0 {
            return Err(ConfigError::NoBasisTerms);
        }
        if !(self.shoulder_period.is_finite() && self.shoulder_period > 0.0) {
            return Err(ConfigError::InvalidShoulderPeriod(self.shoulder_period));
        }
        Ok(())
    }

    /// Slope of the shoulder ramp: one full backwards rotation per shoulder period.
    pub fn shoulder_slope(&self) -> f32 {
        -2.0 * PI / self.shoulder_period
    }
}

impl Default for SwimmerConfig {
    fn default() -> Self {
        SwimmerConfig {
            stroke: Stroke::Crawl,
            shoulder_period: 2.0,
            basis_count: 2,
            gains: PdGains::default(),
            dimensions: SwimmerDimensions::default(),
        }
    }
}

/// Settings of the loop that advances the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    pub hz: f32,
    pub paused: bool,
}

impl SimulationSettings {
    pub fn new(hz: f32) -> Result<Self, ConfigError> {
        if !(hz.is_finite() && hz > 0.0) {
            return Err(ConfigError::InvalidRate(hz));
        }
        Ok(SimulationSettings { hz, paused: false })
    }

    /// Seconds per tick, or zero while paused.
    pub fn time_step(&self) -> f32 {
        if self.paused {
            0.0
        } else {
            1.0 / self.hz
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings { hz: 60.0, paused: false }
    }
}
