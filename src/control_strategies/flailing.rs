use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::control_strategies::Character;
use crate::error::{ConfigError, ControlError};

/// A dummy driver that feeds uniformly random control vectors into a character,
/// drawing a fresh one every `interval` seconds of simulated time.
///
/// Handy for eyeballing what a character does across its parameter space.
pub struct FlailingDriver {
    rng: StdRng,
    scale: f32,
    interval: Option<f32>,
    next_change: f32,
}

impl FlailingDriver {
    /// Values are drawn from `[-scale, scale]`. With `interval == None`, only one vector is drawn.
    pub fn new(seed: Option<u64>, scale: f32, interval: Option<f32>) -> Result<Self, ConfigError> {
        if !scale.is_finite() {
            return Err(ConfigError::InvalidScale(scale));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(FlailingDriver {
            rng,
            scale: scale.abs(),
            interval: interval.filter(|i| *i > 0.0),
            next_change: 0.0,
        })
    }

    pub fn random_params(&mut self, dims: usize) -> Vec<f32> {
        let range = Uniform::new_inclusive(-self.scale, self.scale);
        (0..dims).map(|_| range.sample(&mut self.rng)).collect()
    }

    /// Hand the character a new vector if it is due. Returns whether one was applied.
    pub fn drive(&mut self, character: &mut dyn Character, runtime: f32) -> Result<bool, ControlError> {
        if runtime < self.next_change {
            return Ok(false);
        }

        let params = self.random_params(character.num_control_dimensions());
        character.set_control_params(&params)?;

        self.next_change = match self.interval {
            Some(interval) => runtime + interval,
            None => f32::INFINITY,
        };
        Ok(true)
    }
}
