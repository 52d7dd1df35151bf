//! Reference trajectories: target joint angles as sums of basis functions of time.
//!
//! Two families exist. Periodic trajectories sum sinusoids and are what the
//! external control vector drives. Polynomial trajectories sum powers of time and
//! are used for hand-tuned motions such as the windmilling shoulders.

use std::f32::consts::PI;

use nphysics3d::object::DefaultBodyPartHandle;

use crate::error::ControlError;

/// Smallest effective period of a periodic basis term, in seconds.
pub const MIN_STROKE_PERIOD: f32 = 0.2;

/// weight, period and phase offset.
pub const PARAMS_PER_PERIODIC_TERM: usize = 3;

/// `weight * sin(2π t / period + phase_offset)`
pub fn periodic_basis(runtime: f32, weight: f32, period: f32, phase_offset: f32) -> f32 {
    weight * (2.0 * PI * runtime / period + phase_offset).sin()
}

/// `coefficient * t^power`
pub fn polynomial_basis(runtime: f32, coefficient: f32, power: usize) -> f32 {
    coefficient * runtime.powi(power as i32)
}

/// One sinusoidal term. The stored period is the effective one, floor included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicTerm {
    pub weight: f32,
    pub period: f32,
    pub phase_offset: f32,
}

impl PeriodicTerm {
    /// Build a term from unconstrained optimizer output.
    ///
    /// Any raw period, including zero or negative ones, is mapped onto
    /// `MIN_STROKE_PERIOD + |raw_period|`.
    pub fn from_raw(weight: f32, raw_period: f32, phase_offset: f32) -> Self {
        PeriodicTerm {
            weight,
            period: MIN_STROKE_PERIOD + raw_period.abs(),
            phase_offset,
        }
    }

    pub fn evaluate(&self, runtime: f32) -> f32 {
        periodic_basis(runtime, self.weight, self.period, self.phase_offset)
    }
}

impl Default for PeriodicTerm {
    fn default() -> Self {
        PeriodicTerm::from_raw(0.0, 0.0, 0.0)
    }
}

/// The terms of a trajectory, tagged by family.
///
/// The slices are allocated once, at construction, and never resized.
#[derive(Debug, Clone, PartialEq)]
pub enum BasisFunctions {
    Periodic(Box<[PeriodicTerm]>),
    /// Coefficient `k` multiplies `t^k`.
    Polynomial(Box<[f32]>),
}

impl BasisFunctions {
    fn family(&self) -> &'static str {
        match self {
            BasisFunctions::Periodic(_) => "periodic",
            BasisFunctions::Polynomial(_) => "polynomial",
        }
    }
}

/// A reference trajectory bound to the joint it drives.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    joint: DefaultBodyPartHandle,
    basis: BasisFunctions,
}

impl Trajectory {
    /// A periodic trajectory with `terms` zero-weight sinusoids.
    pub fn periodic(joint: DefaultBodyPartHandle, terms: usize) -> Self {
        Trajectory {
            joint,
            basis: BasisFunctions::Periodic(vec![PeriodicTerm::default(); terms].into_boxed_slice()),
        }
    }

    /// A polynomial trajectory of degree `terms - 1` with all coefficients zero.
    pub fn polynomial(joint: DefaultBodyPartHandle, terms: usize) -> Self {
        Trajectory {
            joint,
            basis: BasisFunctions::Polynomial(vec![0.0; terms].into_boxed_slice()),
        }
    }

    /// A polynomial trajectory with the given coefficients, lowest power first.
    pub fn polynomial_from(joint: DefaultBodyPartHandle, coefficients: Vec<f32>) -> Self {
        Trajectory {
            joint,
            basis: BasisFunctions::Polynomial(coefficients.into_boxed_slice()),
        }
    }

    /// The joint this trajectory was bound to at construction.
    pub fn joint(&self) -> DefaultBodyPartHandle {
        self.joint
    }

    pub fn basis(&self) -> &BasisFunctions {
        &self.basis
    }

    pub fn term_count(&self) -> usize {
        match &self.basis {
            BasisFunctions::Periodic(terms) => terms.len(),
            BasisFunctions::Polynomial(coefficients) => coefficients.len(),
        }
    }

    /// Overwrite one sinusoid. The period floor is applied here.
    pub fn set_periodic_term(
        &mut self,
        index: usize,
        weight: f32,
        raw_period: f32,
        phase_offset: f32,
    ) -> Result<(), ControlError> {
        let actual = self.basis.family();
        match &mut self.basis {
            BasisFunctions::Periodic(terms) => {
                let count = terms.len();
                let term = terms
                    .get_mut(index)
                    .ok_or(ControlError::TermIndexOutOfRange { index, count })?;
                *term = PeriodicTerm::from_raw(weight, raw_period, phase_offset);
                Ok(())
            }
            BasisFunctions::Polynomial(_) => Err(ControlError::BasisFamilyMismatch {
                requested: "periodic",
                actual,
            }),
        }
    }

    /// Overwrite the coefficient of `t^index`.
    pub fn set_polynomial_term(&mut self, index: usize, coefficient: f32) -> Result<(), ControlError> {
        let actual = self.basis.family();
        match &mut self.basis {
            BasisFunctions::Polynomial(coefficients) => {
                let count = coefficients.len();
                let c = coefficients
                    .get_mut(index)
                    .ok_or(ControlError::TermIndexOutOfRange { index, count })?;
                *c = coefficient;
                Ok(())
            }
            BasisFunctions::Periodic(_) => Err(ControlError::BasisFamilyMismatch {
                requested: "polynomial",
                actual,
            }),
        }
    }

    /// Sum of all terms at `runtime`.
    ///
    /// The result is not wrapped into `[0, 2π)`; that is up to the controller.
    /// `_dt` is accepted so time-integrating trajectories can share the signature.
    pub fn evaluate(&self, runtime: f32, _dt: f32) -> f32 {
        match &self.basis {
            BasisFunctions::Periodic(terms) => terms.iter().map(|t| t.evaluate(runtime)).sum(),
            BasisFunctions::Polynomial(coefficients) => coefficients
                .iter()
                .enumerate()
                .map(|(power, c)| polynomial_basis(runtime, *c, power))
                .sum(),
        }
    }
}
