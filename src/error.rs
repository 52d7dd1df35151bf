//! Error types for the swimmer controller.

use nphysics3d::object::DefaultBodyPartHandle;
use thiserror::Error;

/// Violations of the control contract by the caller.
///
/// None of these are transient: they indicate a driver that disagrees with the
/// character about its own layout, so the character refuses to touch any state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("expected control params of size {expected} but was given params of size {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("basis term index {index} out of range for a trajectory with {count} terms")]
    TermIndexOutOfRange { index: usize, count: usize },

    #[error("cannot set {requested} parameters on a {actual} trajectory")]
    BasisFamilyMismatch {
        requested: &'static str,
        actual: &'static str,
    },

    #[error("trajectory is bound to joint {joint:?}, which is not a revolute joint in this world")]
    MissingJoint { joint: DefaultBodyPartHandle },
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("a periodic trajectory needs at least one basis term")]
    NoBasisTerms,

    #[error("shoulder period must be positive and finite, got {0}")]
    InvalidShoulderPeriod(f32),

    #[error("simulation rate must be positive and finite, got {0} Hz")]
    InvalidRate(f32),

    #[error("flailing scale must be finite, got {0}")]
    InvalidScale(f32),

    #[error("unknown stroke {0:?} (expected \"crawl\" or \"fly\")")]
    UnknownStroke(String),
}
