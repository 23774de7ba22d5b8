use cadence_core::{StepError, Unit};
use thiserror::Error;

/// Calendar-advance errors.
///
/// All of these indicate a configuration or contract violation, never a
/// transient failure; there is nothing to retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvanceError {
    #[error("Time-of-day units cannot be applied to a pure calendar date")]
    TimeUnitsOnDate,

    #[error("Advanced point falls outside the representable date range")]
    OutOfRange,

    #[error("Ambiguous civil time after advance: {0}")]
    AmbiguousCivilTime(String),

    #[error("Nonexistent civil time after advance: {0}")]
    NonexistentCivilTime(String),

    #[error(transparent)]
    Step(#[from] StepError),
}

/// Stepped-range configuration and iteration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("No step configured; call with_step before stepping operations")]
    StepNotConfigured,

    #[error("Cannot materialize a sequence without a lower bound")]
    NoLowerBound,

    #[error("Range step cannot be negative ({unit}: {amount})")]
    NegativeStep { unit: Unit, amount: f64 },

    #[error("Range step makes no progress: {0}")]
    ZeroStep(String),

    #[error(transparent)]
    Advance(#[from] AdvanceError),

    #[error(transparent)]
    Step(#[from] StepError),
}

pub type RangeResult<T> = std::result::Result<T, RangeError>;
