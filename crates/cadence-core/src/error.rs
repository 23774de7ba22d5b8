use thiserror::Error;

/// Unit name resolution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Unknown calendar unit: {0}")]
    InvalidUnit(String),
}

/// Step configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    #[error("Step has no units configured")]
    EmptyStep,

    #[error("Amount for {unit} must be a whole number, got {amount}")]
    NonIntegerAmount { unit: crate::Unit, amount: f64 },

    #[error("Amount for {unit} must be finite, got {amount}")]
    NonFiniteAmount { unit: crate::Unit, amount: f64 },
}

pub type CoreResult<T> = std::result::Result<T, StepError>;
