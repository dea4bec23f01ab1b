//! Structured error types for input collection and settings.
//!
//! The math itself never fails. These errors come from the policies the
//! front-ends apply before handing values to the evaluator, and are designed
//! to be displayable in both CLI and TUI contexts.

use thiserror::Error;

/// Errors raised while validating inputs or settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapmError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("could not parse {field} from '{input}'")]
    Parse { field: &'static str, input: String },

    #[error("invalid beta domain [{start}, {end}]: start must be below end and both finite")]
    InvalidDomain { start: f64, end: f64 },

    #[error("sample count must be at least 2 (got {0})")]
    InvalidSampleCount(usize),

    #[error("input step must be positive and finite (got {0})")]
    InvalidStep(f64),

    #[error("settings serialization failed: {0}")]
    Serialize(String),
}

pub type Result<T> = std::result::Result<T, CapmError>;
