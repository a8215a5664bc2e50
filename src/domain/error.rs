//! Domain-level errors (no external dependencies)

use thiserror::Error;

use super::entities::Termination;

/// Domain errors represent violations of the approximator's contract.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("not a number: {0:?}")]
    InvalidNumber(String),

    #[error("input must be finite, got {0}")]
    NonFiniteInput(f64),

    #[error("no real root of degree {degree} for negative input {value}")]
    NegativeEvenRoot { value: f64, degree: u32 },

    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("did not converge for {value} after {steps} steps ({termination})")]
    DidNotConverge {
        value: f64,
        steps: u32,
        termination: Termination,
    },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
