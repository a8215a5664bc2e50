//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(ApplicationError::Domain(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(d) => match d {
                    DomainError::InvalidNumber(_)
                    | DomainError::NonFiniteInput(_)
                    | DomainError::NegativeEvenRoot { .. } => exitcode::DATAERR,
                    DomainError::InvalidParameter { .. } => exitcode::USAGE,
                    DomainError::DidNotConverge { .. } => exitcode::SOFTWARE,
                },
                ApplicationError::InvalidDigits { .. } => exitcode::USAGE,
                ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => exitcode::IOERR,
            },
        }
    }
}
