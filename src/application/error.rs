//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Dialog input problems. These are caught while filling a form and never
/// reach the reducer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("label must not be empty")]
    EmptyLabel,

    #[error("position {position} out of range, expected 1..={max}")]
    PositionOutOfRange { position: usize, max: usize },

    #[error("unknown color: {0}")]
    UnknownColor(String),
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("invalid input: {0}")]
    Form(#[from] FormError),

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
