//! Error types for the Ressourcenplaner.

use thiserror::Error;

/// Errors that can occur while building or validating planner data.
#[derive(Error, Debug, PartialEq)]
pub enum PlanerError {
    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown absence type '{0}'. Expected one of U, K, FE, P, S, H, UN, BU")]
    InvalidAbsenceType(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: String, to: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for planner operations.
pub type PlanerResult<T> = Result<T, PlanerError>;
