//! Domain errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation: {0}")]
    Validation(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
