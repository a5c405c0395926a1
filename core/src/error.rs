//! Error types for the todo service.
//!
//! # Design
//! Two layers. `StoreError` is what a `TodoStore` reports: a tag decoded from
//! the backend's error code, plus raw detail for logs. `TodoError` is what the
//! service hands to callers; it carries no backend detail, so nothing internal
//! reaches an HTTP response.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Failure reported by a store operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No row matched the given identifier.
    #[error("record not found")]
    RecordNotFound,

    /// A write collided with a unique constraint.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Anything else the backend reported. `code` is the driver's own code
    /// when it has one.
    #[error("store error ({}): {message}", .code.as_deref().unwrap_or("no code"))]
    Backend {
        code: Option<String>,
        message: String,
    },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend {
            code: None,
            message: message.into(),
        }
    }
}

/// Domain-level outcome of a failed todo operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("This title has been used")]
    DuplicateTitle,

    #[error("Todo not found")]
    NotFound,

    #[error("Something went wrong")]
    Unknown,
}

pub type Result<T> = std::result::Result<T, TodoError>;
