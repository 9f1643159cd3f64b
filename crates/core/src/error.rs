//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is recoverable at the API boundary; the HTTP layer maps each
/// one to a client-facing status code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, out-of-range field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A beer with the same name is already registered.
    #[error("beer with name {0} already registered in the system")]
    DuplicateName(String),

    /// A requested beer was not found (by id or by name).
    #[error("beer not found: {0}")]
    NotFound(String),

    /// A quantity adjustment would leave stock outside `[0, max]`.
    #[error("cannot adjust stock of beer {id} by {requested}: resulting quantity {attempted} is outside 0..={max}")]
    CapacityExceeded {
        id: i64,
        requested: i64,
        attempted: i64,
        max: i64,
    },

    /// A concurrent writer kept winning the race for the same record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store failed.
    #[error("store failure: {0}")]
    Store(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
