//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ClinicFlowError`] via `From`.

/// Top-level error returned by services and ports.
#[derive(Debug, thiserror::Error)]
pub enum ClinicFlowError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Failure inside a storage adapter; the concrete error is kept as source.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("workspace id must not be empty")]
    EmptyWorkspace,

    #[error("rule must listen for an event type")]
    MissingEventType,

    #[error("rule must have at least one action")]
    NoActions,

    #[error("condition field must not be empty")]
    EmptyConditionField,

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("unknown value {0:?}")]
    UnknownValue(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
