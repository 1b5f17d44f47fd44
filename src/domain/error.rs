//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations detected while assembling a forest.
///
/// Anomalous input (orphans, rootless cycles, unknown selections) is not an
/// error; it is dropped silently. Only the recursion guard fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("hierarchy deeper than {limit} levels at node {id}")]
    DepthLimitExceeded { id: String, limit: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
