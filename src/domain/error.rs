//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::{ItemId, Parent};

/// Domain errors represent contract violations against the tree.
///
/// Blocked drops are not errors: they are a normal outcome of the
/// interpreter. These variants mean the caller handed us ids that do not
/// match the tree it is working on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("parent not found: {0}")]
    ParentNotFound(Parent),

    #[error("item id already exists: {0}")]
    DuplicateId(ItemId),

    #[error("item id mismatch: action for {expected}, payload carries {actual}")]
    IdMismatch { expected: ItemId, actual: ItemId },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
