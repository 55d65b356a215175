//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures surfaced to the caller.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Post not found: id {0}")]
    NotFound(u64),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Storage-level errors. Never surfaced to API callers: load failures are
/// downgraded to an empty collection at startup, persist failures are logged
/// and swallowed by the repository.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unreadable at {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Storage write failed at {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}
