//! Error types for all dynamap operations.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type for dynamap operations.
///
/// Errors are returned to the immediate caller; the engine performs no
/// retries and no local recovery. A non-`Ok` result means the operation is
/// not guaranteed to have completed, except where an operation documents
/// otherwise (hard deletes are idempotent on absent keys).
#[derive(Debug, Error)]
pub enum Error {
    /// The item is absent, or present but soft-deleted. The two cases are
    /// indistinguishable on read paths.
    #[error("item not found")]
    NotFound,

    /// A key or index field has a declared kind with no scalar mapping.
    #[error("no scalar type for attribute `{attribute}`")]
    UnsupportedType { attribute: String },

    /// A field annotation did not parse.
    #[error("invalid field annotation: {0}")]
    Annotation(String),

    /// The derived table schema violates a key invariant.
    #[error("invalid table schema: {0}")]
    Schema(String),

    #[error("attribute serialization failed: {0}")]
    Serialize(#[from] serde_dynamo::Error),

    /// Dump exchange format could not be read or written.
    #[error("dump format error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Transport error surfaced verbatim from the underlying store client.
    #[error("store error: {0}")]
    Store(#[source] anyhow::Error),
}

impl Error {
    pub fn store(err: impl Into<anyhow::Error>) -> Self {
        Error::Store(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}
