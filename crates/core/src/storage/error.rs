use thiserror::Error;

/// Errors surfaced by the entity store.
///
/// The remote store speaks JSON over HTTP; these variants cover the
/// failure modes the client has to react to. Read paths absorb
/// `RateLimited` and `Network` through the cached store's retry and
/// fail-soft policy; write paths propagate them unmodified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{collection} record not found: {id}")]
    NotFound {
        collection: &'static str,
        id: String,
    },
    #[error("rate limited by entity store")]
    RateLimited,
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid record data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Returns true if this error is a local or remote rate limit,
    /// eligible for backoff-and-retry on read paths.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StoreError::RateLimited)
    }
}

/// Result type for entity store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
