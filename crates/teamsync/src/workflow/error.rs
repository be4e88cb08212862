use thiserror::Error;

use teamsync_core::collaboration::{CommentError, EventError};
use teamsync_core::storage::StoreError;

/// Errors surfaced by workflow operations.
///
/// Validation and not-found variants are actionable by the user; store
/// errors on write paths propagate unmodified so callers decide whether
/// to retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorkflowError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Comment(#[from] CommentError),
    #[error("Invitation no longer exists: {0}")]
    InvitationNotFound(String),
    #[error("Event no longer exists: {0}")]
    EventNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
