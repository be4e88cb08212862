use thiserror::Error;

use super::types::EventStatus;

/// Errors from validating or transitioning collaborative events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Event start time is required")]
    MissingStartTime,
    #[error("Illegal status transition: {from:?} -> {to:?}")]
    InvalidTransition { from: EventStatus, to: EventStatus },
}

/// Errors from validating comments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommentError {
    #[error("Comment content cannot be empty")]
    EmptyContent,
}
