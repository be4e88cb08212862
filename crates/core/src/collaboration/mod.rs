mod error;
mod operations;
mod requests;
mod types;

pub use error::{CommentError, EventError};
pub use operations::{
    filter_events, pending_invitations_for, validate_comment_content, visible_events_for,
    DateFilter, EventFilters, StatusFilter,
};
pub use requests::{
    validate_event_draft, EventDraft, NewComment, NewEvent, NewInvitation, NewNotification,
};
pub use types::{
    CollaborationComment, CollaborationInvitation, CollaborativeEvent, CommentType, Employee,
    EventPriority, EventResponse, EventStatus, EventTask, InvitationDecision, InvitationStatus,
};
