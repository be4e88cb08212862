use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a collaborative event.
///
/// Transitions follow an explicit table: `Pending` may move to
/// `InProgress` or `Cancelled`, `InProgress` to `Completed` or
/// `Cancelled`. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl EventStatus {
    /// Returns true if the transition to `next` is legal.
    pub fn can_transition_to(self, next: EventStatus) -> bool {
        use EventStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (Pending, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }

    /// Returns true if no further transitions are allowed.
    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Completed | EventStatus::Cancelled)
    }

    /// Returns the status's wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::InProgress => "in_progress",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

/// Priority of a collaborative event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// A collaborator's decision on an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationDecision {
    Accepted,
    Rejected,
}

impl InvitationDecision {
    /// Returns the invitation status this decision resolves to.
    pub fn as_status(self) -> InvitationStatus {
        match self {
            InvitationDecision::Accepted => InvitationStatus::Accepted,
            InvitationDecision::Rejected => InvitationStatus::Rejected,
        }
    }
}

/// Lifecycle state of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Sent,
    Viewed,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    /// Returns true once the receiver has responded; terminal
    /// invitations are never mutated again.
    pub fn is_terminal(self) -> bool {
        matches!(self, InvitationStatus::Accepted | InvitationStatus::Rejected)
    }

    /// Returns true while the invitation is awaiting a response.
    pub fn is_pending(self) -> bool {
        matches!(self, InvitationStatus::Sent | InvitationStatus::Viewed)
    }
}

/// Kind of a comment on a collaborative event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    #[default]
    Comment,
    Question,
    Suggestion,
    Update,
    Issue,
}

/// A recorded response from an invited collaborator, embedded in the
/// event document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    pub employee_id: String,
    pub response: InvitationDecision,
    pub response_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A checklist item attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTask {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// A shared calendar event with invited participants.
///
/// The creator is implicitly a participant and never appears in
/// `collaborators`; that list holds only employees who accepted an
/// invitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborativeEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub priority: EventPriority,
    pub status: EventStatus,
    pub created_by: String,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub responses: Vec<EventResponse>,
    #[serde(default)]
    pub progress_percentage: u8,
    #[serde(default)]
    pub tasks: Vec<EventTask>,
    pub created_date: DateTime<Utc>,
}

impl CollaborativeEvent {
    /// Returns true if the employee created the event or accepted an
    /// invitation to it.
    pub fn is_participant(&self, employee_id: &str) -> bool {
        self.created_by == employee_id || self.collaborators.iter().any(|c| c == employee_id)
    }

    /// Returns the recorded response from an employee, if any.
    pub fn response_from(&self, employee_id: &str) -> Option<&EventResponse> {
        self.responses.iter().find(|r| r.employee_id == employee_id)
    }
}

/// A per-recipient offer to join a collaborative event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationInvitation {
    pub id: String,
    pub event_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: InvitationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CollaborationInvitation {
    /// Returns true if the invitation expired before `now` without a
    /// response.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status.is_pending() && self.expires_at < now
    }
}

/// An append-only comment on a collaborative event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationComment {
    pub id: String,
    pub event_id: String,
    pub author_id: String,
    pub content: String,
    #[serde(default)]
    pub comment_type: CommentType,
    pub created_date: DateTime<Utc>,
}

/// The employee projection needed by session resolution.
///
/// Store documents carry more fields than these; unknown fields are
/// ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub email: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
