//! Creation payloads for workflow operations.
//!
//! Stored entities carry server-assigned fields (`id`, `created_date`);
//! these types describe what the client sends before those exist. They
//! are pure data with no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::EventError;
use super::types::{
    CommentType, EventPriority, EventResponse, EventStatus, EventTask, InvitationStatus,
};

/// A user-composed draft of a collaborative event.
///
/// `invitee_ids` is consumed to generate invitations at creation time;
/// it is not the stored `collaborators` field, which starts empty and
/// fills in only as invitations are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<EventPriority>,
    #[serde(default)]
    pub invitee_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_message: Option<String>,
}

impl EventDraft {
    /// Creates a draft with the required fields.
    pub fn new(title: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_time: Some(start_time),
            end_time: None,
            location: None,
            meeting_link: None,
            priority: None,
            invitee_ids: Vec::new(),
            invitation_message: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the end time.
    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the virtual meeting link.
    pub fn with_meeting_link(mut self, link: impl Into<String>) -> Self {
        self.meeting_link = Some(link.into());
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: EventPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the employees to invite.
    pub fn with_invitees(mut self, invitee_ids: Vec<String>) -> Self {
        self.invitee_ids = invitee_ids;
        self
    }

    /// Sets the free-text message carried by each invitation.
    pub fn with_invitation_message(mut self, message: impl Into<String>) -> Self {
        self.invitation_message = Some(message.into());
        self
    }
}

/// Validates a draft before persisting it.
pub fn validate_event_draft(draft: &EventDraft) -> Result<(), EventError> {
    if draft.title.trim().is_empty() {
        return Err(EventError::EmptyTitle);
    }
    if draft.start_time.is_none() {
        return Err(EventError::MissingStartTime);
    }
    Ok(())
}

/// The record fields persisted for a new event.
#[derive(Debug, Clone, Serialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    pub priority: EventPriority,
    pub status: EventStatus,
    pub created_by: String,
    pub collaborators: Vec<String>,
    pub responses: Vec<EventResponse>,
    pub progress_percentage: u8,
    pub tasks: Vec<EventTask>,
}

impl NewEvent {
    /// Builds the persisted fields from a validated draft.
    ///
    /// The event starts `Pending` at zero progress with no
    /// collaborators; invitations are fanned out separately.
    pub fn from_draft(created_by: impl Into<String>, draft: &EventDraft) -> Result<Self, EventError> {
        validate_event_draft(draft)?;
        let start_time = draft.start_time.ok_or(EventError::MissingStartTime)?;
        Ok(Self {
            title: draft.title.trim().to_string(),
            description: draft.description.clone(),
            start_time,
            end_time: draft.end_time,
            location: draft.location.clone(),
            meeting_link: draft.meeting_link.clone(),
            priority: draft.priority.unwrap_or_default(),
            status: EventStatus::Pending,
            created_by: created_by.into(),
            collaborators: Vec::new(),
            responses: Vec::new(),
            progress_percentage: 0,
            tasks: Vec::new(),
        })
    }

    /// Serializes into a store document.
    pub fn into_fields(self) -> Value {
        serde_json::to_value(self).expect("NewEvent serialization is infallible")
    }
}

/// The record fields persisted for a new invitation.
#[derive(Debug, Clone, Serialize)]
pub struct NewInvitation {
    pub event_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: InvitationStatus,
    pub expires_at: DateTime<Utc>,
}

impl NewInvitation {
    /// Serializes into a store document.
    pub fn into_fields(self) -> Value {
        serde_json::to_value(self).expect("NewInvitation serialization is infallible")
    }
}

/// The record fields persisted for a new comment.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub event_id: String,
    pub author_id: String,
    pub content: String,
    pub comment_type: CommentType,
}

impl NewComment {
    /// Serializes into a store document.
    pub fn into_fields(self) -> Value {
        serde_json::to_value(self).expect("NewComment serialization is infallible")
    }
}

/// A fire-and-forget notification document.
#[derive(Debug, Clone, Serialize)]
pub struct NewNotification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl NewNotification {
    /// Serializes into a store document.
    pub fn into_fields(self) -> Value {
        serde_json::to_value(self).expect("NewNotification serialization is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_validate_draft_success() {
        let draft = EventDraft::new("Sprint Review", start());
        assert!(validate_event_draft(&draft).is_ok());
    }

    #[test]
    fn test_validate_draft_empty_title() {
        let draft = EventDraft::new("   ", start());
        assert_eq!(validate_event_draft(&draft), Err(EventError::EmptyTitle));
    }

    #[test]
    fn test_validate_draft_missing_start() {
        let mut draft = EventDraft::new("Sprint Review", start());
        draft.start_time = None;
        assert_eq!(
            validate_event_draft(&draft),
            Err(EventError::MissingStartTime)
        );
    }

    #[test]
    fn test_new_event_from_draft() {
        let draft = EventDraft::new("  Sprint Review  ", start())
            .with_description("Demo of the sprint work")
            .with_invitees(vec!["emp-2".to_string(), "emp-3".to_string()]);

        let new_event = NewEvent::from_draft("emp-1", &draft).unwrap();

        assert_eq!(new_event.title, "Sprint Review");
        assert_eq!(new_event.status, EventStatus::Pending);
        assert_eq!(new_event.created_by, "emp-1");
        assert_eq!(new_event.progress_percentage, 0);
        // Invitees do not seed the collaborator list
        assert!(new_event.collaborators.is_empty());
    }

    #[test]
    fn test_new_event_fields_shape() {
        let draft = EventDraft::new("Standup", start());
        let fields = NewEvent::from_draft("emp-1", &draft).unwrap().into_fields();

        assert_eq!(fields["status"], serde_json::json!("pending"));
        assert_eq!(fields["created_by"], serde_json::json!("emp-1"));
        assert!(fields.get("id").is_none());
        assert!(fields.get("created_date").is_none());
    }
}
