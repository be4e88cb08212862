//! Collaboration workflow service.
//!
//! Coordinates the event / invitation / response / comment lifecycle
//! against the entity store. Every operation here is a sequence of
//! independent store calls with no cross-entity transaction; the
//! invitation-response pair is an explicit two-step saga whose repair
//! rule is [`CollaborationService::reconcile_event_collaborators`].

mod error;
mod notify;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use serde_json::json;

use teamsync_core::collaboration::{
    validate_comment_content, CollaborationComment, CollaborationInvitation, CollaborativeEvent,
    CommentType, EventDraft, EventError, EventResponse, EventStatus, InvitationDecision,
    InvitationStatus, NewComment, NewEvent, NewInvitation,
};
use teamsync_core::storage::{decode, decode_many, Collection, EntityStore, FilterQuery};

pub use error::WorkflowError;

/// Default invitation lifetime.
const INVITATION_LIFETIME_DAYS: i64 = 7;

/// The collaboration workflow over an entity store.
///
/// Constructed by the composition root with the cached store, so reads
/// issued here benefit from the cache and every write invalidates the
/// affected collection's cached listings.
pub struct CollaborationService {
    store: Arc<dyn EntityStore>,
    invitation_lifetime: Duration,
}

impl CollaborationService {
    /// Creates a workflow service with the default 7-day invitation
    /// lifetime.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            invitation_lifetime: Duration::days(INVITATION_LIFETIME_DAYS),
        }
    }

    /// Overrides the invitation lifetime.
    pub fn with_invitation_lifetime(mut self, lifetime: Duration) -> Self {
        self.invitation_lifetime = lifetime;
        self
    }

    async fn fetch_event(&self, event_id: &str) -> Result<CollaborativeEvent, WorkflowError> {
        let records = self
            .store
            .filter(
                Collection::CollaborativeEvent,
                &FilterQuery::matching("id", event_id).with_limit(1),
            )
            .await?;
        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| WorkflowError::EventNotFound(event_id.to_string()))?;
        Ok(decode(record)?)
    }

    async fn fetch_invitation(
        &self,
        invitation_id: &str,
    ) -> Result<CollaborationInvitation, WorkflowError> {
        let records = self
            .store
            .filter(
                Collection::CollaborationInvitation,
                &FilterQuery::matching("id", invitation_id).with_limit(1),
            )
            .await?;
        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| WorkflowError::InvitationNotFound(invitation_id.to_string()))?;
        Ok(decode(record)?)
    }

    /// Creates a collaborative event and fans out invitations to the
    /// draft's invitees.
    ///
    /// The event is persisted `Pending` at zero progress with an empty
    /// collaborator list; invitees become collaborators only by
    /// accepting their invitation. Returns the stored event together
    /// with the invitations that were actually created.
    pub async fn create_event(
        &self,
        creator_id: &str,
        draft: &EventDraft,
    ) -> Result<(CollaborativeEvent, Vec<CollaborationInvitation>), WorkflowError> {
        let fields = NewEvent::from_draft(creator_id, draft)?.into_fields();
        let record = self
            .store
            .create(Collection::CollaborativeEvent, fields)
            .await?;
        let event: CollaborativeEvent = decode(record)?;
        tracing::debug!(event_id = %event.id, created_by = creator_id, "Collaborative event created");

        let invitations = self
            .fan_out(
                &event,
                creator_id,
                &draft.invitee_ids,
                draft.invitation_message.as_deref(),
            )
            .await;
        Ok((event, invitations))
    }

    /// Sends invitations for an existing event.
    ///
    /// Fails with `EventNotFound` if the event is gone; individual
    /// invitation failures are isolated and logged, not propagated.
    pub async fn send_invitations(
        &self,
        event_id: &str,
        sender_id: &str,
        invitee_ids: &[String],
        message: Option<&str>,
    ) -> Result<Vec<CollaborationInvitation>, WorkflowError> {
        let event = self.fetch_event(event_id).await?;
        Ok(self
            .fan_out(&event, sender_id, invitee_ids, message)
            .await)
    }

    /// Creates one invitation per invitee, concurrently.
    ///
    /// The sender and duplicate ids are skipped. Invitation creations
    /// are independent: one failure is logged and dropped without
    /// aborting the rest, and a failed notification never blocks the
    /// invitation it belongs to.
    async fn fan_out(
        &self,
        event: &CollaborativeEvent,
        sender_id: &str,
        invitee_ids: &[String],
        message: Option<&str>,
    ) -> Vec<CollaborationInvitation> {
        let mut seen = HashSet::new();
        let invitees: Vec<&str> = invitee_ids
            .iter()
            .map(String::as_str)
            .filter(|id| *id != sender_id)
            .filter(|id| seen.insert(*id))
            .collect();

        let expires_at = Utc::now() + self.invitation_lifetime;
        let creations = invitees
            .into_iter()
            .map(|receiver| self.create_invitation(event, sender_id, receiver, message, expires_at));

        join_all(creations).await.into_iter().flatten().collect()
    }

    async fn create_invitation(
        &self,
        event: &CollaborativeEvent,
        sender_id: &str,
        receiver_id: &str,
        message: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> Option<CollaborationInvitation> {
        let fields = NewInvitation {
            event_id: event.id.clone(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            message: message.map(str::to_string),
            status: InvitationStatus::Sent,
            expires_at,
        }
        .into_fields();

        let created = self
            .store
            .create(Collection::CollaborationInvitation, fields)
            .await
            .and_then(decode::<CollaborationInvitation>);

        match created {
            Ok(invitation) => {
                notify::invitation_sent(self.store.as_ref(), &invitation, &event.title).await;
                Some(invitation)
            }
            Err(err) => {
                tracing::warn!(
                    event_id = %event.id,
                    receiver_id,
                    error = %err,
                    "Failed to create invitation"
                );
                None
            }
        }
    }

    /// Records a receiver's decision on an invitation.
    ///
    /// The invitation transitions exactly once: responding to an
    /// already-terminal invitation is a no-op that returns the stored
    /// record. On acceptance the referenced event gains the responder
    /// as a collaborator (idempotent check-before-append) in a second,
    /// non-atomic write.
    pub async fn respond_to_invitation(
        &self,
        invitation_id: &str,
        responder_id: &str,
        decision: InvitationDecision,
        message: Option<&str>,
    ) -> Result<CollaborationInvitation, WorkflowError> {
        let invitation = self.fetch_invitation(invitation_id).await?;
        if invitation.status.is_terminal() {
            tracing::debug!(invitation_id, "Invitation already responded; ignoring");
            return Ok(invitation);
        }
        if invitation.receiver_id != responder_id {
            tracing::warn!(
                invitation_id,
                receiver_id = %invitation.receiver_id,
                responder_id,
                "Response from someone other than the invited employee"
            );
        }

        let now = Utc::now();
        let patch = json!({
            "status": decision.as_status(),
            "response_message": message,
            "response_date": now,
        });
        let updated = self
            .store
            .update(Collection::CollaborationInvitation, invitation_id, patch)
            .await?;
        let updated: CollaborationInvitation = decode(updated)?;
        tracing::debug!(invitation_id, ?decision, "Invitation response recorded");

        if decision == InvitationDecision::Accepted {
            let event = self.fetch_event(&updated.event_id).await?;
            self.join_event(&event, responder_id, now, message).await?;
        }

        Ok(updated)
    }

    /// Adds the employee to the event's collaborators and records their
    /// response, skipping whatever is already present.
    async fn join_event(
        &self,
        event: &CollaborativeEvent,
        employee_id: &str,
        response_date: DateTime<Utc>,
        message: Option<&str>,
    ) -> Result<(), WorkflowError> {
        let mut collaborators = event.collaborators.clone();
        let mut responses = event.responses.clone();
        let mut changed = false;

        if !collaborators.iter().any(|c| c == employee_id) {
            collaborators.push(employee_id.to_string());
            changed = true;
        }
        if event.response_from(employee_id).is_none() {
            responses.push(EventResponse {
                employee_id: employee_id.to_string(),
                response: InvitationDecision::Accepted,
                response_date,
                message: message.map(str::to_string),
            });
            changed = true;
        }

        if changed {
            let patch = json!({
                "collaborators": collaborators,
                "responses": responses,
            });
            self.store
                .update(Collection::CollaborativeEvent, &event.id, patch)
                .await?;
            tracing::debug!(event_id = %event.id, employee_id, "Collaborator joined event");
        }
        Ok(())
    }

    /// Marks a freshly-received invitation as viewed. Any other state
    /// is returned untouched.
    pub async fn mark_invitation_viewed(
        &self,
        invitation_id: &str,
    ) -> Result<CollaborationInvitation, WorkflowError> {
        let invitation = self.fetch_invitation(invitation_id).await?;
        if invitation.status != InvitationStatus::Sent {
            return Ok(invitation);
        }
        let updated = self
            .store
            .update(
                Collection::CollaborationInvitation,
                invitation_id,
                json!({"status": InvitationStatus::Viewed}),
            )
            .await?;
        Ok(decode(updated)?)
    }

    /// Appends a comment to an event's thread.
    pub async fn add_comment(
        &self,
        event_id: &str,
        author_id: &str,
        content: &str,
        comment_type: CommentType,
    ) -> Result<CollaborationComment, WorkflowError> {
        let content = validate_comment_content(content)?;
        let fields = NewComment {
            event_id: event_id.to_string(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            comment_type,
        }
        .into_fields();

        let record = self
            .store
            .create(Collection::CollaborationComment, fields)
            .await?;
        Ok(decode(record)?)
    }

    /// Moves an event to a new status.
    ///
    /// Transitions follow the status table; illegal moves fail with
    /// `InvalidTransition`. Only the creator is expected to call this;
    /// other requesters are logged but not blocked, since authorization
    /// lives with the surrounding application.
    pub async fn update_event_status(
        &self,
        event_id: &str,
        requester_id: &str,
        new_status: EventStatus,
    ) -> Result<CollaborativeEvent, WorkflowError> {
        let event = self.fetch_event(event_id).await?;

        if event.created_by != requester_id {
            tracing::warn!(
                event_id,
                requester_id,
                created_by = %event.created_by,
                "Status change requested by non-creator"
            );
        }
        if !event.status.can_transition_to(new_status) {
            return Err(EventError::InvalidTransition {
                from: event.status,
                to: new_status,
            }
            .into());
        }

        let updated = self
            .store
            .update(
                Collection::CollaborativeEvent,
                event_id,
                json!({"status": new_status}),
            )
            .await?;
        tracing::debug!(event_id, status = new_status.as_str(), "Event status updated");
        Ok(decode(updated)?)
    }

    /// Repairs the non-atomic invitation/event write pair.
    ///
    /// The response saga updates the invitation before the event, so a
    /// failure in between leaves an accepted invitation whose receiver
    /// is missing from the event's collaborators. This pass appends
    /// every such receiver (synthesizing a response record when none
    /// exists) in a single event write.
    pub async fn reconcile_event_collaborators(
        &self,
        event_id: &str,
    ) -> Result<CollaborativeEvent, WorkflowError> {
        let event = self.fetch_event(event_id).await?;

        let records = self
            .store
            .filter(
                Collection::CollaborationInvitation,
                &FilterQuery::matching("event_id", event_id).and("status", "accepted"),
            )
            .await?;
        let accepted: Vec<CollaborationInvitation> = decode_many(records)?;

        let mut collaborators = event.collaborators.clone();
        let mut responses = event.responses.clone();
        let mut repaired = 0;

        for invitation in &accepted {
            if collaborators.iter().any(|c| c == &invitation.receiver_id) {
                continue;
            }
            collaborators.push(invitation.receiver_id.clone());
            if !responses
                .iter()
                .any(|r| r.employee_id == invitation.receiver_id)
            {
                responses.push(EventResponse {
                    employee_id: invitation.receiver_id.clone(),
                    response: InvitationDecision::Accepted,
                    response_date: invitation.response_date.unwrap_or_else(Utc::now),
                    message: invitation.response_message.clone(),
                });
            }
            repaired += 1;
        }

        if repaired == 0 {
            return Ok(event);
        }

        tracing::info!(event_id, repaired, "Repaired collaborators from accepted invitations");
        let updated = self
            .store
            .update(
                Collection::CollaborativeEvent,
                event_id,
                json!({"collaborators": collaborators, "responses": responses}),
            )
            .await?;
        Ok(decode(updated)?)
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use teamsync_core::storage::ListQuery;

    use crate::storage::InMemoryStore;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    fn service() -> (Arc<InMemoryStore>, CollaborationService) {
        let store = Arc::new(InMemoryStore::new());
        let service = CollaborationService::new(store.clone());
        (store, service)
    }

    fn review_draft() -> EventDraft {
        EventDraft::new("Sprint Review", start())
            .with_invitees(vec!["emp-2".to_string(), "emp-3".to_string()])
            .with_invitation_message("Join us for the demo")
    }

    #[tokio::test]
    async fn test_create_event_with_invitations() {
        let (store, service) = service();

        let (event, invitations) = service.create_event("emp-1", &review_draft()).await.unwrap();

        assert_eq!(event.title, "Sprint Review");
        assert_eq!(event.status, EventStatus::Pending);
        assert_eq!(event.created_by, "emp-1");
        assert!(event.collaborators.is_empty());
        assert_eq!(event.progress_percentage, 0);

        assert_eq!(invitations.len(), 2);
        let mut receivers: Vec<&str> = invitations
            .iter()
            .map(|i| i.receiver_id.as_str())
            .collect();
        receivers.sort_unstable();
        assert_eq!(receivers, vec!["emp-2", "emp-3"]);
        assert!(invitations.iter().all(|i| i.sender_id == "emp-1"));
        assert!(invitations.iter().all(|i| i.status == InvitationStatus::Sent));
        assert!(invitations
            .iter()
            .all(|i| i.message.as_deref() == Some("Join us for the demo")));

        // One notification per invitee
        let notifications = store
            .list(Collection::Notification, &ListQuery::new())
            .await
            .unwrap();
        assert_eq!(notifications.len(), 2);
    }

    #[tokio::test]
    async fn test_invitation_expiry_defaults_to_seven_days() {
        let (_, service) = service();

        let before = Utc::now();
        let (_, invitations) = service.create_event("emp-1", &review_draft()).await.unwrap();
        let after = Utc::now();

        for invitation in &invitations {
            assert!(invitation.expires_at >= before + Duration::days(7));
            assert!(invitation.expires_at <= after + Duration::days(7));
        }
    }

    #[tokio::test]
    async fn test_fan_out_excludes_sender_and_duplicates() {
        let (_, service) = service();
        let draft = EventDraft::new("Standup", start()).with_invitees(vec![
            "emp-2".to_string(),
            "emp-2".to_string(),
            "emp-1".to_string(),
            "emp-3".to_string(),
        ]);

        let (_, invitations) = service.create_event("emp-1", &draft).await.unwrap();

        let receivers: Vec<&str> = invitations
            .iter()
            .map(|i| i.receiver_id.as_str())
            .collect();
        assert_eq!(receivers, vec!["emp-2", "emp-3"]);
    }

    #[tokio::test]
    async fn test_one_failed_invitation_does_not_block_the_rest() {
        use async_trait::async_trait;
        use serde_json::Value;
        use teamsync_core::storage::{ListQuery, Result as StoreResult, StoreError};

        /// Rejects invitation creation for a single receiver.
        struct FlakyInvitationStore {
            inner: InMemoryStore,
            reject_receiver: &'static str,
        }

        #[async_trait]
        impl EntityStore for FlakyInvitationStore {
            async fn list(&self, c: Collection, q: &ListQuery) -> StoreResult<Vec<Value>> {
                self.inner.list(c, q).await
            }

            async fn filter(&self, c: Collection, q: &FilterQuery) -> StoreResult<Vec<Value>> {
                self.inner.filter(c, q).await
            }

            async fn create(&self, c: Collection, fields: Value) -> StoreResult<Value> {
                if c == Collection::CollaborationInvitation
                    && fields.get("receiver_id").and_then(Value::as_str)
                        == Some(self.reject_receiver)
                {
                    return Err(StoreError::Network("connection reset".to_string()));
                }
                self.inner.create(c, fields).await
            }

            async fn update(&self, c: Collection, id: &str, patch: Value) -> StoreResult<Value> {
                self.inner.update(c, id, patch).await
            }

            async fn delete(&self, c: Collection, id: &str) -> StoreResult<()> {
                self.inner.delete(c, id).await
            }
        }

        let store = Arc::new(FlakyInvitationStore {
            inner: InMemoryStore::new(),
            reject_receiver: "emp-2",
        });
        let service = CollaborationService::new(store);

        let (_, invitations) = service.create_event("emp-1", &review_draft()).await.unwrap();

        // emp-2's invitation failed; emp-3's still went out
        assert_eq!(invitations.len(), 1);
        assert_eq!(invitations[0].receiver_id, "emp-3");
    }

    #[tokio::test]
    async fn test_send_invitations_to_existing_event() {
        let (_, service) = service();
        let draft = EventDraft::new("Standup", start());
        let (event, _) = service.create_event("emp-1", &draft).await.unwrap();

        let invitations = service
            .send_invitations(&event.id, "emp-1", &["emp-4".to_string()], Some("Join late?"))
            .await
            .unwrap();

        assert_eq!(invitations.len(), 1);
        assert_eq!(invitations[0].receiver_id, "emp-4");
        assert_eq!(invitations[0].event_id, event.id);
    }

    #[tokio::test]
    async fn test_send_invitations_for_missing_event() {
        let (_, service) = service();
        let result = service
            .send_invitations("missing", "emp-1", &["emp-2".to_string()], None)
            .await;
        assert_eq!(
            result.unwrap_err(),
            WorkflowError::EventNotFound("missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_event_requires_title_and_start() {
        let (_, service) = service();

        let untitled = EventDraft::new("   ", start());
        assert_eq!(
            service.create_event("emp-1", &untitled).await.unwrap_err(),
            WorkflowError::Event(EventError::EmptyTitle)
        );

        let mut dateless = EventDraft::new("Sprint Review", start());
        dateless.start_time = None;
        assert_eq!(
            service.create_event("emp-1", &dateless).await.unwrap_err(),
            WorkflowError::Event(EventError::MissingStartTime)
        );
    }

    #[tokio::test]
    async fn test_accept_invitation_joins_event() {
        let (_, service) = service();
        let (event, invitations) = service.create_event("emp-1", &review_draft()).await.unwrap();
        let invitation = invitations
            .iter()
            .find(|i| i.receiver_id == "emp-2")
            .unwrap();

        let updated = service
            .respond_to_invitation(
                &invitation.id,
                "emp-2",
                InvitationDecision::Accepted,
                Some("Happy to join"),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, InvitationStatus::Accepted);
        assert_eq!(updated.response_message.as_deref(), Some("Happy to join"));
        assert!(updated.response_date.is_some());

        let event = service.fetch_event(&event.id).await.unwrap();
        assert_eq!(event.collaborators, vec!["emp-2".to_string()]);
        assert_eq!(event.responses.len(), 1);
        assert_eq!(event.responses[0].employee_id, "emp-2");
        assert_eq!(event.responses[0].response, InvitationDecision::Accepted);
    }

    #[tokio::test]
    async fn test_accepting_twice_is_idempotent() {
        let (_, service) = service();
        let (event, invitations) = service.create_event("emp-1", &review_draft()).await.unwrap();
        let invitation = invitations
            .iter()
            .find(|i| i.receiver_id == "emp-2")
            .unwrap();

        for _ in 0..2 {
            service
                .respond_to_invitation(&invitation.id, "emp-2", InvitationDecision::Accepted, None)
                .await
                .unwrap();
        }

        let event = service.fetch_event(&event.id).await.unwrap();
        let joined: Vec<&String> = event
            .collaborators
            .iter()
            .filter(|c| *c == "emp-2")
            .collect();
        assert_eq!(joined.len(), 1);
        assert_eq!(event.responses.len(), 1);
    }

    #[tokio::test]
    async fn test_reject_invitation_leaves_event_untouched() {
        let (_, service) = service();
        let (event, invitations) = service.create_event("emp-1", &review_draft()).await.unwrap();
        let invitation = invitations
            .iter()
            .find(|i| i.receiver_id == "emp-3")
            .unwrap();

        let updated = service
            .respond_to_invitation(&invitation.id, "emp-3", InvitationDecision::Rejected, None)
            .await
            .unwrap();
        assert_eq!(updated.status, InvitationStatus::Rejected);

        let event = service.fetch_event(&event.id).await.unwrap();
        assert!(event.collaborators.is_empty());
        assert!(event.responses.is_empty());
    }

    #[tokio::test]
    async fn test_respond_to_missing_invitation() {
        let (_, service) = service();
        let result = service
            .respond_to_invitation("missing", "emp-2", InvitationDecision::Accepted, None)
            .await;
        assert_eq!(
            result.unwrap_err(),
            WorkflowError::InvitationNotFound("missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_mark_invitation_viewed() {
        let (_, service) = service();
        let (_, invitations) = service.create_event("emp-1", &review_draft()).await.unwrap();
        let invitation = &invitations[0];

        let viewed = service.mark_invitation_viewed(&invitation.id).await.unwrap();
        assert_eq!(viewed.status, InvitationStatus::Viewed);

        // Viewing again changes nothing
        let again = service.mark_invitation_viewed(&invitation.id).await.unwrap();
        assert_eq!(again.status, InvitationStatus::Viewed);
    }

    #[tokio::test]
    async fn test_add_comment() {
        let (_, service) = service();
        let (event, _) = service.create_event("emp-1", &review_draft()).await.unwrap();

        let comment = service
            .add_comment(&event.id, "emp-2", "  What is the agenda?  ", CommentType::Question)
            .await
            .unwrap();

        assert_eq!(comment.event_id, event.id);
        assert_eq!(comment.content, "What is the agenda?");
        assert_eq!(comment.comment_type, CommentType::Question);
    }

    #[tokio::test]
    async fn test_add_comment_rejects_empty_content() {
        let (_, service) = service();
        let (event, _) = service.create_event("emp-1", &review_draft()).await.unwrap();

        let result = service
            .add_comment(&event.id, "emp-2", "   ", CommentType::Comment)
            .await;
        assert_eq!(
            result.unwrap_err(),
            WorkflowError::Comment(teamsync_core::collaboration::CommentError::EmptyContent)
        );
    }

    #[tokio::test]
    async fn test_status_progression() {
        let (_, service) = service();
        let (event, _) = service.create_event("emp-1", &review_draft()).await.unwrap();

        let event = service
            .update_event_status(&event.id, "emp-1", EventStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(event.status, EventStatus::InProgress);

        let event = service
            .update_event_status(&event.id, "emp-1", EventStatus::Completed)
            .await
            .unwrap();
        assert_eq!(event.status, EventStatus::Completed);
    }

    #[tokio::test]
    async fn test_illegal_transitions_are_rejected() {
        let (_, service) = service();
        let (event, _) = service.create_event("emp-1", &review_draft()).await.unwrap();

        // Cannot skip the in-progress stage
        let result = service
            .update_event_status(&event.id, "emp-1", EventStatus::Completed)
            .await;
        assert_eq!(
            result.unwrap_err(),
            WorkflowError::Event(EventError::InvalidTransition {
                from: EventStatus::Pending,
                to: EventStatus::Completed,
            })
        );

        // Terminal states admit nothing
        service
            .update_event_status(&event.id, "emp-1", EventStatus::Cancelled)
            .await
            .unwrap();
        let result = service
            .update_event_status(&event.id, "emp-1", EventStatus::InProgress)
            .await;
        assert!(matches!(
            result,
            Err(WorkflowError::Event(EventError::InvalidTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn test_reconcile_repairs_missing_collaborator() {
        let (store, service) = service();
        let (event, invitations) = service.create_event("emp-1", &review_draft()).await.unwrap();
        let invitation = invitations
            .iter()
            .find(|i| i.receiver_id == "emp-2")
            .unwrap();

        // Simulate the saga failing between the two writes: the
        // invitation is accepted but the event was never updated.
        store
            .update(
                Collection::CollaborationInvitation,
                &invitation.id,
                json!({"status": "accepted", "response_date": Utc::now()}),
            )
            .await
            .unwrap();

        let repaired = service
            .reconcile_event_collaborators(&event.id)
            .await
            .unwrap();

        assert_eq!(repaired.collaborators, vec!["emp-2".to_string()]);
        assert_eq!(repaired.responses.len(), 1);
        assert_eq!(repaired.responses[0].employee_id, "emp-2");

        // Running again finds nothing to repair
        let unchanged = service
            .reconcile_event_collaborators(&event.id)
            .await
            .unwrap();
        assert_eq!(unchanged.collaborators.len(), 1);
        assert_eq!(unchanged.responses.len(), 1);
    }
}
