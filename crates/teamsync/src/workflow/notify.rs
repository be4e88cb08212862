//! Fire-and-forget notification writes.
//!
//! Notifications are best-effort: a failed write is logged and never
//! propagated, so one broken notification cannot block the workflow
//! that triggered it.

use serde_json::json;

use teamsync_core::collaboration::{CollaborationInvitation, NewNotification};
use teamsync_core::storage::{Collection, EntityStore};

/// Notifies an employee that they have been invited to an event.
pub(crate) async fn invitation_sent(
    store: &dyn EntityStore,
    invitation: &CollaborationInvitation,
    event_title: &str,
) {
    let notification = NewNotification {
        user_id: invitation.receiver_id.clone(),
        title: "New collaboration invitation".to_string(),
        message: format!("You have been invited to collaborate on \"{event_title}\""),
        kind: "collaboration_invitation".to_string(),
        link_to: Some(format!("/events/{}", invitation.event_id)),
        metadata: Some(json!({
            "invitation_id": invitation.id,
            "event_id": invitation.event_id,
        })),
    };

    if let Err(err) = store
        .create(Collection::Notification, notification.into_fields())
        .await
    {
        tracing::warn!(
            invitation_id = %invitation.id,
            receiver_id = %invitation.receiver_id,
            error = %err,
            "Failed to create invitation notification"
        );
    }
}
