//! Application state wiring.
//!
//! The composition root: builds the cache, wraps the selected entity
//! store backend with it, and hands the cached store to the workflow
//! service. The cache is an explicitly constructed instance threaded
//! through here, never a module-level singleton, so tests can build
//! isolated states freely.

use std::sync::Arc;

use teamsync_core::storage::EntityStore;

use crate::cache::RequestCache;
use crate::config::Config;
use crate::storage::CachedStore;
use crate::workflow::CollaborationService;

/// Shared application state.
///
/// Cloning is cheap; all members are reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// The entity store, wrapped with caching and rate limiting.
    pub store: Arc<dyn EntityStore>,
    /// The cache instance shared with `store`, exposed for explicit
    /// invalidation and inspection.
    pub cache: RequestCache,
    /// The collaboration workflow, operating through `store`.
    pub workflow: Arc<CollaborationService>,
}

impl AppState {
    /// Creates an AppState around an entity store backend.
    pub fn with_store<S: EntityStore + 'static>(backend: Arc<S>, config: &Config) -> Self {
        let cache = RequestCache::new(config.cache_max_entries);
        let store: Arc<dyn EntityStore> = Arc::new(CachedStore::new(
            backend,
            cache.clone(),
            config.cache_policy(),
        ));
        let workflow = Arc::new(
            CollaborationService::new(store.clone())
                .with_invitation_lifetime(config.invitation_lifetime()),
        );

        Self {
            store,
            cache,
            workflow,
        }
    }

    /// Creates an AppState backed by the in-memory store.
    /// Useful for testing without any external dependencies.
    #[cfg(feature = "inmemory")]
    pub fn new(config: &Config) -> Self {
        Self::with_store(Arc::new(crate::storage::InMemoryStore::new()), config)
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use teamsync_core::collaboration::EventDraft;
    use teamsync_core::storage::{record_id, Collection, ListQuery};

    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_wired_state_runs_workflow_through_cache() {
        let state = AppState::new(&Config::default());

        let draft = EventDraft::new(
            "Kickoff",
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        )
        .with_invitees(vec!["emp-2".to_string()]);

        let (event, invitations) = state.workflow.create_event("emp-1", &draft).await.unwrap();
        assert_eq!(invitations.len(), 1);

        let events = state
            .store
            .list(Collection::CollaborativeEvent, &ListQuery::new())
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(record_id(&events[0]), Some(event.id.as_str()));
    }
}
