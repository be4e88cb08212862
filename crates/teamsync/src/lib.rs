//! Teamsync - coordinate shared events and invitations with your team.
//!
//! This crate provides the concrete half of the collaboration core:
//!
//! - [`cache::RequestCache`] - bounded in-memory cache and request
//!   throttle for entity store reads
//! - [`storage::CachedStore`] - entity store decorator adding caching,
//!   rate limiting, retry, and fail-soft reads
//! - [`storage::InMemoryStore`] - local document store backend
//!   (feature `inmemory`, enabled by default)
//! - [`workflow::CollaborationService`] - the event / invitation /
//!   response / comment workflow
//! - [`refresh::RefreshTask`] - cancellable periodic refresh
//! - [`state::AppState`] - the composition root wiring it all together
//!
//! Pure domain types and the trait seams live in `teamsync_core`.

pub mod cache;
pub mod config;
pub mod refresh;
pub mod session;
pub mod state;
pub mod storage;
pub mod workflow;
