//! Session provider seam.
//!
//! The surrounding application owns authentication; this crate only
//! needs to know who the current user is so the workflow can resolve
//! the matching employee record before any write.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The authenticated user as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub active: bool,
}

/// Supplies the current authenticated user, if any.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns the current user, or `None` when no session is active.
    async fn current_user(&self) -> Option<AuthUser>;
}
