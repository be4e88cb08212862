use std::time::Duration;

use crate::storage::{ChurnClass, Collection};

/// Tunables governing cache freshness, request throttling, and retry
/// behavior for entity store reads.
///
/// High-churn collections (employee activity, time tracking) get a
/// short TTL and cooldown because dashboard widgets poll them; other
/// collections tolerate staler data in exchange for fewer requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// Freshness window for high-churn collections.
    pub high_churn_ttl: Duration,
    /// Freshness window for everything else.
    pub standard_ttl: Duration,
    /// Minimum delay between attempts for the same high-churn query.
    pub high_churn_cooldown: Duration,
    /// Minimum delay between attempts for other queries.
    pub standard_cooldown: Duration,
    /// Base delay for retry backoff; the nth retry waits `n * base`.
    pub retry_base_delay: Duration,
    /// Remote rate-limit responses retried at most this many times.
    pub max_rate_limit_retries: u32,
    /// A locally-throttled request with no cached fallback waits out
    /// the cooldown at most this many times before failing.
    pub max_throttle_waits: u32,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            high_churn_ttl: Duration::from_secs(30),
            standard_ttl: Duration::from_secs(120),
            high_churn_cooldown: Duration::from_secs(15),
            standard_cooldown: Duration::from_secs(20),
            retry_base_delay: Duration::from_secs(5),
            max_rate_limit_retries: 2,
            max_throttle_waits: 1,
        }
    }
}

impl CachePolicy {
    /// Returns the freshness window for a collection.
    pub fn ttl(&self, collection: Collection) -> Duration {
        match collection.churn() {
            ChurnClass::High => self.high_churn_ttl,
            ChurnClass::Standard => self.standard_ttl,
        }
    }

    /// Returns the throttle cooldown for a collection.
    pub fn cooldown(&self, collection: Collection) -> Duration {
        match collection.churn() {
            ChurnClass::High => self.high_churn_cooldown,
            ChurnClass::Standard => self.standard_cooldown,
        }
    }

    /// Returns the backoff delay before the given retry, 1-indexed.
    pub fn retry_delay(&self, retry: u32) -> Duration {
        self.retry_base_delay * retry
    }
}
