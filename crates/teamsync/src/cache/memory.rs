//! In-memory request cache with throttle tracking.
//!
//! Holds the results of recent entity store listings alongside a
//! last-attempt table sharing the same key space. Freshness is checked
//! lazily at read time; stale entries stay put so degraded paths can
//! still serve them, and they disappear only through overwrite, prefix
//! invalidation, or LRU capacity eviction.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;
use tokio::sync::RwLock;

/// A cached query result with its capture time.
#[derive(Debug, Clone)]
struct CacheSlot {
    records: Vec<Value>,
    fetched_at: Instant,
}

impl CacheSlot {
    fn new(records: Vec<Value>) -> Self {
        Self {
            records,
            fetched_at: Instant::now(),
        }
    }

    /// Returns true if this slot is still within its freshness window.
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Bounded in-memory cache and request throttle for entity store reads.
///
/// An explicitly constructed, injectable instance: the composition root
/// builds one and threads it through the cached store, so tests never
/// share hidden global state. Cloning is cheap and shares the
/// underlying maps.
#[derive(Debug, Clone)]
pub struct RequestCache {
    /// Cached query results with LRU capacity eviction.
    entries: Arc<RwLock<LruCache<String, CacheSlot>>>,
    /// Timestamp of the last attempt per key, successful or not.
    attempts: Arc<RwLock<HashMap<String, Instant>>>,
}

impl RequestCache {
    /// Creates a cache bounded to `max_entries` query results.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).expect("max_entries must be > 0");
        Self {
            entries: Arc::new(RwLock::new(LruCache::new(capacity))),
            attempts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the cached records for a key if they are still fresh.
    ///
    /// Stale entries are ignored, not removed: they remain available to
    /// [`read_stale`](Self::read_stale) until superseded or invalidated.
    pub async fn read(&self, key: &str, ttl: Duration) -> Option<Vec<Value>> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(slot) if slot.is_fresh(ttl) => Some(slot.records.clone()),
            _ => None,
        }
    }

    /// Returns the cached records for a key regardless of age.
    ///
    /// Only degraded paths use this: a throttled or failing remote read
    /// prefers stale data over an error or an empty result.
    pub async fn read_stale(&self, key: &str) -> Option<Vec<Value>> {
        let mut entries = self.entries.write().await;
        entries.get(key).map(|slot| slot.records.clone())
    }

    /// Stores records for a key, unconditionally replacing any prior
    /// entry and resetting its capture time.
    pub async fn write(&self, key: &str, records: Vec<Value>) {
        let mut entries = self.entries.write().await;
        entries.put(key.to_string(), CacheSlot::new(records));
    }

    /// Returns true if enough time has passed since the last attempt
    /// for this key. Read-only; does not stamp an attempt.
    pub async fn can_attempt(&self, key: &str, cooldown: Duration) -> bool {
        let attempts = self.attempts.read().await;
        match attempts.get(key) {
            Some(last) => last.elapsed() >= cooldown,
            None => true,
        }
    }

    /// Stamps the last-attempt time for a key, whether or not the
    /// request will succeed.
    pub async fn record_attempt(&self, key: &str) {
        let mut attempts = self.attempts.write().await;
        attempts.insert(key.to_string(), Instant::now());
    }

    /// Removes every cache entry and throttle record whose key starts
    /// with the given prefix. Called after mutations that affect a
    /// collection's listings.
    pub async fn invalidate_prefix(&self, prefix: &str) {
        let removed = {
            let mut entries = self.entries.write().await;
            let keys: Vec<String> = entries
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &keys {
                entries.pop(key);
            }
            keys.len()
        };

        {
            let mut attempts = self.attempts.write().await;
            attempts.retain(|key, _| !key.starts_with(prefix));
        }

        tracing::trace!(prefix, removed, "Invalidated cached queries");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_MAX_ENTRIES: usize = 1000;

    fn records() -> Vec<Value> {
        vec![json!({"id": "rec-1"}), json!({"id": "rec-2"})]
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let cache = RequestCache::new(TEST_MAX_ENTRIES);
        cache.write("Employee_list_{}", records()).await;

        let result = cache
            .read("Employee_list_{}", Duration::from_secs(30))
            .await;
        assert_eq!(result, Some(records()));
    }

    #[tokio::test]
    async fn test_read_missing_key() {
        let cache = RequestCache::new(TEST_MAX_ENTRIES);
        let result = cache.read("Employee_list_{}", Duration::from_secs(30)).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_read_expired_returns_none() {
        let cache = RequestCache::new(TEST_MAX_ENTRIES);
        cache.write("Employee_list_{}", records()).await;

        tokio::time::sleep(Duration::from_millis(60)).await;

        let result = cache
            .read("Employee_list_{}", Duration::from_millis(50))
            .await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_stale_entry_survives_fresh_read() {
        let cache = RequestCache::new(TEST_MAX_ENTRIES);
        cache.write("Employee_list_{}", records()).await;

        tokio::time::sleep(Duration::from_millis(60)).await;

        // Fresh read misses but must not destroy the slot
        assert_eq!(
            cache
                .read("Employee_list_{}", Duration::from_millis(50))
                .await,
            None
        );
        assert_eq!(cache.read_stale("Employee_list_{}").await, Some(records()));
    }

    #[tokio::test]
    async fn test_write_resets_freshness() {
        let cache = RequestCache::new(TEST_MAX_ENTRIES);
        cache.write("k", vec![json!(1)]).await;

        tokio::time::sleep(Duration::from_millis(60)).await;
        cache.write("k", vec![json!(2)]).await;

        let result = cache.read("k", Duration::from_millis(50)).await;
        assert_eq!(result, Some(vec![json!(2)]));
    }

    #[tokio::test]
    async fn test_throttle_blocks_within_cooldown() {
        let cache = RequestCache::new(TEST_MAX_ENTRIES);
        let cooldown = Duration::from_millis(80);

        assert!(cache.can_attempt("k", cooldown).await);
        cache.record_attempt("k").await;
        assert!(!cache.can_attempt("k", cooldown).await);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(cache.can_attempt("k", cooldown).await);
    }

    #[tokio::test]
    async fn test_can_attempt_is_read_only() {
        let cache = RequestCache::new(TEST_MAX_ENTRIES);
        let cooldown = Duration::from_millis(80);

        // Checking repeatedly without recording never trips the gate
        assert!(cache.can_attempt("k", cooldown).await);
        assert!(cache.can_attempt("k", cooldown).await);
    }

    #[tokio::test]
    async fn test_invalidate_prefix_scope() {
        let cache = RequestCache::new(TEST_MAX_ENTRIES);
        cache.write("Employee_list_{}", records()).await;
        cache.write("Employee_filter_{\"a\":1}", records()).await;
        cache.write("TimeEntry_list_{}", records()).await;
        cache.record_attempt("Employee_list_{}").await;
        cache.record_attempt("TimeEntry_list_{}").await;

        cache.invalidate_prefix("Employee_").await;

        let ttl = Duration::from_secs(60);
        assert_eq!(cache.read("Employee_list_{}", ttl).await, None);
        assert_eq!(cache.read("Employee_filter_{\"a\":1}", ttl).await, None);
        assert_eq!(cache.read_stale("Employee_list_{}").await, None);
        // Other collections survive
        assert_eq!(cache.read("TimeEntry_list_{}", ttl).await, Some(records()));

        // Throttle records cleared for the same prefix only
        assert!(cache.can_attempt("Employee_list_{}", ttl).await);
        assert!(!cache.can_attempt("TimeEntry_list_{}", ttl).await);
    }

    #[tokio::test]
    async fn test_lru_capacity_eviction() {
        let cache = RequestCache::new(2);
        cache.write("k1", vec![json!(1)]).await;
        cache.write("k2", vec![json!(2)]).await;

        // Touch k1 so k2 is the eviction candidate
        let ttl = Duration::from_secs(60);
        cache.read("k1", ttl).await;

        cache.write("k3", vec![json!(3)]).await;

        assert!(cache.read("k1", ttl).await.is_some());
        assert!(cache.read("k2", ttl).await.is_none());
        assert!(cache.read("k3", ttl).await.is_some());
    }

    #[tokio::test]
    #[should_panic(expected = "max_entries must be > 0")]
    async fn test_zero_capacity_panics() {
        let _ = RequestCache::new(0);
    }
}
