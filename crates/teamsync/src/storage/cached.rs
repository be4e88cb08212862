//! Cached entity store decorator.
//!
//! Wraps an `EntityStore` with the read-side cache and rate limiter:
//! fresh cache hits skip the network, repeated identical queries are
//! throttled, transient failures are retried with backoff, and read
//! failures degrade to stale-cache or empty results instead of
//! surfacing. Writes pass through once, untouched, and invalidate the
//! collection's cached listings on success.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use teamsync_core::cache::{collection_prefix, CachePolicy, RequestDescriptor};
use teamsync_core::storage::{
    Collection, EntityStore, FilterQuery, ListQuery, Result, StoreError,
};

use crate::cache::RequestCache;

/// The two read operations routed through the cache.
enum QueryKind<'a> {
    List(&'a ListQuery),
    Filter(&'a FilterQuery),
}

/// Cached entity store decorator.
///
/// - **Reads** (`list`/`filter`): cache-aside with throttling, linear
///   backoff on remote rate limits, and fail-soft degradation.
/// - **Writes** (`create`/`update`/`delete`): a single pass-through
///   attempt (retrying writes risks duplicate side effects), then
///   prefix invalidation of the collection's cached listings.
pub struct CachedStore<S> {
    inner: Arc<S>,
    cache: RequestCache,
    policy: CachePolicy,
}

impl<S: EntityStore> CachedStore<S> {
    /// Creates a new cached store around a backend.
    pub fn new(inner: Arc<S>, cache: RequestCache, policy: CachePolicy) -> Self {
        Self {
            inner,
            cache,
            policy,
        }
    }

    /// Returns the cache instance shared with this store.
    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    async fn fetch(&self, collection: Collection, query: &QueryKind<'_>) -> Result<Vec<Value>> {
        match query {
            QueryKind::List(q) => self.inner.list(collection, q).await,
            QueryKind::Filter(q) => self.inner.filter(collection, q).await,
        }
    }

    /// The orchestrated read path.
    ///
    /// One `retries` counter covers both the local throttle wait and
    /// remote rate-limit backoff: a throttled query with nothing cached
    /// waits out one cooldown before giving up with `RateLimited`,
    /// while a remote 429 backs off `n * base` up to twice. Any other
    /// failure degrades to stale cache, then to an empty result.
    async fn cached_query(
        &self,
        collection: Collection,
        query: QueryKind<'_>,
    ) -> Result<Vec<Value>> {
        let descriptor = match &query {
            QueryKind::List(q) => RequestDescriptor::list(collection, q),
            QueryKind::Filter(q) => RequestDescriptor::filter(collection, q),
        };
        let key = descriptor.cache_key();
        let ttl = self.policy.ttl(collection);
        let cooldown = self.policy.cooldown(collection);

        let mut retries: u32 = 0;

        loop {
            if let Some(records) = self.cache.read(&key, ttl).await {
                tracing::trace!(%collection, "Cache hit");
                return Ok(records);
            }

            if !self.cache.can_attempt(&key, cooldown).await {
                if let Some(records) = self.cache.read_stale(&key).await {
                    tracing::warn!(%collection, "Throttled; serving stale cache");
                    return Ok(records);
                }
                if retries < self.policy.max_throttle_waits {
                    retries += 1;
                    tracing::debug!(
                        %collection,
                        "Throttled with nothing cached; waiting before retry"
                    );
                    tokio::time::sleep(self.policy.retry_base_delay).await;
                    continue;
                }
                return Err(StoreError::RateLimited);
            }

            self.cache.record_attempt(&key).await;
            match self.fetch(collection, &query).await {
                Ok(records) => {
                    tracing::trace!(%collection, count = records.len(), "Cache miss; fetched");
                    self.cache.write(&key, records.clone()).await;
                    return Ok(records);
                }
                Err(err) if err.is_rate_limited() && retries < self.policy.max_rate_limit_retries => {
                    retries += 1;
                    let delay = self.policy.retry_delay(retries);
                    tracing::debug!(%collection, retry = retries, "Remote rate limit; backing off");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    if let Some(records) = self.cache.read_stale(&key).await {
                        tracing::warn!(
                            %collection,
                            error = %err,
                            "Read failed; serving stale cache"
                        );
                        return Ok(records);
                    }
                    tracing::warn!(
                        %collection,
                        error = %err,
                        "Read failed with nothing cached; returning empty result"
                    );
                    return Ok(Vec::new());
                }
            }
        }
    }

    async fn invalidate(&self, collection: Collection) {
        self.cache
            .invalidate_prefix(&collection_prefix(collection))
            .await;
    }
}

#[async_trait]
impl<S: EntityStore + 'static> EntityStore for CachedStore<S> {
    async fn list(&self, collection: Collection, query: &ListQuery) -> Result<Vec<Value>> {
        self.cached_query(collection, QueryKind::List(query)).await
    }

    async fn filter(&self, collection: Collection, query: &FilterQuery) -> Result<Vec<Value>> {
        self.cached_query(collection, QueryKind::Filter(query))
            .await
    }

    async fn create(&self, collection: Collection, fields: Value) -> Result<Value> {
        let record = self.inner.create(collection, fields).await?;
        self.invalidate(collection).await;
        tracing::debug!(%collection, "Record created");
        Ok(record)
    }

    async fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<Value> {
        let record = self.inner.update(collection, id, patch).await?;
        self.invalidate(collection).await;
        tracing::debug!(%collection, id, "Record updated");
        Ok(record)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.inner.delete(collection, id).await?;
        self.invalidate(collection).await;
        tracing::debug!(%collection, id, "Record deleted");
        Ok(())
    }
}
