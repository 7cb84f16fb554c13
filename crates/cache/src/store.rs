//! The cache store: LRU + TTL storage with single-flight deduplication.
//!
//! Thread-safe via tokio synchronization primitives. At most one fetch per
//! key is authoritative at a time; later callers of the same key await the
//! in-flight outcome over a watch channel instead of issuing a duplicate
//! request.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;
use tokio::sync::{broadcast, watch, Mutex, RwLock};

use repertoire_core::query::{QueryError, QueryKey, QueryState, QueryStatus};

use crate::events::CacheEvent;
use crate::snapshot::{DehydratedQuery, DehydratedState};

/// Channel capacity for cache change notifications.
const CHANNEL_CAPACITY: usize = 100;

/// A resolved cache slot with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(data: Value, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { data, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Generic async query cache.
///
/// Only successful results are stored; errors are handed to every waiter
/// of the in-flight request and then forgotten, so the next call retries.
/// Expiration is checked lazily on access; a refetch overwrites the stale
/// slot in place.
#[derive(Debug, Clone)]
pub struct QueryCache {
    entries: Arc<RwLock<LruCache<QueryKey, CacheEntry>>>,
    pending: Arc<Mutex<HashMap<QueryKey, watch::Receiver<Option<QueryState>>>>>,
    events: broadcast::Sender<CacheEvent>,
    default_ttl: Option<Duration>,
}

impl QueryCache {
    /// Creates a cache bounded to `max_entries` slots.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize, default_ttl: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(max_entries).expect("max_entries must be > 0");
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            entries: Arc::new(RwLock::new(LruCache::new(capacity))),
            pending: Arc::new(Mutex::new(HashMap::new())),
            events,
            default_ttl,
        }
    }

    /// Resolves `key`, executing `fetch` only when the slot holds no fresh
    /// data and no fetch for the same key is already in flight.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetch: F) -> QueryState
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, QueryError>>,
    {
        self.fetch_with_ttl(key, None, fetch).await
    }

    /// Like [`fetch`](Self::fetch) with a per-entry TTL override.
    pub async fn fetch_with_ttl<F, Fut>(
        &self,
        key: QueryKey,
        ttl: Option<Duration>,
        fetch: F,
    ) -> QueryState
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, QueryError>>,
    {
        // Fast path outside the pending lock.
        if let Some(data) = self.get(&key).await {
            tracing::trace!(key = %key, "cache hit");
            return QueryState::Success(data);
        }

        let sender = {
            let mut pending = self.pending.lock().await;

            // Re-check under the lock so two callers cannot both start.
            if let Some(data) = self.get(&key).await {
                return QueryState::Success(data);
            }

            if let Some(receiver) = pending.get(&key) {
                let receiver = receiver.clone();
                drop(pending);
                tracing::trace!(key = %key, "joining in-flight request");
                return self.await_in_flight(&key, receiver).await;
            }

            let (sender, receiver) = watch::channel(None);
            pending.insert(key.clone(), receiver);
            sender
        };

        tracing::trace!(key = %key, "cache miss, fetching");
        self.emit(&key, QueryStatus::Loading);

        let state = match fetch().await {
            Ok(data) => {
                let ttl = ttl.or(self.default_ttl);
                let mut entries = self.entries.write().await;
                entries.put(key.clone(), CacheEntry::new(data.clone(), ttl));
                QueryState::Success(data)
            }
            Err(error) => QueryState::Error(error),
        };

        self.pending.lock().await.remove(&key);
        let _ = sender.send(Some(state.clone()));
        self.emit(&key, state.status());

        state
    }

    /// Resolves `key` eagerly, discarding the outcome. Failures are
    /// swallowed: the slot stays empty and a later fetch retries it.
    pub async fn prefetch<F, Fut>(&self, key: QueryKey, ttl: Option<Duration>, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, QueryError>>,
    {
        if let QueryState::Error(error) = self.fetch_with_ttl(key.clone(), ttl, fetch).await {
            tracing::debug!(key = %key, error = %error, "prefetch failed, leaving slot empty");
        }
    }

    /// Fresh data for `key`, if any.
    pub async fn get(&self, key: &QueryKey) -> Option<Value> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                // Expired slots stay in place and get overwritten by the
                // refetch; eviction keeps the map bounded regardless.
                None
            }
            Some(entry) => Some(entry.data.clone()),
            None => None,
        }
    }

    /// The current state of `key` without triggering a fetch.
    pub async fn peek(&self, key: &QueryKey) -> QueryState {
        if self.pending.lock().await.contains_key(key) {
            return QueryState::Loading;
        }
        match self.get(key).await {
            Some(data) => QueryState::Success(data),
            None => QueryState::Idle,
        }
    }

    /// Drops the slot for `key`; the next fetch re-executes.
    pub async fn invalidate(&self, key: &QueryKey) {
        let removed = {
            let mut entries = self.entries.write().await;
            entries.pop(key).is_some()
        };
        if removed {
            self.emit(key, QueryStatus::Idle);
        }
    }

    /// Subscribes to state changes for every key.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Snapshots every fresh resolved slot for client hydration.
    pub async fn dehydrate(&self) -> DehydratedState {
        let entries = self.entries.read().await;
        let queries = entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, entry)| DehydratedQuery {
                key: key.clone(),
                data: entry.data.clone(),
            })
            .collect();
        DehydratedState { queries }
    }

    /// Adopts a server-produced snapshot. Entries take the default TTL.
    pub async fn hydrate(&self, snapshot: DehydratedState) {
        let mut entries = self.entries.write().await;
        for query in snapshot.queries {
            entries.put(query.key, CacheEntry::new(query.data, self.default_ttl));
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn await_in_flight(
        &self,
        key: &QueryKey,
        mut receiver: watch::Receiver<Option<QueryState>>,
    ) -> QueryState {
        loop {
            if let Some(state) = receiver.borrow_and_update().clone() {
                return state;
            }
            if receiver.changed().await.is_err() {
                // The fetching caller was dropped before resolving. Drop the
                // dead slot so the next caller can start over.
                let mut pending = self.pending.lock().await;
                if pending
                    .get(key)
                    .is_some_and(|rx| rx.same_channel(&receiver))
                {
                    pending.remove(key);
                }
                return QueryState::Error(QueryError::Transport(
                    "in-flight request was abandoned".to_string(),
                ));
            }
        }
    }

    fn emit(&self, key: &QueryKey, status: QueryStatus) {
        // No receivers just means no one is subscribed right now.
        let _ = self.events.send(CacheEvent {
            key: key.clone(),
            status,
        });
    }
}
