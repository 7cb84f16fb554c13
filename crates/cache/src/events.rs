use repertoire_core::query::{QueryKey, QueryStatus};

/// A state change for one cache slot, broadcast to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEvent {
    pub key: QueryKey,
    pub status: QueryStatus,
}
