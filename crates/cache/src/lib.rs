//! Generic async query cache.
//!
//! Stores query results under structural [`QueryKey`]s with LRU eviction
//! and per-entry TTL, deduplicates concurrent fetches of the same key into
//! a single in-flight request, notifies subscribers of state changes, and
//! produces serializable snapshots for server-side prefetch hydration.
//!
//! The cache knows nothing about authentication or HTTP; the authenticated
//! layer in `repertoire_query` decorates it.
//!
//! [`QueryKey`]: repertoire_core::query::QueryKey

mod events;
mod snapshot;
mod store;

pub use events::CacheEvent;
pub use snapshot::{DehydratedQuery, DehydratedState};
pub use store::QueryCache;
