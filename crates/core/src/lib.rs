//! Pure building blocks for the repertoire data layer.
//!
//! Everything in this crate is synchronous and side-effect free: cache key
//! derivation, auth token gating, query state aggregation, and the route
//! policy that decides when an unauthorized response may redirect. The
//! async machinery that uses these lives in `repertoire_cache` and
//! `repertoire_query`.

pub mod auth;
pub mod query;
pub mod routes;
