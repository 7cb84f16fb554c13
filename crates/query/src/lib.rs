//! Authenticated query, mutation, and prefetch layer.
//!
//! Pages declare [`QueryDescriptor`]s; this crate gates them on the
//! session token, injects auth headers, resolves them through the shared
//! [`QueryCache`], recovers from unauthorized responses (cookie cleanup
//! plus a redirect to login), and runs the same pipeline eagerly during
//! server rendering to produce a hydratable snapshot.
//!
//! HTTP execution, cookies, and navigation are consumed behind seams
//! ([`HttpExecute`], [`CookieStore`], [`Navigator`]) so every behavior is
//! testable without a network or a router.
//!
//! [`QueryDescriptor`]: repertoire_core::query::QueryDescriptor
//! [`QueryCache`]: repertoire_cache::QueryCache

pub mod config;
pub mod cookies;
pub mod engine;
pub mod fetch;
pub mod http;
pub mod navigate;
pub mod prefetch;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use cookies::{cookie_from_header, CookieStore, MemoryCookieStore};
pub use engine::{CombinedQueries, QueryEngine};
pub use fetch::AuthenticatedClient;
pub use http::{HttpExecute, PreparedRequest, RawResponse, ReqwestExecutor};
pub use navigate::Navigator;
pub use prefetch::{prefetch_queries, prefetch_query, request_auth_context};
pub use session::SessionGuard;
