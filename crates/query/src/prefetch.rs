//! Server-side prefetch.
//!
//! Runs the same gate, key derivation, and authenticated fetch the client
//! uses - via the shared `repertoire_core` modules, so the two execution
//! contexts cannot drift apart on cache identity - then snapshots the
//! cache for the page payload. Per-descriptor failures are swallowed: a
//! broken dependency leaves its slot empty for the client to retry, and
//! never fails the whole render.

use futures_util::future::join_all;

use repertoire_cache::{DehydratedState, QueryCache};
use repertoire_core::auth::{query_enabled, AuthContext};
use repertoire_core::query::QueryDescriptor;

use crate::config::Config;
use crate::cookies::cookie_from_header;
use crate::fetch::AuthenticatedClient;
use crate::http::HttpExecute;

/// Builds the auth context for a server render from the incoming
/// request's `Cookie` header. There is no client-side cookie store here;
/// the request is the only source of truth.
pub fn request_auth_context(config: &Config, cookie_header: Option<&str>) -> AuthContext {
    let token = cookie_header.and_then(|header| cookie_from_header(header, &config.token_cookie));
    AuthContext::new(token)
}

/// Prefetches every enabled descriptor and returns the hydratable
/// snapshot of the cache.
pub async fn prefetch_queries<H: HttpExecute>(
    client: &AuthenticatedClient<H>,
    cache: &QueryCache,
    cookie_header: Option<&str>,
    descriptors: &[QueryDescriptor],
) -> DehydratedState {
    let auth = request_auth_context(client.config(), cookie_header);

    let runs = descriptors
        .iter()
        .filter(|descriptor| query_enabled(&auth, descriptor.enabled))
        .map(|descriptor| {
            cache.prefetch(descriptor.cache_key(), descriptor.options.ttl, || {
                client.fetch(&auth, &descriptor.request)
            })
        });
    join_all(runs).await;

    cache.dehydrate().await
}

/// Single-descriptor convenience over [`prefetch_queries`].
pub async fn prefetch_query<H: HttpExecute>(
    client: &AuthenticatedClient<H>,
    cache: &QueryCache,
    cookie_header: Option<&str>,
    descriptor: &QueryDescriptor,
) -> DehydratedState {
    prefetch_queries(client, cache, cookie_header, std::slice::from_ref(descriptor)).await
}
