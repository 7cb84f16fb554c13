//! The produced API: gated, cached, guarded query execution.

use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;

use repertoire_cache::QueryCache;
use repertoire_core::auth::{query_enabled, AuthContext};
use repertoire_core::query::{
    aggregate, ApiRequest, QueryDescriptor, QueryError, QueryState, QueryStatus, Result,
};

use crate::cookies::CookieStore;
use crate::fetch::AuthenticatedClient;
use crate::http::HttpExecute;
use crate::navigate::Navigator;
use crate::session::SessionGuard;

/// Combined view over several queries issued together.
///
/// `data` keeps one slot per descriptor, in input order, so consumers can
/// line results up with what they asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedQueries {
    pub data: Vec<Option<Value>>,
    pub status: QueryStatus,
    pub errors: Vec<QueryError>,
}

/// Runs descriptors through the token gate, the shared cache, and the
/// session guard.
pub struct QueryEngine<H, C, N>
where
    H: HttpExecute,
    C: CookieStore,
    N: Navigator,
{
    client: AuthenticatedClient<H>,
    cache: Arc<QueryCache>,
    guard: SessionGuard<C, N>,
}

impl<H, C, N> QueryEngine<H, C, N>
where
    H: HttpExecute,
    C: CookieStore,
    N: Navigator,
{
    pub fn new(
        client: AuthenticatedClient<H>,
        cache: Arc<QueryCache>,
        guard: SessionGuard<C, N>,
    ) -> Self {
        Self {
            client,
            cache,
            guard,
        }
    }

    /// The underlying cache, for hydration and subscriptions.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Resolves one descriptor. Disabled or tokenless descriptors stay
    /// `Idle`; an unauthorized outcome additionally invalidates the
    /// session.
    pub async fn query(&self, auth: &AuthContext, descriptor: &QueryDescriptor) -> QueryState {
        let state = self.run(auth, descriptor).await;
        if let QueryState::Error(error) = &state {
            self.guard.on_error(error).await;
        }
        state
    }

    /// Resolves several descriptors concurrently and combines their
    /// statuses. Any unauthorized member triggers one session
    /// invalidation.
    pub async fn queries(
        &self,
        auth: &AuthContext,
        descriptors: &[QueryDescriptor],
    ) -> CombinedQueries {
        let states = join_all(
            descriptors
                .iter()
                .map(|descriptor| self.run(auth, descriptor)),
        )
        .await;

        let combined = aggregate(&states);
        self.guard.on_errors(&combined.errors).await;

        CombinedQueries {
            data: states.into_iter().map(QueryState::into_data).collect(),
            status: combined.status,
            errors: combined.errors,
        }
    }

    /// Runs a one-shot mutation: same header injection and unauthorized
    /// recovery as queries, no caching, no retry, no deduplication.
    pub async fn mutate(&self, auth: &AuthContext, request: &ApiRequest) -> Result<Value> {
        let outcome = self.client.mutate(auth, request).await;
        if let Err(error) = &outcome {
            self.guard.on_error(error).await;
        }
        outcome
    }

    async fn run(&self, auth: &AuthContext, descriptor: &QueryDescriptor) -> QueryState {
        if !query_enabled(auth, descriptor.enabled) {
            return QueryState::Idle;
        }

        self.cache
            .fetch_with_ttl(descriptor.cache_key(), descriptor.options.ttl, || {
                self.client.fetch(auth, &descriptor.request)
            })
            .await
    }
}
