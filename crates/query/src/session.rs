//! Unauthorized session recovery.
//!
//! The decision ("this path may redirect") is the pure
//! [`RoutePolicy::suppresses_redirect`]; this module owns the effect:
//! clear the session cookies, then navigate to login. No invalidated flag
//! is stored anywhere - every call re-reads the current path, so redundant
//! invocations while already on the login route are no-ops.

use std::sync::Arc;

use repertoire_core::query::QueryError;
use repertoire_core::routes::RoutePolicy;

use crate::config::Config;
use crate::cookies::CookieStore;
use crate::navigate::Navigator;

/// Observes query and mutation outcomes and recovers invalidated sessions.
pub struct SessionGuard<C, N>
where
    C: CookieStore,
    N: Navigator,
{
    cookies: Arc<C>,
    navigator: Arc<N>,
    routes: RoutePolicy,
    token_cookie: String,
    user_cookie: String,
}

impl<C, N> SessionGuard<C, N>
where
    C: CookieStore,
    N: Navigator,
{
    pub fn new(cookies: Arc<C>, navigator: Arc<N>, config: &Config) -> Self {
        Self {
            cookies,
            navigator,
            routes: config.route_policy(),
            token_cookie: config.token_cookie.clone(),
            user_cookie: config.user_cookie.clone(),
        }
    }

    /// Invalidates the session after an unauthorized outcome; any other
    /// error passes through untouched.
    pub async fn on_error(&self, error: &QueryError) {
        if error.is_unauthorized() {
            self.invalidate_session().await;
        }
    }

    /// Parallel-query variant: any one unauthorized result triggers the
    /// same single transition.
    pub async fn on_errors<'a>(&self, errors: impl IntoIterator<Item = &'a QueryError>) {
        if errors.into_iter().any(QueryError::is_unauthorized) {
            self.invalidate_session().await;
        }
    }

    /// Clears the session cookies and redirects to login, unless the
    /// current path handles its own unauthorized recovery.
    pub async fn invalidate_session(&self) {
        let current = self.navigator.current_path();
        if self.routes.suppresses_redirect(&current) {
            tracing::debug!(path = %current, "unauthorized response on a self-recovering route, leaving it alone");
            return;
        }

        self.cookies.remove(&self.token_cookie);
        self.cookies.remove(&self.user_cookie);

        if let Err(error) = self.navigator.push(&self.routes.login_path).await {
            tracing::warn!(error = %error, "navigation to login failed after session invalidation");
        }
    }
}
