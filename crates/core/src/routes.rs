//! Pure routing policy for unauthorized recovery.
//!
//! The session guard consults this to decide whether an invalidated
//! session may redirect from the current path. Kept free of any router
//! dependency so the decision is testable in isolation.

/// The paths that shape unauthorized recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Where an invalidated session is sent.
    pub login_path: String,
    /// The catch-all route that negotiates legacy paths. It carries its own
    /// unauthorized handling and must not be pre-empted.
    pub fallback_path: String,
}

impl RoutePolicy {
    pub fn new(login_path: impl Into<String>, fallback_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            fallback_path: fallback_path.into(),
        }
    }

    /// Whether an unauthorized response observed on `current_path` must not
    /// trigger a redirect. True on the login route itself (avoids a
    /// redirect loop) and on the catch-all fallback.
    pub fn suppresses_redirect(&self, current_path: &str) -> bool {
        current_path.starts_with(&self.login_path) || current_path == self.fallback_path
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new("/login", "/legacy")
    }
}
