use std::{env, time::Duration};

use repertoire_core::routes::RoutePolicy;

/// Layer configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL the API paths are resolved against.
    pub api_base_url: String,
    /// Static API key sent with every request.
    pub api_key: String,
    /// Cookie holding the session token (default: "token").
    pub token_cookie: String,
    /// Cookie holding the cached user record (default: "user").
    pub user_cookie: String,
    /// Where invalidated sessions are redirected (default: "/login").
    pub login_path: String,
    /// Catch-all route with its own unauthorized handling (default: "/legacy").
    pub fallback_path: String,
    /// Cache TTL in seconds (default: 300).
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000).
    pub cache_max_entries: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `API_BASE_URL` - API base URL (default: "http://localhost:3000")
    /// - `API_KEY` - static API key (default: empty)
    /// - `TOKEN_COOKIE` - session token cookie name (default: "token")
    /// - `USER_COOKIE` - user record cookie name (default: "user")
    /// - `LOGIN_PATH` - login route (default: "/login")
    /// - `FALLBACK_PATH` - legacy catch-all route (default: "/legacy")
    /// - `CACHE_TTL_SECONDS` - cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - maximum cache entries (default: 10,000)
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            api_key: env::var("API_KEY").unwrap_or_default(),
            token_cookie: env::var("TOKEN_COOKIE").unwrap_or_else(|_| "token".to_string()),
            user_cookie: env::var("USER_COOKIE").unwrap_or_else(|_| "user".to_string()),
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()),
            fallback_path: env::var("FALLBACK_PATH").unwrap_or_else(|_| "/legacy".to_string()),
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// The redirect policy derived from the configured routes.
    pub fn route_policy(&self) -> RoutePolicy {
        RoutePolicy::new(&self.login_path, &self.fallback_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        api_base_url: "http://api.test".to_string(),
        api_key: "key-123".to_string(),
        token_cookie: "token".to_string(),
        user_cookie: "user".to_string(),
        login_path: "/login".to_string(),
        fallback_path: "/legacy".to_string(),
        cache_ttl_seconds: 300,
        cache_max_entries: 64,
    }
}
