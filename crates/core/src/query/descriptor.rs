use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::keys::{derive_key, Arguments, BaseKey, QueryKey};

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A declarative API call: what to request, not how to execute it.
///
/// Auth headers are injected at execution time by the authenticated
/// wrapper, so a request value carries no credential state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured API base URL, e.g. `/events`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

/// Per-query options passed through to the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Overrides the cache's default TTL for this query.
    pub ttl: Option<Duration>,
}

/// The declaration of one query: identity, call, and gating.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    pub base_key: BaseKey,
    pub arguments: Option<Arguments>,
    pub request: ApiRequest,
    /// Caller-side gate, folded with token presence before execution.
    pub enabled: bool,
    pub options: QueryOptions,
}

impl QueryDescriptor {
    pub fn new(base_key: impl Into<BaseKey>, request: ApiRequest) -> Self {
        Self {
            base_key: base_key.into(),
            arguments: None,
            request,
            enabled: true,
            options: QueryOptions::default(),
        }
    }

    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = Some(arguments);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.options.ttl = Some(ttl);
        self
    }

    /// The cache key this descriptor resolves to, on the server and on the
    /// client alike.
    pub fn cache_key(&self) -> QueryKey {
        derive_key(&self.base_key, self.arguments.as_ref())
    }
}
