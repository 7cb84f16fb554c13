//! Cookie access seams.
//!
//! The client side reads and clears cookies through [`CookieStore`]; the
//! server prefetch path reads the token straight out of the incoming
//! request's `Cookie` header.

use std::collections::HashMap;
use std::sync::RwLock;

use cookie::Cookie;

/// Read/write access to the session cookies.
///
/// The one piece of mutable shared state outside the cache. Read at the
/// start of every wrapped call, written only by the session guard (clear)
/// and the out-of-scope login flow.
pub trait CookieStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str);
    fn remove(&self, name: &str);
}

/// In-memory cookie store for tests and non-browser embeddings.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .read()
            .expect("cookie store lock poisoned")
            .get(name)
            .cloned()
    }

    fn set(&self, name: &str, value: &str) {
        self.values
            .write()
            .expect("cookie store lock poisoned")
            .insert(name.to_string(), value.to_string());
    }

    fn remove(&self, name: &str) {
        self.values
            .write()
            .expect("cookie store lock poisoned")
            .remove(name);
    }
}

/// Extracts a named cookie value from a request `Cookie` header.
///
/// Empty values count as absent, matching the token-presence rule.
pub fn cookie_from_header(header: &str, name: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
