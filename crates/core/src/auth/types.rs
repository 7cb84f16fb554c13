use serde::{Deserialize, Serialize};

/// The authentication snapshot threaded through every wrapped call.
///
/// Built once per request or render from the cookie store and passed
/// explicitly, so gating and header injection never read ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    token: Option<String>,
}

impl AuthContext {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// A context with no session at all.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The bearer token, if present. Empty strings count as absent.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

/// Claims read out of the bearer token payload.
///
/// Only the fields the gating logic looks at; everything else in the token
/// is opaque to this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}
