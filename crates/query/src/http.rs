//! The HTTP execution seam.
//!
//! Wrappers consume only a status code and the raw body text; everything
//! transport-level stays behind [`HttpExecute`]. Production uses the
//! reqwest-backed executor, tests use scripted implementations.

use async_trait::async_trait;
use serde_json::Value;

use repertoire_core::query::{Method, QueryError};

/// A fully prepared request: URL, injected headers, optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl PreparedRequest {
    /// The first value of a header, by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The wire-level response surface this layer consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Executes a prepared request.
///
/// Implementations return the raw response whatever its status; only
/// transport-level failures (connection refused, DNS, aborted body reads)
/// are errors. Status classification belongs to the wrappers.
#[async_trait]
pub trait HttpExecute: Send + Sync {
    async fn execute(&self, request: PreparedRequest) -> Result<RawResponse, QueryError>;
}

/// reqwest-backed executor.
#[derive(Debug, Clone, Default)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpExecute for ReqwestExecutor {
    async fn execute(&self, request: PreparedRequest) -> Result<RawResponse, QueryError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| QueryError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| QueryError::Transport(err.to_string()))?;

        Ok(RawResponse { status, body })
    }
}
