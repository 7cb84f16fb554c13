//! The authenticated fetch and mutation wrappers.
//!
//! Auth headers are built from the passed [`AuthContext`] at every
//! invocation, never captured at registration, so a call always reflects
//! the current token. Response classification turns 401/403 into the
//! unauthorized signal and keeps the server's own message on every other
//! failure.

use std::sync::Arc;

use serde_json::Value;

use repertoire_core::auth::AuthContext;
use repertoire_core::query::{ApiRequest, QueryError, Result};

use crate::config::Config;
use crate::http::{HttpExecute, PreparedRequest, RawResponse};

/// Executes declarative [`ApiRequest`]s with auth headers injected.
pub struct AuthenticatedClient<H: HttpExecute> {
    http: Arc<H>,
    config: Arc<Config>,
}

impl<H: HttpExecute> Clone for AuthenticatedClient<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: HttpExecute> AuthenticatedClient<H> {
    pub fn new(http: Arc<H>, config: Arc<Config>) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Executes a query request; the successful body is parsed as JSON.
    pub async fn fetch(&self, auth: &AuthContext, request: &ApiRequest) -> Result<Value> {
        let response = self.http.execute(self.prepare(auth, request)).await?;
        classify_query_response(response)
    }

    /// Executes a state-changing request. A successful response with an
    /// empty body resolves to the empty-string sentinel, never an error.
    pub async fn mutate(&self, auth: &AuthContext, request: &ApiRequest) -> Result<Value> {
        let response = self.http.execute(self.prepare(auth, request)).await?;
        classify_mutation_response(response)
    }

    fn prepare(&self, auth: &AuthContext, request: &ApiRequest) -> PreparedRequest {
        let mut headers = vec![("x-api-key".to_string(), self.config.api_key.clone())];
        if let Some(token) = auth.token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        PreparedRequest {
            method: request.method,
            url: format!("{}{}", self.config.api_base_url, request.path),
            headers,
            body: request.body.clone(),
        }
    }
}

fn classify_query_response(response: RawResponse) -> Result<Value> {
    check_status(&response)?;
    let body = response.body.trim();
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|err| QueryError::Body(err.to_string()))
}

fn classify_mutation_response(response: RawResponse) -> Result<Value> {
    check_status(&response)?;
    let body = response.body.trim();
    if body.is_empty() {
        // "Nothing to parse" is a caller-visible outcome, distinct from a
        // parse error.
        return Ok(Value::String(String::new()));
    }
    serde_json::from_str(body).map_err(|err| QueryError::Body(err.to_string()))
}

fn check_status(response: &RawResponse) -> Result<()> {
    match response.status {
        200..=299 => Ok(()),
        401 | 403 => Err(QueryError::Unauthorized {
            status: response.status,
        }),
        status => Err(QueryError::Server {
            status,
            title: server_title(&response.body),
        }),
    }
}

/// The server's own message for a failed request: the problem-details
/// `title` field when the body is JSON, the raw body otherwise.
fn server_title(body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(title)) = fields.get("title") {
            return title.clone();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::testing::MockHttp;
    use repertoire_core::query::Method;
    use serde_json::json;

    fn client(http: Arc<MockHttp>) -> AuthenticatedClient<MockHttp> {
        AuthenticatedClient::new(http, Arc::new(test_config()))
    }

    fn auth() -> AuthContext {
        AuthContext::new(Some("tok-1".to_string()))
    }

    #[tokio::test]
    async fn injects_bearer_token_and_api_key() {
        let http = Arc::new(MockHttp::new());
        http.push_response(200, r#"{"events": []}"#);

        client(Arc::clone(&http))
            .fetch(&auth(), &ApiRequest::get("/events"))
            .await
            .unwrap();

        let request = http.last_request().unwrap();
        assert_eq!(request.url, "http://api.test/events");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.header("authorization"), Some("Bearer tok-1"));
        assert_eq!(request.header("x-api-key"), Some("key-123"));
    }

    #[tokio::test]
    async fn anonymous_calls_omit_the_bearer_header() {
        let http = Arc::new(MockHttp::new());
        http.push_response(200, "null");

        client(Arc::clone(&http))
            .fetch(&AuthContext::anonymous(), &ApiRequest::get("/events"))
            .await
            .unwrap();

        let request = http.last_request().unwrap();
        assert_eq!(request.header("authorization"), None);
        assert_eq!(request.header("x-api-key"), Some("key-123"));
    }

    #[tokio::test]
    async fn headers_reflect_the_token_at_call_time() {
        let http = Arc::new(MockHttp::new());
        http.push_response(200, "null");
        http.push_response(200, "null");
        let client = client(Arc::clone(&http));

        client
            .fetch(
                &AuthContext::new(Some("first".to_string())),
                &ApiRequest::get("/events"),
            )
            .await
            .unwrap();
        client
            .fetch(
                &AuthContext::new(Some("second".to_string())),
                &ApiRequest::get("/events"),
            )
            .await
            .unwrap();

        let request = http.last_request().unwrap();
        assert_eq!(request.header("authorization"), Some("Bearer second"));
    }

    #[tokio::test]
    async fn unauthorized_statuses_raise_the_signal() {
        for status in [401, 403] {
            let http = Arc::new(MockHttp::new());
            http.push_response(status, "");

            let outcome = client(Arc::clone(&http))
                .fetch(&auth(), &ApiRequest::get("/events"))
                .await;

            assert_eq!(outcome, Err(QueryError::Unauthorized { status }));
        }
    }

    #[tokio::test]
    async fn server_failures_carry_the_problem_title() {
        let http = Arc::new(MockHttp::new());
        http.push_response(404, r#"{"title": "Venue not found", "status": 404}"#);

        let outcome = client(Arc::clone(&http))
            .fetch(&auth(), &ApiRequest::get("/venues/9"))
            .await;

        assert_eq!(
            outcome,
            Err(QueryError::Server {
                status: 404,
                title: "Venue not found".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn server_failures_fall_back_to_the_raw_body() {
        let http = Arc::new(MockHttp::new());
        http.push_response(500, "database exploded");

        let outcome = client(Arc::clone(&http))
            .fetch(&auth(), &ApiRequest::get("/events"))
            .await;

        assert_eq!(
            outcome,
            Err(QueryError::Server {
                status: 500,
                title: "database exploded".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let http = Arc::new(MockHttp::new());
        http.push_transport_error("connection refused");

        let outcome = client(Arc::clone(&http))
            .fetch(&auth(), &ApiRequest::get("/events"))
            .await;

        assert_eq!(
            outcome,
            Err(QueryError::Transport("connection refused".to_string()))
        );
    }

    #[tokio::test]
    async fn successful_query_body_is_parsed() {
        let http = Arc::new(MockHttp::new());
        http.push_response(200, r#"{"events": [{"id": 1}]}"#);

        let data = client(Arc::clone(&http))
            .fetch(&auth(), &ApiRequest::get("/events"))
            .await
            .unwrap();

        assert_eq!(data, json!({"events": [{"id": 1}]}));
    }

    #[tokio::test]
    async fn malformed_query_body_is_a_body_error() {
        let http = Arc::new(MockHttp::new());
        http.push_response(200, "<html>hello</html>");

        let outcome = client(Arc::clone(&http))
            .fetch(&auth(), &ApiRequest::get("/events"))
            .await;

        assert!(matches!(outcome, Err(QueryError::Body(_))));
    }

    #[tokio::test]
    async fn empty_mutation_body_resolves_to_the_sentinel() {
        let http = Arc::new(MockHttp::new());
        http.push_response(204, "");

        let outcome = client(Arc::clone(&http))
            .mutate(&auth(), &ApiRequest::delete("/events/3"))
            .await
            .unwrap();

        assert_eq!(outcome, json!(""));
    }

    #[tokio::test]
    async fn non_empty_mutation_body_is_parsed() {
        let http = Arc::new(MockHttp::new());
        http.push_response(201, r#"{"id": 12}"#);

        let outcome = client(Arc::clone(&http))
            .mutate(&auth(), &ApiRequest::post("/events", json!({"name": "Fête"})))
            .await
            .unwrap();

        assert_eq!(outcome, json!({"id": 12}));
    }

    #[tokio::test]
    async fn mutation_unauthorized_is_signaled_not_swallowed() {
        let http = Arc::new(MockHttp::new());
        http.push_response(403, "");

        let outcome = client(Arc::clone(&http))
            .mutate(&auth(), &ApiRequest::post("/events", json!({})))
            .await;

        assert_eq!(outcome, Err(QueryError::Unauthorized { status: 403 }));
    }
}
