//! Shared test doubles for the seams.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use repertoire_core::query::QueryError;

use crate::http::{HttpExecute, PreparedRequest, RawResponse};
use crate::navigate::Navigator;

/// Scripted HTTP executor: responses are consumed in push order.
#[derive(Debug, Default)]
pub(crate) struct MockHttp {
    responses: Mutex<VecDeque<Result<RawResponse, QueryError>>>,
    requests: Mutex<Vec<PreparedRequest>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor that sleeps before responding, to widen the in-flight
    /// window in deduplication tests.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn push_response(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse {
                status,
                body: body.to_string(),
            }));
    }

    pub fn push_transport_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(QueryError::Transport(message.to_string())));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HttpExecute for MockHttp {
    async fn execute(&self, request: PreparedRequest) -> Result<RawResponse, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(RawResponse {
                status: 200,
                body: "null".to_string(),
            })
        })
    }
}

/// Navigator that records pushes and tracks the resulting path.
#[derive(Debug)]
pub(crate) struct RecordingNavigator {
    current: Mutex<String>,
    pushes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            current: Mutex::new(path.to_string()),
            pushes: Mutex::new(Vec::new()),
        }
    }

    pub fn pushes(&self) -> Vec<String> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    async fn push(&self, path: &str) -> anyhow::Result<()> {
        self.pushes.lock().unwrap().push(path.to_string());
        *self.current.lock().unwrap() = path.to_string();
        Ok(())
    }
}
