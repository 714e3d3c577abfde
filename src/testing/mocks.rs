//! Mock implementations for testing
//!
//! [`MockHttpTransport`] stands in for the reqwest transport. It serves a
//! canned answer, counts calls and records every request so tests can assert
//! on the URL and query that would have gone to Adzuna.

use crate::api::http::{HttpTransport, UpstreamResponse};
use crate::error::{AdzunaError, AdzunaResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A request the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    /// First value sent for a query parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

type ErrorFactory = Box<dyn Fn() -> AdzunaError + Send + Sync>;

enum Behavior {
    Respond(UpstreamResponse),
    Fail(ErrorFactory),
}

/// Mock HTTP transport for testing
pub struct MockHttpTransport {
    behavior: Behavior,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpTransport {
    /// Answer every request with `response`
    pub fn new(response: UpstreamResponse) -> Self {
        Self::with_behavior(Behavior::Respond(response))
    }

    /// Answer every request with `status` and a JSON body
    pub fn with_json(status: u16, body: Value) -> Self {
        Self::new(UpstreamResponse::new(status, body.to_string()))
    }

    /// Fail every request with the error produced by `factory`
    pub fn failing<F>(factory: F) -> Self
    where
        F: Fn() -> AdzunaError + Send + Sync + 'static,
    {
        Self::with_behavior(Behavior::Fail(Box::new(factory)))
    }

    /// Hold each request for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().await.last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn get(&self, url: &str, params: &[(String, String)]) -> AdzunaResult<UpstreamResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(RecordedRequest {
            url: url.to_string(),
            params: params.to_vec(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Respond(response) => Ok(response.clone()),
            Behavior::Fail(factory) => Err(factory()),
        }
    }
}
