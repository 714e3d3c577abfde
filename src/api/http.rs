//! HTTP transport for the Adzuna API
//!
//! The adapter talks to Adzuna through the [`HttpTransport`] trait so tests can
//! swap in a stub. The production implementation wraps a single shared
//! `reqwest::Client`, which pools connections across concurrent tool calls.

use crate::error::{sanitize_error_message, AdzunaError, AdzunaResult};
use async_trait::async_trait;
use std::time::Duration;

/// Query string parameters in the order they are sent
pub type QueryParams = Vec<(String, String)>;

/// Raw upstream answer, before status handling and parsing
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new<S: Into<String>>(status: u16, body: S) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over outbound HTTP GET requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request to `url` with the given query parameters.
    ///
    /// Non-success statuses are returned as responses, not errors; only
    /// failures to complete the exchange are errors.
    async fn get(&self, url: &str, params: &[(String, String)]) -> AdzunaResult<UpstreamResponse>;
}

/// Production transport backed by reqwest
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Build a transport whose requests are bounded by `timeout`
    pub fn new(timeout: Duration) -> AdzunaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("adzuna-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdzunaError::Request {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, timeout })
    }

    /// Map a reqwest failure onto the transport error taxonomy (pure function)
    fn classify_error(error: reqwest::Error, timeout: Duration) -> AdzunaError {
        if error.is_timeout() {
            return AdzunaError::Timeout { timeout };
        }

        let is_connect = error.is_connect();
        // The URL carries credentials in its query string
        let message = sanitize_error_message(&describe_error_chain(&error.without_url()));

        if is_connect {
            AdzunaError::Connection { message }
        } else {
            AdzunaError::Request { message }
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, params: &[(String, String)]) -> AdzunaResult<UpstreamResponse> {
        let response = self
            .client
            .get(url)
            .query(params)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Self::classify_error(e, self.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::classify_error(e, self.timeout))?;

        Ok(UpstreamResponse { status, body })
    }
}

/// Join an error with its sources so DNS and connection causes are visible
fn describe_error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
