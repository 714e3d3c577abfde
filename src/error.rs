//! Error types for the Adzuna API adapter
//!
//! Every failure an adapter call can produce falls into one of three kinds:
//! configuration (bad credentials or inputs, never worth retrying), upstream
//! (Adzuna answered but not with what we expected) and transport (the request
//! never completed). Callers get a readable message for each.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Main error type for adapter operations
#[derive(Debug, Error)]
pub enum AdzunaError {
    #[error("Missing Adzuna API credentials. Set {app_id_env} and {app_key_env} in the environment or .env file")]
    MissingCredentials {
        app_id_env: String,
        app_key_env: String,
    },

    #[error("Unsupported country code '{code}'. Supported codes: {supported}")]
    UnsupportedCountry { code: String, supported: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("API Error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected response from Adzuna API: {message}")]
    MalformedResponse { message: String },

    #[error("Request to Adzuna API timed out after {}s", timeout.as_secs())]
    Timeout { timeout: Duration },

    #[error("Could not connect to Adzuna API: {message}")]
    Connection { message: String },

    #[error("Request to Adzuna API failed: {message}")]
    Request { message: String },
}

/// Coarse classification used to tell the calling agent how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credentials or invalid input; fix the call, do not retry
    Configuration,
    /// Non-success status or unparseable body from Adzuna
    Upstream,
    /// Timeout or connection failure; the caller may retry
    Transport,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Upstream => "upstream error",
            ErrorKind::Transport => "transport error",
        };
        f.write_str(label)
    }
}

impl AdzunaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdzunaError::MissingCredentials { .. }
            | AdzunaError::UnsupportedCountry { .. }
            | AdzunaError::InvalidParameter { .. } => ErrorKind::Configuration,
            AdzunaError::Upstream { .. } | AdzunaError::MalformedResponse { .. } => {
                ErrorKind::Upstream
            }
            AdzunaError::Timeout { .. }
            | AdzunaError::Connection { .. }
            | AdzunaError::Request { .. } => ErrorKind::Transport,
        }
    }

    /// Upstream HTTP status, when Adzuna answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            AdzunaError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the caller might reasonably retry the same call
    pub fn is_transient(&self) -> bool {
        match self {
            AdzunaError::Upstream { status, .. } => *status == 429 || *status >= 500,
            other => other.kind() == ErrorKind::Transport,
        }
    }

    /// Create invalid parameter error
    pub fn invalid_parameter<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create malformed response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Build the upstream error for a non-success response.
    ///
    /// Adzuna error bodies carry a human readable `display` field; fall back to
    /// the raw body, then to a generic message.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("display")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
            })
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| "Unknown error".to_string());

        Self::Upstream {
            status,
            message: sanitize_error_message(&message),
        }
    }
}

/// Result type for adapter operations
pub type AdzunaResult<T> = Result<T, AdzunaError>;

static CREDENTIAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(app_id|app_key|password|token|secret)([=:]\s*)[^&\s"')]+"#)
        .expect("credential pattern is valid")
});

const MAX_MESSAGE_LEN: usize = 500;
const TRUNCATE_SUFFIX: &str = "...[truncated]";

/// Redact credentials and bound the length of a message before it leaves the process
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = CREDENTIAL_PATTERN
        .replace_all(message, "${1}${2}***")
        .to_string();

    if sanitized.len() > MAX_MESSAGE_LEN {
        let mut cut = MAX_MESSAGE_LEN - TRUNCATE_SUFFIX.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str(TRUNCATE_SUFFIX);
    }

    sanitized
}
