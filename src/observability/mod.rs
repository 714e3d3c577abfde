//! Observability for the Adzuna MCP server
//!
//! Structured logging only. Stdout is reserved for protocol traffic, so every
//! log line goes to stderr.

pub mod logging;

pub use logging::{init_default_logging, init_logging, init_logging_from_env, LogFormat};

// Span macros for structured logging
pub use logging::{request_span, tool_span};
