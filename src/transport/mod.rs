//! Transport layer for MCP traffic
//!
//! The server speaks newline-delimited JSON-RPC over a pair of byte streams.
//! [`stdio::serve`] works over any async reader and writer; the binary binds it
//! to stdin and stdout.

use thiserror::Error;

pub mod stdio;

pub use stdio::{serve, serve_stdio};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Writer task failed: {0}")]
    Writer(String),
}
