//! Wire types for the Model Context Protocol
//!
//! MCP rides on JSON-RPC 2.0. This module defines the envelope types and the
//! handful of MCP payloads a tools-only server needs.

pub mod messages;

pub use messages::*;
