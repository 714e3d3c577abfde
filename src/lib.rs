//! Adzuna MCP server
//!
//! Exposes the Adzuna job search REST API to AI assistants as seven Model
//! Context Protocol tools: job search, category listing, salary histogram,
//! top employers, regional breakdown, salary history and API version.
//!
//! # Overview
//!
//! - [`api`]: the Adzuna adapter. Builds requests, attaches credentials,
//!   classifies failures and reshapes responses.
//! - [`tools`]: the tool registry with JSON Schema argument validation.
//! - [`server`] and [`transport`]: JSON-RPC dispatch over stdio.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use adzuna_mcp::api::query::SearchFilter;
//! use adzuna_mcp::api::AdzunaClient;
//! use adzuna_mcp::config::{ClientSettings, Credentials};
//!
//! # async fn example() -> Result<(), adzuna_mcp::AdzunaError> {
//! let client = AdzunaClient::new(
//!     ClientSettings::default(),
//!     Some(Credentials::new("my-app-id", "my-app-key")),
//! )?;
//!
//! let filter = SearchFilter {
//!     keywords: Some("python developer".to_string()),
//!     location: Some("London".to_string()),
//!     ..Default::default()
//! };
//! let results = client.search_jobs("gb", &filter).await?;
//! println!("{} matching jobs", results.count);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod country;
pub mod error;
pub mod observability;
pub mod protocol;
pub mod server;
pub mod testing;
pub mod tools;
pub mod transport;

pub use api::AdzunaClient;
pub use config::{ClientSettings, ConfigError, Credentials, ServerConfig};
pub use country::Country;
pub use error::{AdzunaError, AdzunaResult, ErrorKind};
pub use server::McpServer;
pub use tools::{Tool, ToolDescription, ToolError, ToolRegistry};
