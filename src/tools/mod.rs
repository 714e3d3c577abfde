//! Tool system for the Adzuna MCP server
//!
//! Every capability exposed to the assistant implements [`Tool`]. The
//! [`ToolRegistry`] is built once at startup, compiles each tool's parameter
//! schema, and validates arguments against it before a tool runs.

use crate::api::AdzunaClient;
use crate::error::AdzunaError;
use crate::tool_span;
use async_trait::async_trait;
use jsonschema::Validator;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn, Instrument};

pub mod jobs;

/// Tool interface
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, guidance text and JSON Schema for the tool's arguments
    fn describe(&self) -> ToolDescription;

    /// Run the tool. Parameters have already been validated against the
    /// schema from `describe()`.
    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError>;
}

#[derive(Debug, Clone)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

struct RegisteredTool {
    description: ToolDescription,
    validator: Validator,
    tool: Box<dyn Tool>,
}

/// Fixed set of tools, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding all seven Adzuna tools over a shared client
    pub fn adzuna(client: Arc<AdzunaClient>) -> Result<Self, ToolError> {
        let mut registry = Self::new();
        registry.register(Box::new(jobs::SearchJobsTool::new(client.clone())))?;
        registry.register(Box::new(jobs::CategoriesTool::new(client.clone())))?;
        registry.register(Box::new(jobs::SalaryHistogramTool::new(client.clone())))?;
        registry.register(Box::new(jobs::TopCompaniesTool::new(client.clone())))?;
        registry.register(Box::new(jobs::GeodataTool::new(client.clone())))?;
        registry.register(Box::new(jobs::SalaryHistoryTool::new(client.clone())))?;
        registry.register(Box::new(jobs::ApiVersionTool::new(client)))?;
        Ok(registry)
    }

    /// Add a tool, compiling its schema once
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), ToolError> {
        let description = tool.describe();
        if self.find(&description.name).is_some() {
            return Err(ToolError::DuplicateTool(description.name));
        }

        let validator = jsonschema::validator_for(&description.parameters).map_err(|e| {
            ToolError::SchemaError(format!(
                "Schema compilation error for {}: {e}",
                description.name
            ))
        })?;

        debug!(tool = %description.name, "Registered tool");
        self.tools.push(RegisteredTool {
            description,
            validator,
            tool,
        });
        Ok(())
    }

    fn find(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.description.name == name)
    }

    pub fn describe_tool(&self, name: &str) -> Option<&ToolDescription> {
        self.find(name).map(|t| &t.description)
    }

    pub fn descriptions(&self) -> impl Iterator<Item = &ToolDescription> {
        self.tools.iter().map(|t| &t.description)
    }

    pub fn list_tools(&self) -> Vec<String> {
        self.descriptions().map(|d| d.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate the arguments, then run the named tool
    pub async fn execute_tool(&self, name: &str, parameters: &Value) -> Result<Value, ToolError> {
        let registered = self
            .find(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        Self::validate_parameters(&registered.validator, parameters)?;

        let span = tool_span!(tool = %name);
        let result = registered.tool.execute(parameters).instrument(span).await;
        if let Err(e) = &result {
            warn!(tool = %name, error = %e, "Tool call failed");
        }
        result
    }

    fn validate_parameters(validator: &Validator, parameters: &Value) -> Result<(), ToolError> {
        validator.validate(parameters).map_err(|errors| {
            let error_messages: Vec<String> = errors
                .map(|e| format!("At '{}': {}", e.instance_path, e))
                .collect();
            ToolError::ValidationError(error_messages.join("; "))
        })
    }
}

/// Tool system errors
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
    #[error("Parameter validation failed: {0}")]
    ValidationError(String),
    #[error("Schema error: {0}")]
    SchemaError(String),
    #[error("Tool execution failed: {0}")]
    ExecutionError(String),
    #[error("{tool} failed ({}): {source}", .source.kind())]
    Api {
        tool: &'static str,
        #[source]
        source: AdzunaError,
    },
}

impl ToolError {
    /// True when the caller sent arguments the tool cannot accept
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, ToolError::UnknownTool(_) | ToolError::ValidationError(_))
    }
}
