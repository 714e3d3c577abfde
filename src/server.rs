//! MCP request dispatch
//!
//! [`McpServer`] turns one JSON-RPC message into at most one response. It
//! holds no per-session state, so the transport may run any number of
//! messages through it at once.

use crate::country::Country;
use crate::protocol::{
    negotiate_protocol_version, CallToolParams, CallToolResult, Implementation, InitializeParams,
    InitializeResult, JsonRpcRequest, JsonRpcResponse, ListToolsResult, ProtocolError,
    ServerCapabilities, ToolInfo, JSONRPC_VERSION,
};
use crate::request_span;
use crate::tools::ToolRegistry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

/// Guidance handed to the client at initialization
pub fn server_instructions() -> String {
    let countries: Vec<String> = Country::ALL
        .iter()
        .map(|c| {
            format!(
                "- {}: {} ({} {})",
                c.code(),
                c.name(),
                c.currency(),
                c.currency_symbol()
            )
        })
        .collect();

    format!(
        "Adzuna Jobs API - Search jobs and access labour market data across {} countries.

IMPORTANT NOTES:
- All salary figures are ANNUAL amounts in LOCAL CURRENCY (GBP for UK, USD for US, EUR for Germany/France, etc.)
- Country codes use ISO 3166-1 alpha-2 standard (e.g., \"gb\", \"us\", \"de\")

SUPPORTED COUNTRIES:
{}

RECOMMENDED WORKFLOWS:
1. Job Search: get_categories -> search_jobs (get valid category tags first)
2. Salary Research: get_salary_histogram + get_geodata + get_salary_history
3. Company Research: get_top_companies",
        Country::ALL.len(),
        countries.join("\n")
    )
}

pub struct McpServer {
    registry: Arc<ToolRegistry>,
    info: Implementation,
    instructions: String,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>, name: impl Into<String>) -> Self {
        Self {
            registry,
            info: Implementation {
                name: name.into(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: server_instructions(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one raw line from the client
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable JSON-RPC message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    ProtocolError::Parse(e.to_string()).into(),
                ));
            }
        };

        // Keep whatever id we can read so invalid requests are still addressable
        let raw_id = value.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    raw_id.unwrap_or(Value::Null),
                    ProtocolError::InvalidRequest(e.to_string()).into(),
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a decoded request; notifications never produce a response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            if request.is_notification() {
                debug!(
                    version = %request.jsonrpc,
                    "Dropping notification with unsupported jsonrpc version"
                );
                return None;
            }
            return Some(JsonRpcResponse::failure(
                request.id.unwrap_or(Value::Null),
                ProtocolError::InvalidRequest(format!(
                    "unsupported jsonrpc version '{}'",
                    request.jsonrpc
                ))
                .into(),
            ));
        }

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        let span = request_span!(method = %request.method, id = %id);
        let result = self
            .dispatch(&request.method, request.params)
            .instrument(span)
            .await;
        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                debug!(error = %e, "Request failed");
                JsonRpcResponse::failure(id, e.into())
            }
        })
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => info!("Client initialized"),
            "notifications/cancelled" => debug!("Client cancelled a request"),
            other => debug!(method = %other, "Ignoring notification"),
        }
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, ProtocolError> {
        match method {
            "initialize" => to_result(self.initialize(parse_params(params)?)),
            "ping" => Ok(json!({})),
            "tools/list" => to_result(self.list_tools()),
            "tools/call" => {
                let params: CallToolParams = parse_required_params(params)?;
                to_result(self.call_tool(params).await?)
            }
            other => Err(ProtocolError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize(&self, params: InitializeParams) -> InitializeResult {
        let protocol_version = negotiate_protocol_version(params.protocol_version.as_deref());
        if let Some(client) = &params.client_info {
            info!(
                client = %client.name,
                client_version = %client.version,
                protocol_version,
                "Initializing session"
            );
        }

        InitializeResult {
            protocol_version: protocol_version.to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: self.info.clone(),
            instructions: Some(self.instructions.clone()),
        }
    }

    pub fn list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self
                .registry
                .descriptions()
                .map(|d| ToolInfo {
                    name: d.name.clone(),
                    description: d.description.clone(),
                    input_schema: d.parameters.clone(),
                })
                .collect(),
        }
    }

    /// Run a tool. Unknown tools and schema violations are protocol errors;
    /// failures inside the tool come back as an error result.
    pub async fn call_tool(&self, params: CallToolParams) -> Result<CallToolResult, ProtocolError> {
        let arguments = params.arguments.unwrap_or_else(|| json!({}));

        match self.registry.execute_tool(&params.name, &arguments).await {
            Ok(value) => Ok(CallToolResult::structured(value)),
            Err(e) if e.is_invalid_request() => Err(ProtocolError::InvalidParams(e.to_string())),
            Err(e) => Ok(CallToolResult::error(e.to_string())),
        }
    }
}

fn parse_params<T: DeserializeOwned + Default>(params: Option<Value>) -> Result<T, ProtocolError> {
    match params {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => {
            serde_json::from_value(value).map_err(|e| ProtocolError::InvalidParams(e.to_string()))
        }
    }
}

fn parse_required_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, ProtocolError> {
    let value = params.ok_or_else(|| ProtocolError::InvalidParams("missing params".to_string()))?;
    serde_json::from_value(value).map_err(|e| ProtocolError::InvalidParams(e.to_string()))
}

fn to_result<T: Serialize>(value: T) -> Result<Value, ProtocolError> {
    serde_json::to_value(value).map_err(|e| ProtocolError::Internal(e.to_string()))
}
