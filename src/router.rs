//! Request dispatch for the schema-validated component surface.
//!
//! The [`McpRouter`] wires the registry to the JSON-RPC envelope: it
//! resolves the target component, runs the stored validator against the
//! request arguments, and either hands the normalized parameters to the
//! handler or renders the collected validation errors as a `-32602
//! InvalidParams` error whose `data` carries the structured error list.
//!
//! Transports are deliberately absent; anything that can produce a
//! [`JsonRpcRequest`] and consume a [`JsonRpcResponse`] can sit in front
//! of this router.

use serde_json::{Value, json};

use crate::error::{Error, JsonRpcError, Result};
use crate::protocol::{
    CallToolParams, CallToolResult, GetPromptParams, Implementation, InitializeResult,
    JsonRpcRequest, JsonRpcResponse, ListPromptsResult, ListToolsResult, PROTOCOL_VERSION,
    PromptsCapability, ServerCapabilities, ToolsCapability,
};
use crate::prompt::Prompt;
use crate::registry::ComponentRegistry;
use crate::tool::Tool;

/// Dispatches MCP requests against a component registry.
#[derive(Clone)]
pub struct McpRouter {
    registry: ComponentRegistry,
    server_info: Implementation,
    instructions: Option<String>,
}

impl McpRouter {
    pub fn new() -> Self {
        Self {
            registry: ComponentRegistry::new(),
            server_info: Implementation::new("mcp-schema-server", env!("CARGO_PKG_VERSION")),
            instructions: None,
        }
    }

    /// Set the server name and version reported by `initialize`.
    pub fn server_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.server_info = Implementation::new(name, version);
        self
    }

    /// Set the instructions string reported by `initialize`.
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Register a tool.
    pub fn tool(self, tool: Tool) -> Self {
        self.registry.register_tool(tool);
        self
    }

    /// Register a prompt.
    pub fn prompt(self, prompt: Prompt) -> Self {
        self.registry.register_prompt(prompt);
        self
    }

    /// The underlying registry handle, for runtime (de)registration.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Handle a single JSON-RPC request.
    pub async fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if let Err(err) = request.validate() {
            return JsonRpcResponse::error(Some(request.id), err);
        }

        tracing::debug!(method = %request.method, "dispatching request");
        let id = request.id.clone();
        match self.dispatch(&request).await {
            Ok(result) => JsonRpcResponse::result(id, result),
            Err(err) => JsonRpcResponse::error(Some(id), render_error(err)),
        }
    }

    async fn dispatch(&self, request: &JsonRpcRequest) -> Result<Value> {
        match request.method.as_str() {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: PROTOCOL_VERSION.to_string(),
                    capabilities: ServerCapabilities {
                        tools: Some(ToolsCapability::default()),
                        prompts: Some(PromptsCapability::default()),
                    },
                    server_info: self.server_info.clone(),
                    instructions: self.instructions.clone(),
                };
                Ok(serde_json::to_value(result)?)
            }

            "ping" => Ok(json!({})),

            "tools/list" => {
                let tools = self
                    .registry
                    .tools()
                    .iter()
                    .map(|t| t.definition())
                    .collect();
                Ok(serde_json::to_value(ListToolsResult { tools })?)
            }

            "tools/call" => {
                let params: CallToolParams = parse_params(request)?;
                let tool = self
                    .registry
                    .tool(&params.name)
                    .ok_or_else(|| JsonRpcError::method_not_found(&params.name))?;
                tracing::debug!(tool = %params.name, "calling tool");
                // Tool-level failures are reported inside the result so the
                // model can see them; only protocol problems become errors.
                let result = match tool.call(&params.arguments).await {
                    Ok(result) => result,
                    Err(Error::Tool(message)) => CallToolResult::error(message),
                    Err(err) => return Err(err),
                };
                Ok(serde_json::to_value(result)?)
            }

            "prompts/list" => {
                let prompts = self
                    .registry
                    .prompts()
                    .iter()
                    .map(|p| p.definition())
                    .collect();
                Ok(serde_json::to_value(ListPromptsResult { prompts })?)
            }

            "prompts/get" => {
                let params: GetPromptParams = parse_params(request)?;
                let prompt = self
                    .registry
                    .prompt(&params.name)
                    .ok_or_else(|| JsonRpcError::method_not_found(&params.name))?;
                tracing::debug!(prompt = %params.name, "rendering prompt");
                let result = prompt.get(&params.arguments).await?;
                Ok(serde_json::to_value(result)?)
            }

            other => Err(JsonRpcError::method_not_found(other).into()),
        }
    }
}

impl Default for McpRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(request: &JsonRpcRequest) -> Result<T> {
    let params = request.params.clone().unwrap_or(Value::Null);
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid parameters: {e}")).into())
}

fn render_error(err: Error) -> JsonRpcError {
    match err {
        Error::JsonRpc(err) => err,
        Error::Validation(errors) => JsonRpcError::from_validation(&errors),
        Error::Schema(err) => JsonRpcError::internal_error(err.to_string()),
        Error::Serialization(err) => JsonRpcError::internal_error(err.to_string()),
        Error::Tool(message) => JsonRpcError::internal_error(message),
        Error::Internal(message) => JsonRpcError::internal_error(message),
    }
}
