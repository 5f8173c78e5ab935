//! MCP request handler implementation.

use crate::error::{ProtocolError, ProtocolResult, ToolError};
use crate::protocol::{
    CallToolParams, CallToolResult, Handler, InitializeParams, InitializeResult,
    ListResourcesResult, ListToolsResult, MCP_VERSION, ServerCapabilities, ServerInfo,
};
use crate::server::state::ServerState;
use crate::tools::fallback_catalog;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// MCP request handler that processes protocol messages.
pub struct McpHandler {
    state: Arc<ServerState>,
}

impl McpHandler {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }
}

#[async_trait]
impl Handler for McpHandler {
    async fn initialize(&self, params: InitializeParams) -> ProtocolResult<InitializeResult> {
        self.state.record_request();

        if let Some(client) = &params.client_info {
            info!("Initialize request from {} v{}", client.name, client.version);
        } else {
            info!("Initialize request from anonymous client");
        }

        // Permissive handshake: the client's protocolVersion is recorded in
        // the log but not validated.
        if let Some(version) = &params.protocol_version {
            debug!("Client protocol version: {}", version);
        }

        self.state.set_initialized(params.client_info);

        Ok(InitializeResult {
            protocol_version: MCP_VERSION.into(),
            capabilities: ServerCapabilities::default(),
            server_info: ServerInfo {
                name: self.state.config.name.to_string(),
                version: self.state.config.version.to_string(),
            },
        })
    }

    async fn list_tools(&self) -> ProtocolResult<ListToolsResult> {
        self.state.record_request();

        let tools = self.state.tools.list();

        // The client must never see an empty catalog: serve the hardcoded
        // minimal descriptor set when the registry yields nothing.
        if tools.is_empty() {
            warn!("Tool registry returned no descriptors, serving fallback catalog");
            return Ok(ListToolsResult {
                tools: fallback_catalog(),
            });
        }

        debug!("Listing {} tools", tools.len());
        Ok(ListToolsResult { tools })
    }

    async fn call_tool(&self, params: CallToolParams) -> ProtocolResult<CallToolResult> {
        self.state.record_request();
        debug!("Tool call: {}", params.name);

        match self.state.executor.execute(&params.name, params.arguments).await {
            Ok(content) => Ok(CallToolResult::ok(content)),
            Err(ToolError::NotFound(name)) => {
                warn!("Unknown tool requested: {}", name);
                Err(ProtocolError::ToolNotFound(name))
            }
            Err(e) => {
                tracing::error!("Tool execution error: {}", e);
                Err(ProtocolError::ToolExecution {
                    tool: params.name,
                    message: e.to_string(),
                })
            }
        }
    }

    async fn list_resources(&self) -> ProtocolResult<ListResourcesResult> {
        self.state.record_request();

        // No resources are modeled; the method exists for protocol completeness.
        Ok(ListResourcesResult { resources: vec![] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::protocol::Tool;
    use crate::server::state::ServerStateBuilder;
    use crate::tools::{ToolHandler, ToolRegistry};
    use serde_json::{Value, json};

    struct AccountsStub;

    #[async_trait]
    impl ToolHandler for AccountsStub {
        fn definition(&self) -> Tool {
            Tool {
                name: "list_accessible_customers".into(),
                description: "stub".into(),
                input_schema: json!({"type": "object", "properties": {}}),
            }
        }

        async fn execute(&self, _arguments: Value) -> Result<Value> {
            Ok(json!(["123-456-7890"]))
        }
    }

    fn handler_with_stub() -> McpHandler {
        let registry = ToolRegistry::new();
        registry.register(AccountsStub);
        McpHandler::new(Arc::new(
            ServerStateBuilder::new().tools(registry).build(),
        ))
    }

    #[tokio::test]
    async fn test_initialize_marks_state() {
        let handler = handler_with_stub();
        let result = handler.initialize(InitializeParams::default()).await.unwrap();
        assert_eq!(result.protocol_version, MCP_VERSION);
        assert!(handler.state().is_initialized());
    }

    #[tokio::test]
    async fn test_list_tools_serves_fallback_when_registry_empty() {
        let handler = McpHandler::new(Arc::new(ServerStateBuilder::new().build()));
        let result = handler.list_tools().await.unwrap();
        assert!(!result.tools.is_empty());
        assert!(result.tools.iter().any(|t| t.name == "search"));
    }

    #[tokio::test]
    async fn test_call_tool_success_is_not_error() {
        let handler = handler_with_stub();
        let result = handler
            .call_tool(CallToolParams {
                name: "list_accessible_customers".into(),
                arguments: json!({}),
            })
            .await
            .unwrap();
        assert!(!result.is_error);
        assert_eq!(result.content.len(), 1);
    }

    #[tokio::test]
    async fn test_call_tool_unknown_name() {
        let handler = handler_with_stub();
        let err = handler
            .call_tool(CallToolParams {
                name: "does_not_exist".into(),
                arguments: json!({}),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), -32001);
        assert!(err.to_string().contains("does_not_exist"));
    }

    #[tokio::test]
    async fn test_list_resources_empty() {
        let handler = handler_with_stub();
        let result = handler.list_resources().await.unwrap();
        assert!(result.resources.is_empty());
    }
}
