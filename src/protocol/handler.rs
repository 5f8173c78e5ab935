//! Request handler and method dispatcher.
//!
//! `Dispatcher::dispatch_raw` is the single entry point shared by every
//! transport. It is total: any input byte sequence produces a well-formed
//! JSON-RPC response object, never an error that escapes to the caller.

use crate::error::{ProtocolError, ProtocolResult};
use crate::protocol::types::*;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error, instrument, warn};

/// Handler trait for processing MCP requests.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle initialize request.
    async fn initialize(&self, params: InitializeParams) -> ProtocolResult<InitializeResult>;

    /// List available tools.
    async fn list_tools(&self) -> ProtocolResult<ListToolsResult>;

    /// Call a tool.
    async fn call_tool(&self, params: CallToolParams) -> ProtocolResult<CallToolResult>;

    /// List available resources.
    async fn list_resources(&self) -> ProtocolResult<ListResourcesResult>;
}

/// Method dispatcher that routes requests to appropriate handlers.
pub struct Dispatcher<H: Handler> {
    handler: Arc<H>,
}

impl<H: Handler> Clone for Dispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

// Matches a top-level-ish "id" member in otherwise unparseable JSON. Used only
// in the degraded path, so a nested "id" being picked up is acceptable.
static ID_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""id"\s*:\s*(?:"((?:[^"\\]|\\.)*)"|(-?\d+)|null)"#).expect("static pattern")
});

impl<H: Handler> Dispatcher<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Dispatch a raw request body.
    ///
    /// Parses the bytes as JSON, validates the JSON-RPC envelope, routes by
    /// method name, and converts every failure into a protocol error response.
    #[instrument(skip_all, fields(bytes = raw.len()))]
    pub async fn dispatch_raw(&self, raw: &[u8]) -> JsonRpcResponse {
        let value: Value = match serde_json::from_slice(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse request body: {}", e);
                let id = scan_for_id(raw);
                return JsonRpcResponse::error(id, JsonRpcError::parse_error());
            }
        };

        let request = match validate_envelope(value) {
            Ok(request) => request,
            Err((id, e)) => {
                warn!("Invalid request envelope: {}", e);
                return JsonRpcResponse::error(id, JsonRpcError::new(e.code(), e.to_string()));
            }
        };

        self.dispatch(request).await
    }

    /// Dispatch a parsed request to the appropriate handler method.
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Dispatching request: {}", request.method);

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params).await,
            "tools/list" => self.handle_list_tools().await,
            "tools/call" => self.handle_call_tool(request.params).await,
            "resources/list" => self.handle_list_resources().await,
            method => {
                warn!("Unknown method: {}", method);
                Err(ProtocolError::MethodNotFound(method.to_string()))
            }
        };

        match result {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => {
                error!("Request failed: {}", e);
                JsonRpcResponse::error(request.id, JsonRpcError::new(e.code(), e.to_string()))
            }
        }
    }

    async fn handle_initialize(&self, params: Option<Value>) -> ProtocolResult<Value> {
        // Permissive by contract: missing or oddly-shaped params fall back to
        // defaults instead of rejecting the handshake.
        let params = params
            .and_then(|v| serde_json::from_value::<InitializeParams>(v).ok())
            .unwrap_or_default();

        let result = self.handler.initialize(params).await?;
        serde_json::to_value(result).map_err(|e| ProtocolError::InternalError(e.to_string().into()))
    }

    async fn handle_list_tools(&self) -> ProtocolResult<Value> {
        let result = self.handler.list_tools().await?;
        serde_json::to_value(result).map_err(|e| ProtocolError::InternalError(e.to_string().into()))
    }

    async fn handle_call_tool(&self, params: Option<Value>) -> ProtocolResult<Value> {
        let params: CallToolParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| ProtocolError::InvalidParams(e.to_string().into()))?
            .ok_or_else(|| ProtocolError::InvalidParams("Missing params".into()))?;

        let result = self.handler.call_tool(params).await?;
        serde_json::to_value(result).map_err(|e| ProtocolError::InternalError(e.to_string().into()))
    }

    async fn handle_list_resources(&self) -> ProtocolResult<Value> {
        let result = self.handler.list_resources().await?;
        serde_json::to_value(result).map_err(|e| ProtocolError::InternalError(e.to_string().into()))
    }
}

/// Validate the JSON-RPC envelope of an already-parsed value.
///
/// On failure returns the best-recoverable request id alongside the error so
/// the response still correlates with the request.
fn validate_envelope(value: Value) -> Result<JsonRpcRequest, (Option<RequestId>, ProtocolError)> {
    let Value::Object(mut object) = value else {
        return Err((
            None,
            ProtocolError::InvalidRequest("request must be a JSON object".into()),
        ));
    };

    let id = object.remove("id").map(value_to_id);

    let method = match object.remove("method") {
        Some(Value::String(method)) if !method.is_empty() => method,
        Some(Value::String(_)) => {
            return Err((
                id,
                ProtocolError::InvalidRequest("method must be a non-empty string".into()),
            ));
        }
        Some(_) => {
            return Err((
                id,
                ProtocolError::InvalidRequest("method must be a string".into()),
            ));
        }
        None => {
            return Err((
                id,
                ProtocolError::InvalidRequest("missing method".into()),
            ));
        }
    };

    Ok(JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.into(),
        id,
        method,
        params: object.remove("params"),
    })
}

fn value_to_id(value: Value) -> RequestId {
    match value {
        Value::String(s) => RequestId::String(s),
        Value::Number(n) => n.as_i64().map(RequestId::Number).unwrap_or(RequestId::Null),
        _ => RequestId::Null,
    }
}

/// Best-effort id extraction from an unparseable payload.
///
/// Bounded degraded-mode behavior: a regex scan over the raw text recovers a
/// top-level `"id"` member when possible so even parse-error responses
/// correlate with their request.
fn scan_for_id(raw: &[u8]) -> Option<RequestId> {
    let text = std::str::from_utf8(raw).ok()?;
    let captures = ID_SCAN.captures(text)?;

    if let Some(s) = captures.get(1) {
        Some(RequestId::String(s.as_str().to_string()))
    } else if let Some(n) = captures.get(2) {
        n.as_str().parse::<i64>().ok().map(RequestId::Number)
    } else {
        Some(RequestId::Null)
    }
}
