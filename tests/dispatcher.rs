//! End-to-end dispatcher tests: raw bytes in, JSON-RPC response out.

use async_trait::async_trait;
use google_ads_mcp::error::Result;
use google_ads_mcp::protocol::{
    Dispatcher, JsonRpcResponse, RequestId, Tool, ToolContent,
};
use google_ads_mcp::server::{McpHandler, ServerStateBuilder};
use google_ads_mcp::tools::{ToolHandler, ToolRegistry};
use serde_json::{Value, json};
use std::sync::Arc;

struct AccountsStub;

#[async_trait]
impl ToolHandler for AccountsStub {
    fn definition(&self) -> Tool {
        Tool {
            name: "list_accessible_customers".into(),
            description: "Returns ids of accessible customers".into(),
            input_schema: json!({"type": "object", "properties": {}}),
        }
    }

    async fn execute(&self, _arguments: Value) -> Result<Value> {
        Ok(json!(["123-456-7890"]))
    }
}

fn dispatcher() -> Dispatcher<McpHandler> {
    let registry = ToolRegistry::new();
    registry.register(AccountsStub);
    let state = Arc::new(ServerStateBuilder::new().tools(registry).build());
    Dispatcher::new(Arc::new(McpHandler::new(state)))
}

fn dispatcher_with_empty_registry() -> Dispatcher<McpHandler> {
    let state = Arc::new(ServerStateBuilder::new().build());
    Dispatcher::new(Arc::new(McpHandler::new(state)))
}

async fn dispatch(body: &[u8]) -> JsonRpcResponse {
    dispatcher().dispatch_raw(body).await
}

#[tokio::test]
async fn malformed_bytes_yield_parse_error() {
    for body in [
        b"" as &[u8],
        b"{",
        b"not json at all",
        b"\xff\xfe\x00",
        br#"{"jsonrpc": "2.0", "method""#,
    ] {
        let response = dispatch(body).await;
        assert_eq!(
            response.error.as_ref().map(|e| e.code),
            Some(-32700),
            "body {:?} should produce a parse error",
            body
        );
        assert_eq!(response.jsonrpc, "2.0");
    }
}

#[tokio::test]
async fn parse_error_recovers_id_from_raw_text() {
    let response = dispatch(br#"{"id": 99, "method": "tools/list", oops"#).await;
    assert_eq!(response.id, Some(RequestId::Number(99)));
    assert_eq!(response.error.unwrap().code, -32700);
}

#[tokio::test]
async fn unknown_method_echoes_request_id() {
    let response =
        dispatch(br#"{"jsonrpc": "2.0", "id": "req-7", "method": "prompts/list"}"#).await;
    assert_eq!(response.id, Some(RequestId::String("req-7".into())));
    assert_eq!(response.error.unwrap().code, -32601);
}

#[tokio::test]
async fn initialize_with_empty_params() {
    let response =
        dispatch(br#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}"#).await;
    let result = response.result.expect("initialize should succeed");

    let version = result["protocolVersion"].as_str().unwrap();
    assert!(!version.is_empty());
    assert!(result["capabilities"].get("tools").is_some());
    assert!(result["capabilities"].get("resources").is_some());
    assert_eq!(result["serverInfo"]["name"], "google-ads-mcp");
}

#[tokio::test]
async fn tools_list_never_empty() {
    for d in [dispatcher(), dispatcher_with_empty_registry()] {
        let response = d
            .dispatch_raw(br#"{"jsonrpc": "2.0", "id": 2, "method": "tools/list"}"#)
            .await;
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert!(!tools.is_empty());
    }
}

#[tokio::test]
async fn tools_list_is_idempotent() {
    let d = dispatcher();
    let body = br#"{"jsonrpc": "2.0", "id": 3, "method": "tools/list"}"#;
    let first = d.dispatch_raw(body).await.result.unwrap();
    let second = d.dispatch_raw(body).await.result.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn call_tool_returns_normalized_content() {
    let body = br#"{
        "jsonrpc": "2.0",
        "id": 4,
        "method": "tools/call",
        "params": {"name": "list_accessible_customers", "arguments": {}}
    }"#;
    let response = dispatch(body).await;
    let result = response.result.expect("tool call should succeed");

    assert_eq!(result["isError"], json!(false));
    let content = result["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert!(content[0].to_string().contains("123-456-7890"));

    let block: ToolContent = serde_json::from_value(content[0].clone()).unwrap();
    assert_eq!(block, ToolContent::structured(json!(["123-456-7890"])));
}

#[tokio::test]
async fn call_tool_arguments_default_to_empty() {
    let body = br#"{
        "jsonrpc": "2.0",
        "id": 5,
        "method": "tools/call",
        "params": {"name": "list_accessible_customers"}
    }"#;
    let response = dispatch(body).await;
    assert!(response.error.is_none());
}

#[tokio::test]
async fn call_unknown_tool_names_it() {
    let body = br#"{
        "jsonrpc": "2.0",
        "id": 6,
        "method": "tools/call",
        "params": {"name": "does_not_exist", "arguments": {}}
    }"#;
    let response = dispatch(body).await;
    let error = response.error.unwrap();
    assert_eq!(error.code, -32001);
    assert!(error.message.contains("does_not_exist"));
}

#[tokio::test]
async fn resources_list_is_empty_array() {
    let response = dispatch(br#"{"jsonrpc": "2.0", "id": 7, "method": "resources/list"}"#).await;
    assert_eq!(response.result.unwrap()["resources"], json!([]));
}

#[tokio::test]
async fn invalid_envelope_variants() {
    // Not an object.
    let response = dispatch(b"[]").await;
    assert_eq!(response.error.unwrap().code, -32600);

    // Method is not a string.
    let response = dispatch(br#"{"jsonrpc": "2.0", "id": 8, "method": 42}"#).await;
    assert_eq!(response.id, Some(RequestId::Number(8)));
    assert_eq!(response.error.unwrap().code, -32600);

    // Method is empty.
    let response = dispatch(br#"{"jsonrpc": "2.0", "id": 9, "method": ""}"#).await;
    assert_eq!(response.error.unwrap().code, -32600);
}

#[tokio::test]
async fn responses_round_trip() {
    let bodies: [&[u8]; 3] = [
        br#"{"jsonrpc": "2.0", "id": 10, "method": "tools/list"}"#,
        br#"{"jsonrpc": "2.0", "id": "r", "method": "nope"}"#,
        b"garbage",
    ];

    for body in bodies {
        let response = dispatch(body).await;
        let encoded = serde_json::to_string(&response).unwrap();
        let decoded: JsonRpcResponse = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.id, response.id);
        assert_eq!(decoded.result.is_some(), response.result.is_some());
        assert_eq!(
            decoded.error.map(|e| e.code),
            response.error.map(|e| e.code)
        );
    }
}

#[tokio::test]
async fn notification_still_gets_a_response_object() {
    // Requests without an id always produce a response for compatibility;
    // transports decide whether to deliver it.
    let response = dispatch(br#"{"jsonrpc": "2.0", "method": "tools/list"}"#).await;
    assert_eq!(response.id, None);
    assert!(response.result.is_some());
}
