//! Tool registry for dynamic tool registration.
//!
//! Populated once at process start and read-only afterwards, which makes
//! unsynchronized concurrent reads safe across in-flight requests.

use crate::error::Result;
use crate::protocol::Tool;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A named, schema-described callable exposed to MCP clients.
///
/// `execute` returns the tool's native output value; normalization into
/// content blocks is the executor's job.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn definition(&self) -> Tool;
    async fn execute(&self, arguments: Value) -> Result<Value>;
}

pub struct ToolRegistry {
    tools: DashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
        }
    }

    pub fn register<T: ToolHandler + 'static>(&self, tool: T) {
        let definition = tool.definition();
        let name = definition.name.clone();
        debug!("Registering tool: {}", name);
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).map(|r| Arc::clone(&*r))
    }

    pub fn list(&self) -> Vec<Tool> {
        self.tools.iter().map(|r| r.value().definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal descriptor set covering the two guaranteed tools.
///
/// Served by `tools/list` when the registry yields nothing, so clients never
/// see an empty catalog. Schemas mirror the registered tools exactly.
pub fn fallback_catalog() -> Vec<Tool> {
    vec![
        Tool {
            name: "search".into(),
            description:
                "Retrieves information about the Google Ads account using GAQL queries".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "customer_id": {"type": "string"},
                    "resource": {"type": "string"},
                    "fields": {"type": "array", "items": {"type": "string"}},
                    "conditions": {"type": "array", "items": {"type": "string"}},
                    "orderings": {"type": "array", "items": {"type": "string"}},
                    "limit": {"type": ["integer", "string"]}
                },
                "required": ["customer_id", "fields", "resource"]
            }),
        },
        Tool {
            name: "list_accessible_customers".into(),
            description:
                "Returns ids of customers directly accessible by the user authenticating the call"
                    .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}
