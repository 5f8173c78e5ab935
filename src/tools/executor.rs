//! Tool executor: registry lookup, invocation, and output normalization.
//!
//! Pure bridging logic with no protocol awareness. Tool callables return
//! heterogeneous native values; a single total normalization function turns
//! them into content blocks.

use crate::error::{McpError, ToolError};
use crate::protocol::ToolContent;
use crate::tools::registry::ToolRegistry;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Execute a tool by name and normalize its output into content blocks.
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub async fn execute(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<Vec<ToolContent>, ToolError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!("Executing tool");

        let output = tool.execute(arguments).await.map_err(|e| match e {
            McpError::Tool(tool_error) => tool_error,
            other => ToolError::ExecutionFailed(other.to_string()),
        })?;

        normalize(output)
    }
}

/// Normalize a tool's native output value into content blocks.
///
/// Total over the realistic output space: strings become text blocks;
/// mappings, sequences, numbers, and booleans become a single structured
/// block; a value already shaped like a content block passes through
/// unchanged. Null is the one unnormalizable value (the tool produced
/// nothing) and fails the call.
pub fn normalize(output: Value) -> Result<Vec<ToolContent>, ToolError> {
    match output {
        Value::String(text) => Ok(vec![ToolContent::text(text)]),
        Value::Null => Err(ToolError::ExecutionFailed(
            "tool returned no value".to_string(),
        )),
        other => {
            if let Some(blocks) = as_content_blocks(&other) {
                return Ok(blocks);
            }
            Ok(vec![ToolContent::structured(other)])
        }
    }
}

/// Recognize output that is already in content-block shape.
///
/// Accepts a single block object or a non-empty array of block objects.
fn as_content_blocks(value: &Value) -> Option<Vec<ToolContent>> {
    match value {
        Value::Object(_) => serde_json::from_value::<ToolContent>(value.clone())
            .ok()
            .map(|block| vec![block]),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| serde_json::from_value::<ToolContent>(item.clone()).ok())
            .collect(),
        _ => None,
    }
}
