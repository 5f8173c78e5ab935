//! Account discovery tool.

use crate::ads::GoogleAdsClient;
use crate::error::{McpError, Result};
use crate::protocol::Tool;
use crate::tools::registry::ToolHandler;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

pub struct ListAccessibleCustomersTool {
    client: Arc<GoogleAdsClient>,
}

impl ListAccessibleCustomersTool {
    pub fn new(client: Arc<GoogleAdsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for ListAccessibleCustomersTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "list_accessible_customers".into(),
            description:
                "Returns ids of customers directly accessible by the user authenticating the call"
                    .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    #[instrument(skip_all, fields(tool = "list_accessible_customers"))]
    async fn execute(&self, _arguments: Value) -> Result<Value> {
        let ids = self
            .client
            .list_accessible_customers()
            .await
            .map_err(McpError::from)?;

        Ok(Value::Array(ids.into_iter().map(Value::String).collect()))
    }
}
