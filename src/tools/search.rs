//! GAQL search tool.

use crate::ads::{GoogleAdsClient, normalize_customer_id};
use crate::error::{McpError, Result, ToolError};
use crate::protocol::Tool;
use crate::tools::registry::ToolHandler;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub customer_id: String,
    pub resource: String,
    pub fields: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub orderings: Vec<String>,
    #[serde(default)]
    pub limit: Option<Limit>,
}

/// Row limit. Clients send this as either an integer or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Limit {
    Number(u64),
    Text(String),
}

impl Limit {
    fn value(&self) -> std::result::Result<u64, ToolError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s.parse().map_err(|_| {
                ToolError::InvalidArguments(format!("limit is not a number: '{}'", s))
            }),
        }
    }
}

pub struct SearchTool {
    client: Arc<GoogleAdsClient>,
}

impl SearchTool {
    pub fn new(client: Arc<GoogleAdsClient>) -> Self {
        Self { client }
    }
}

/// Assemble a GAQL statement from the structured arguments.
fn build_query(args: &SearchArgs) -> std::result::Result<String, ToolError> {
    if args.fields.is_empty() {
        return Err(ToolError::MissingArgument("fields".into()));
    }
    if args.resource.is_empty() {
        return Err(ToolError::MissingArgument("resource".into()));
    }

    let mut query = format!("SELECT {} FROM {}", args.fields.join(", "), args.resource);

    if !args.conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&args.conditions.join(" AND "));
    }

    if !args.orderings.is_empty() {
        query.push_str(" ORDER BY ");
        query.push_str(&args.orderings.join(", "));
    }

    if let Some(limit) = &args.limit {
        query.push_str(&format!(" LIMIT {}", limit.value()?));
    }

    Ok(query)
}

#[async_trait]
impl ToolHandler for SearchTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "search".into(),
            description:
                "Retrieves information about the Google Ads account using GAQL queries".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "customer_id": {
                        "type": "string",
                        "description": "The Google Ads customer id, with or without dashes"
                    },
                    "resource": {
                        "type": "string",
                        "description": "The GAQL resource to select from (e.g. campaign)"
                    },
                    "fields": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Fields to select"
                    },
                    "conditions": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "WHERE conditions, joined with AND"
                    },
                    "orderings": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "ORDER BY expressions"
                    },
                    "limit": {
                        "type": ["integer", "string"],
                        "description": "Maximum number of rows to return"
                    }
                },
                "required": ["customer_id", "fields", "resource"]
            }),
        }
    }

    #[instrument(skip(self, arguments), fields(tool = "search"))]
    async fn execute(&self, arguments: Value) -> Result<Value> {
        let args: SearchArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let query = build_query(&args)?;
        let customer_id = normalize_customer_id(&args.customer_id);

        debug!("Executing GAQL search for customer {}", customer_id);

        let rows = self
            .client
            .search(&customer_id, &query)
            .await
            .map_err(McpError::from)?;

        Ok(Value::Array(rows))
    }
}
