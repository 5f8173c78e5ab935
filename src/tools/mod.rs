//! MCP tool definitions and registry.

pub mod accounts;
pub mod executor;
pub mod registry;
pub mod search;

pub use accounts::ListAccessibleCustomersTool;
pub use executor::{ToolExecutor, normalize};
pub use registry::{ToolHandler, ToolRegistry, fallback_catalog};
pub use search::SearchTool;

use crate::ads::GoogleAdsClient;
use std::sync::Arc;

/// Create and register all tools.
pub fn create_registry(client: Arc<GoogleAdsClient>) -> ToolRegistry {
    let registry = ToolRegistry::new();

    registry.register(SearchTool::new(Arc::clone(&client)));
    registry.register(ListAccessibleCustomersTool::new(client));

    registry
}
