//! MCP server exposing the Google Ads API to AI-assistant clients.
//!
//! Speaks JSON-RPC 2.0 over HTTP POST (root and `/messages`), an SSE stream,
//! and line-delimited stdio. Every transport funnels into one dispatcher, so
//! semantics are identical regardless of entry point.
//!
//! # Example
//!
//! ```no_run
//! use google_ads_mcp::{
//!     ads::GoogleAdsClient,
//!     config::{AdsConfig, ServerConfig},
//!     server::{self, ServerStateBuilder},
//!     tools,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(GoogleAdsClient::new(AdsConfig::from_env()));
//!
//!     let state = Arc::new(
//!         ServerStateBuilder::new()
//!             .config(ServerConfig::default())
//!             .tools(tools::create_registry(client))
//!             .build(),
//!     );
//!
//!     server::http::serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod ads;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use ads::GoogleAdsClient;
pub use config::{AdsConfig, ServerConfig, TransportKind};
pub use error::{McpError, Result};
pub use protocol::{Dispatcher, Handler, StdioTransport};
pub use server::{McpHandler, ServerState, ServerStateBuilder};
pub use tools::{ToolExecutor, ToolRegistry};
