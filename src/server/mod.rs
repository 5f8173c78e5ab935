//! Server state, MCP request handler, and HTTP transport.

pub mod handler;
pub mod http;
pub mod state;

pub use handler::McpHandler;
pub use state::{ServerState, ServerStateBuilder};
