//! MCP protocol implementation over JSON-RPC 2.0.

pub mod handler;
pub mod transport;
pub mod types;

pub use handler::{Dispatcher, Handler};
pub use transport::StdioTransport;
pub use types::*;
