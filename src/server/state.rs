//! Server state management.
//!
//! The registry is fully populated before the first request is served and
//! never mutated afterwards; everything else mutable is internally
//! synchronized, so state can be shared freely across concurrent dispatches.

use crate::config::ServerConfig;
use crate::protocol::ClientInfo;
use crate::tools::{ToolExecutor, ToolRegistry};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub struct ServerState {
    pub config: ServerConfig,
    pub tools: Arc<ToolRegistry>,
    pub executor: ToolExecutor,
    initialized: AtomicBool,
    client_info: RwLock<Option<ClientInfo>>,
    request_count: AtomicU64,
}

impl ServerState {
    pub fn new(config: ServerConfig, tools: Arc<ToolRegistry>) -> Self {
        Self {
            config,
            executor: ToolExecutor::new(Arc::clone(&tools)),
            tools,
            initialized: AtomicBool::new(false),
            client_info: RwLock::new(None),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn set_initialized(&self, client_info: Option<ClientInfo>) {
        *self.client_info.write() = client_info;
        self.initialized.store(true, Ordering::SeqCst);
    }

    pub fn client_info(&self) -> Option<ClientInfo> {
        self.client_info.read().clone()
    }

    pub fn record_request(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }
}

pub struct ServerStateBuilder {
    config: Option<ServerConfig>,
    tools: Option<Arc<ToolRegistry>>,
}

impl ServerStateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            tools: None,
        }
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(Arc::new(tools));
        self
    }

    pub fn build(self) -> ServerState {
        let config = self.config.unwrap_or_default();
        let tools = self.tools.unwrap_or_default();
        ServerState::new(config, tools)
    }
}

impl Default for ServerStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
