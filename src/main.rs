//! MCP server binary entry point.

use anyhow::Result;
use google_ads_mcp::{
    ads::GoogleAdsClient,
    config::{AdsConfig, ServerConfig, TransportKind},
    protocol::{Dispatcher, StdioTransport},
    server::{self, McpHandler, ServerStateBuilder},
    tools,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = ServerConfig::builder().from_env()?.build();

    let ads_config = AdsConfig::from_env();
    if ads_config.oauth().is_err() || ads_config.developer_token().is_err() {
        // The server still starts: tools are advertised and the credential
        // problem is reported on the first call instead.
        warn!(
            "Google Ads credentials incomplete; tool calls will fail until \
             GOOGLE_ADS_CLIENT_ID, GOOGLE_ADS_CLIENT_SECRET, GOOGLE_ADS_REFRESH_TOKEN, \
             and GOOGLE_ADS_DEVELOPER_TOKEN are set"
        );
    }

    let client = Arc::new(GoogleAdsClient::new(ads_config));
    let registry = tools::create_registry(client);

    let transport = config.transport;
    let state = Arc::new(
        ServerStateBuilder::new()
            .config(config)
            .tools(registry)
            .build(),
    );

    info!("Server state initialized with {} tools", state.tools.len());

    match transport {
        TransportKind::Http => server::http::serve(state).await?,
        TransportKind::Stdio => {
            let dispatcher = Dispatcher::new(Arc::new(McpHandler::new(state)));
            StdioTransport::new().serve(dispatcher).await?;
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("google_ads_mcp=info,warn"));

    // JSON to stderr; on the stdio transport stdout belongs to the protocol.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .json()
        .init();
}
