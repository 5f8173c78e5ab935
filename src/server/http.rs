//! HTTP and SSE transport adapters.
//!
//! All POST entry points funnel into the same dispatcher, so behavior is
//! identical regardless of which path a client targets. MCP clients disagree
//! on whether to POST to the root or to `/messages`; both are served.
//!
//! Protocol-level errors are carried in the JSON-RPC `error` field with HTTP
//! status 200; only transport-level failures (unreadable body) surface as
//! HTTP errors, and axum handles those before our handlers run.

use crate::error::Result;
use crate::protocol::handler::Dispatcher;
use crate::protocol::types::JsonRpcResponse;
use crate::server::handler::McpHandler;
use crate::server::state::ServerState;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Start the HTTP server.
pub async fn serve(state: Arc<ServerState>) -> Result<()> {
    let addr = state.config.bind_addr();
    let dispatcher = Dispatcher::new(Arc::new(McpHandler::new(state)));
    let app = create_router(dispatcher);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the transport router.
pub fn create_router(dispatcher: Dispatcher<McpHandler>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sse", get(sse_stream))
        .route("/", post(post_root))
        .route("/messages", post(post_messages))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(dispatcher)
}

/// Health check endpoint: a static liveness probe, not part of the protocol
/// dispatcher.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "google-ads-mcp",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Root POST entry point.
async fn post_root(
    State(dispatcher): State<Dispatcher<McpHandler>>,
    body: Bytes,
) -> Json<JsonRpcResponse> {
    Json(dispatcher.dispatch_raw(&body).await)
}

/// `/messages` POST entry point; same contract as the root.
async fn post_messages(
    State(dispatcher): State<Dispatcher<McpHandler>>,
    body: Bytes,
) -> Json<JsonRpcResponse> {
    Json(dispatcher.dispatch_raw(&body).await)
}

/// SSE entry point.
///
/// Sends a single connection event, then keep-alive comments. Requests go
/// over POST; each tool call returns one complete result, so nothing else is
/// streamed.
async fn sse_stream() -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let hello = serde_json::json!({
        "type": "connection",
        "status": "connected",
        "note": "Use POST /messages for requests",
    });

    let stream = stream::once(async move { Ok(Event::default().data(hello.to_string())) });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(KEEPALIVE_INTERVAL)
            .text("keepalive"),
    )
}
