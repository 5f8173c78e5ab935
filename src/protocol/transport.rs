//! Stdio transport for JSON-RPC messages.
//!
//! Line-delimited JSON over stdin/stdout for local MCP clients. Each line is
//! funnelled through the same `Dispatcher::dispatch_raw` as the HTTP entry
//! points, so behavior is identical regardless of transport.

use crate::error::{McpError, Result};
use crate::protocol::handler::{Dispatcher, Handler};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::Mutex;
use tracing::{debug, error, info, trace};

/// Stdio-based transport for MCP.
pub struct StdioTransport {
    reader: Arc<Mutex<BufReader<Stdin>>>,
    writer: Arc<Mutex<Stdout>>,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            reader: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()))),
            writer: Arc::new(Mutex::new(tokio::io::stdout())),
        }
    }

    /// Read a single line from stdin. `None` means EOF.
    async fn read_line(&self) -> Result<Option<String>> {
        let mut reader = self.reader.lock().await;
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line).await {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    trace!("Received line: {}", line);
                    return Ok(Some(line));
                }
                Err(e) => {
                    error!("Error reading from stdin: {}", e);
                    return Err(McpError::Io(e));
                }
            }
        }
    }

    /// Write a line to stdout.
    async fn write_line(&self, content: &str) -> Result<()> {
        let mut writer = self.writer.lock().await;
        trace!("Sending line: {}", content);
        writer.write_all(content.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    /// Serve requests from stdin until EOF.
    ///
    /// Every line, however malformed, produces exactly one response line;
    /// the dispatcher guarantees it is a well-formed JSON-RPC object.
    pub async fn serve<H: Handler>(&self, dispatcher: Dispatcher<H>) -> Result<()> {
        info!("Serving MCP over stdio");

        while let Some(line) = self.read_line().await? {
            let response = dispatcher.dispatch_raw(line.as_bytes()).await;
            debug!("Sending response: id={:?}", response.id);

            let json = serde_json::to_string(&response)?;
            self.write_line(&json).await?;
        }

        info!("EOF on stdin, stdio transport shutting down");
        Ok(())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}
