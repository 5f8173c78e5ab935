//! Error types for the MCP server.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` conversions.

use std::borrow::Cow;
use thiserror::Error;

/// Main error type for the Google Ads MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Google Ads error: {0}")]
    Ads(#[from] AdsError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: Cow<'static, str> },
}

/// JSON-RPC 2.0 and MCP protocol errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Parse error: invalid JSON")]
    ParseError,

    #[error("Invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(Cow<'static, str>),

    #[error("Internal error: {0}")]
    InternalError(Cow<'static, str>),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Error executing tool {tool}: {message}")]
    ToolExecution { tool: String, message: String },
}

impl ProtocolError {
    /// Returns the JSON-RPC 2.0 error code.
    pub fn code(&self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest(_) => -32600,
            Self::MethodNotFound(_) => -32601,
            Self::InvalidParams(_) => -32602,
            Self::InternalError(_) => -32603,
            Self::ToolNotFound(_) => -32001,
            Self::ToolExecution { .. } => -32002,
        }
    }
}

/// Google Ads API client errors.
///
/// Messages carry failure descriptions only; credential values (tokens,
/// client secrets) must never be formatted into them.
#[derive(Debug, Error)]
pub enum AdsError {
    #[error("Authentication failed: {0}")]
    Auth(Cow<'static, str>),

    #[error("Google Ads API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response shape: {0}")]
    Decode(Cow<'static, str>),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(Cow<'static, str>),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    #[error("Environment variable not found: {0}")]
    EnvNotFound(String),
}

/// Tool execution errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(Cow<'static, str>),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Result type alias for McpError.
pub type Result<T> = std::result::Result<T, McpError>;

/// Result type alias for ProtocolError.
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

/// Result type alias for AdsError.
pub type AdsResult<T> = std::result::Result<T, AdsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_codes() {
        assert_eq!(ProtocolError::ParseError.code(), -32700);
        assert_eq!(ProtocolError::InvalidRequest("test".into()).code(), -32600);
        assert_eq!(ProtocolError::MethodNotFound("test".into()).code(), -32601);
        assert_eq!(ProtocolError::InvalidParams("test".into()).code(), -32602);
        assert_eq!(ProtocolError::InternalError("test".into()).code(), -32603);
        assert_eq!(ProtocolError::ToolNotFound("test".into()).code(), -32001);
        assert_eq!(
            ProtocolError::ToolExecution {
                tool: "search".into(),
                message: "boom".into()
            }
            .code(),
            -32002
        );
    }

    #[test]
    fn test_error_conversion() {
        let tool_error = ToolError::NotFound("search".into());
        let mcp_error: McpError = tool_error.into();
        assert!(matches!(mcp_error, McpError::Tool(_)));
    }

    #[test]
    fn test_tool_execution_message_names_tool() {
        let err = ProtocolError::ToolExecution {
            tool: "search".into(),
            message: "quota exceeded".into(),
        };
        let text = err.to_string();
        assert!(text.contains("search"));
        assert!(text.contains("quota exceeded"));
    }
}
