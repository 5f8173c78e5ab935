//! Configuration types and builders.

use crate::error::{AdsError, AdsResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;

/// Transport the server speaks on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// HTTP POST entry points plus the SSE stream.
    #[default]
    Http,
    /// Line-delimited JSON-RPC over stdin/stdout.
    Stdio,
}

impl TransportKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "http" => Some(Self::Http),
            "stdio" => Some(Self::Stdio),
            _ => None,
        }
    }
}

impl TryFrom<&str> for TransportKind {
    type Error = ConfigError;

    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        Self::parse(s).ok_or_else(|| ConfigError::InvalidValue {
            field: "transport".into(),
            message: format!("Unknown transport: '{}'. Valid transports: http, stdio", s).into(),
        })
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub transport: TransportKind,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "google-ads-mcp".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            transport: TransportKind::default(),
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for ServerConfig.
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn transport(mut self, transport: TransportKind) -> Self {
        self.config.transport = transport;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Build from environment variables.
    pub fn from_env(mut self) -> crate::error::Result<Self> {
        if let Ok(transport) = env::var("MCP_TRANSPORT") {
            self.config.transport = TransportKind::try_from(transport.as_str())?;
        }

        if let Ok(host) = env::var("MCP_HOST") {
            self.config.host = host;
        }

        if let Ok(port) = env::var("PORT") {
            self.config.port = port.parse().map_err(|_| {
                crate::error::McpError::Config(ConfigError::InvalidValue {
                    field: "PORT".into(),
                    message: "Invalid port number".into(),
                })
            })?;
        }

        Ok(self)
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}

/// Google Ads API credentials and account settings.
///
/// Loading never fails: missing values are carried as `None` and reported on
/// first use, so the server starts even when the environment is incomplete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdsConfig {
    pub client_id: Option<String>,
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing)]
    pub developer_token: Option<String>,
    pub login_customer_id: Option<String>,
}

/// Borrowed view of the three OAuth values once validated present.
#[derive(Debug)]
pub struct OauthCredentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub refresh_token: &'a str,
}

impl AdsConfig {
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("GOOGLE_ADS_CLIENT_ID").ok(),
            client_secret: env::var("GOOGLE_ADS_CLIENT_SECRET").ok(),
            refresh_token: env::var("GOOGLE_ADS_REFRESH_TOKEN").ok(),
            developer_token: env::var("GOOGLE_ADS_DEVELOPER_TOKEN").ok(),
            login_customer_id: env::var("GOOGLE_ADS_LOGIN_CUSTOMER_ID").ok(),
        }
    }

    /// Validate that the OAuth triple is present.
    pub fn oauth(&self) -> AdsResult<OauthCredentials<'_>> {
        let missing = [
            ("GOOGLE_ADS_CLIENT_ID", &self.client_id),
            ("GOOGLE_ADS_CLIENT_SECRET", &self.client_secret),
            ("GOOGLE_ADS_REFRESH_TOKEN", &self.refresh_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(AdsError::Auth(
                format!(
                    "OAuth credentials not configured; set {}",
                    missing.join(", ")
                )
                .into(),
            ));
        }

        Ok(OauthCredentials {
            client_id: self.client_id.as_deref().unwrap_or_default(),
            client_secret: self.client_secret.as_deref().unwrap_or_default(),
            refresh_token: self.refresh_token.as_deref().unwrap_or_default(),
        })
    }

    pub fn developer_token(&self) -> AdsResult<&str> {
        self.developer_token.as_deref().ok_or_else(|| {
            AdsError::Auth("GOOGLE_ADS_DEVELOPER_TOKEN environment variable not set".into())
        })
    }
}
