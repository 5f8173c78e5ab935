//! OAuth 2.0 credential handling for the Google Ads API.
//!
//! The Google Ads API requires OAuth user credentials; the refresh token is
//! exchanged for short-lived access tokens which are cached in-process.
//! Error messages describe what failed but never carry credential values.

use crate::config::AdsConfig;
use crate::error::{AdsError, AdsResult};
use parking_lot::Mutex;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

// Refresh this long before the reported expiry so in-flight requests never
// race an expiring token.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Exchanges the configured refresh token for access tokens, caching them
/// until shortly before expiry.
pub struct TokenProvider {
    http: reqwest::Client,
    config: AdsConfig,
    token_uri: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client, config: AdsConfig) -> Self {
        Self {
            http,
            config,
            token_uri: TOKEN_URI.to_string(),
            cached: Mutex::new(None),
        }
    }

    /// Override the token endpoint.
    pub fn with_token_uri(mut self, uri: impl Into<String>) -> Self {
        self.token_uri = uri.into();
        self
    }

    /// Returns a valid access token, refreshing if the cached one expired.
    pub async fn access_token(&self) -> AdsResult<String> {
        if let Some(cached) = self.cached.lock().as_ref()
            && cached.expires_at > Instant::now()
        {
            return Ok(cached.token.clone());
        }
        self.refresh().await
    }

    async fn refresh(&self) -> AdsResult<String> {
        let oauth = self.config.oauth()?;

        debug!("Refreshing Google Ads access token");

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", oauth.client_id),
                ("client_secret", oauth.client_secret),
                ("refresh_token", oauth.refresh_token),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdsError::Auth(
                format!(
                    "token endpoint returned HTTP {}; verify your client id, \
                     client secret, and refresh token",
                    status.as_u16()
                )
                .into(),
            ));
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|_| AdsError::Decode("token endpoint returned unexpected payload".into()))?;

        let expires_at =
            Instant::now() + Duration::from_secs(payload.expires_in).saturating_sub(EXPIRY_SKEW);

        info!("Refreshed Google Ads access token");

        *self.cached.lock() = Some(CachedToken {
            token: payload.access_token.clone(),
            expires_at,
        });

        Ok(payload.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_fail_without_network() {
        let provider = TokenProvider::new(reqwest::Client::new(), AdsConfig::default());
        let err = provider.access_token().await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("GOOGLE_ADS_CLIENT_ID"));
    }

    #[test]
    fn test_auth_error_never_contains_secret() {
        let config = AdsConfig {
            client_id: Some("id".into()),
            client_secret: Some("super-secret-value".into()),
            refresh_token: Some("refresh-secret".into()),
            developer_token: Some("dev-secret".into()),
            login_customer_id: None,
        };
        // Errors are built from status codes and field names only.
        let err = AdsError::Auth("token endpoint returned HTTP 401".into());
        let message = err.to_string();
        assert!(!message.contains(config.client_secret.as_deref().unwrap()));
        assert!(!message.contains(config.refresh_token.as_deref().unwrap()));
    }
}
