//! Google Ads REST API client.
//!
//! Thin wrapper over the `googleAds:search` and `listAccessibleCustomers`
//! REST endpoints. The client is cheap to construct and performs no network
//! I/O until first use, so the server starts even with incomplete
//! credentials; failures surface on the first tool call instead.

use crate::ads::auth::TokenProvider;
use crate::config::AdsConfig;
use crate::error::{AdsError, AdsResult};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

/// Google Ads API version the client speaks.
pub const ADS_API_VERSION: &str = "v21";

const ADS_API_BASE: &str = "https://googleads.googleapis.com";

pub struct GoogleAdsClient {
    http: reqwest::Client,
    auth: TokenProvider,
    config: AdsConfig,
    base_url: String,
}

impl GoogleAdsClient {
    pub fn new(config: AdsConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            auth: TokenProvider::new(http.clone(), config.clone()),
            http,
            config,
            base_url: ADS_API_BASE.to_string(),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn request(&self, method: Method, url: String) -> AdsResult<reqwest::RequestBuilder> {
        let token = self.auth.access_token().await?;
        let developer_token = self.config.developer_token()?;

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header("developer-token", developer_token);

        if let Some(login_customer_id) = &self.config.login_customer_id {
            request = request.header("login-customer-id", login_customer_id);
        }

        Ok(request)
    }

    /// Run a GAQL query against a customer account and return the result rows.
    #[instrument(skip(self, query), fields(customer_id = %customer_id))]
    pub async fn search(&self, customer_id: &str, query: &str) -> AdsResult<Vec<Value>> {
        let url = format!(
            "{}/{}/customers/{}/googleAds:search",
            self.base_url, ADS_API_VERSION, customer_id
        );

        debug!("Running GAQL query: {}", query);

        let response = self
            .request(Method::POST, url)
            .await?
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        let payload = check(response).await?;
        match payload.get("results") {
            None => Ok(Vec::new()),
            Some(Value::Array(rows)) => Ok(rows.clone()),
            Some(_) => Err(AdsError::Decode("results is not an array".into())),
        }
    }

    /// Returns the ids of customers directly accessible by the authenticated
    /// user.
    #[instrument(skip(self))]
    pub async fn list_accessible_customers(&self) -> AdsResult<Vec<String>> {
        let url = format!(
            "{}/{}/customers:listAccessibleCustomers",
            self.base_url, ADS_API_VERSION
        );

        let response = self.request(Method::GET, url).await?.send().await?;
        let payload = check(response).await?;

        let Some(Value::Array(names)) = payload.get("resourceNames") else {
            return Ok(Vec::new());
        };

        names
            .iter()
            .map(|name| {
                name.as_str()
                    .map(|n| n.trim_start_matches("customers/").to_string())
                    .ok_or_else(|| AdsError::Decode("resource name is not a string".into()))
            })
            .collect()
    }
}

/// Turn a non-success response into an API error carrying the server's own
/// message when one is present.
async fn check(response: reqwest::Response) -> AdsResult<Value> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(String::from)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        return Err(AdsError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|_| AdsError::Decode("response body is not JSON".into()))
}

/// Customer ids are often written with dashes ("123-456-7890"); the API wants
/// digits only.
pub fn normalize_customer_id(customer_id: &str) -> String {
    customer_id.chars().filter(|c| *c != '-').collect()
}
