use serde::{Deserialize, Serialize};
use std::time::Duration;
use storebot_core::{StorebotError, StorebotResult};
use tracing::debug;

const DEFAULT_API_VERSION: &str = "2023-10";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the commerce Admin API client.
///
/// Built once at startup and injected into the client; tools never read the
/// environment themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceConfig {
    /// Shop name, as in `https://{shop}.myshopify.com`.
    pub shop: String,
    /// Admin API access token.
    pub access_token: String,
    /// Admin API version path segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Full base URL override; replaces the shop-derived URL when set.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl CommerceConfig {
    /// Creates a config for the given shop and token with default version
    /// and timeout.
    pub fn new(shop: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop: shop.into(),
            access_token: access_token.into(),
            api_version: default_api_version(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Authenticated HTTP client for the commerce Admin REST API.
pub struct CommerceClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl CommerceClient {
    /// Builds a client from the given configuration.
    pub fn new(config: &CommerceConfig) -> StorebotResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorebotError::Config(format!("Failed to build HTTP client: {e}")))?;

        let base_url = match &config.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.myshopify.com/admin/api/{}",
                config.shop, config.api_version
            ),
        };

        Ok(Self {
            http,
            base_url,
            access_token: config.access_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET a resource, returning `Ok(None)` on HTTP 404.
    pub async fn get_optional(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> StorebotResult<Option<serde_json::Value>> {
        let url = self.endpoint(path);
        debug!(url = %url, "Commerce GET");

        let resp = self
            .http
            .get(&url)
            .header("X-Shopify-Access-Token", &self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| StorebotError::Tool(format!("Request to {path} failed: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::read_body(path, resp).await.map(Some)
    }

    /// GET a resource, treating HTTP 404 as an error like any other.
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> StorebotResult<serde_json::Value> {
        match self.get_optional(path, query).await? {
            Some(value) => Ok(value),
            None => Err(StorebotError::Tool(format!("Resource not found: {path}"))),
        }
    }

    /// POST a JSON body to a resource.
    pub async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> StorebotResult<serde_json::Value> {
        let url = self.endpoint(path);
        debug!(url = %url, "Commerce POST");

        let resp = self
            .http
            .post(&url)
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| StorebotError::Tool(format!("Request to {path} failed: {e}")))?;

        Self::read_body(path, resp).await
    }

    async fn read_body(path: &str, resp: reqwest::Response) -> StorebotResult<serde_json::Value> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StorebotError::Tool(format!(
                "API error {status} on {path}: {body}"
            )));
        }
        resp.json()
            .await
            .map_err(|e| StorebotError::Tool(format!("Invalid JSON from {path}: {e}")))
    }
}
