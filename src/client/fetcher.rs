//! Upstream fetcher
//!
//! Performs the actual API call. The cache never calls this itself.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, StatsError};

// == Fetcher ==
/// Source of fresh API data.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `endpoint` (path plus optional query, e.g. `/v1/players/x`)
    /// and returns the decoded JSON body.
    async fn fetch(&self, endpoint: &str) -> Result<Value>;

    /// Fetches `endpoint` as raw bytes, for non-JSON resources such as
    /// player avatars.
    async fn fetch_bytes(&self, endpoint: &str) -> Result<RawBody> {
        Err(StatsError::Internal(format!(
            "binary fetch not supported for {}",
            endpoint
        )))
    }
}

// == Raw Body ==
/// Undecoded upstream body with its media type.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBody {
    /// Upstream `Content-Type`, when sent
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// == HTTP Fetcher ==
/// Fetcher backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    auth_key: Option<String>,
}

impl HttpFetcher {
    /// Creates a fetcher for `base_url`. The auth key, when present, is sent
    /// as `Authorization: TOK:<key>`.
    pub fn new(base_url: impl Into<String>, auth_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends an authenticated GET and maps non-2xx statuses to `Upstream`.
    async fn get(&self, endpoint: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.auth_key {
            request = request.header(AUTHORIZATION, format!("TOK:{}", key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Upstream returned {} for {}", status, endpoint);
            return Err(StatsError::Upstream {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, endpoint: &str) -> Result<Value> {
        Ok(self.get(endpoint).await?.json::<Value>().await?)
    }

    async fn fetch_bytes(&self, endpoint: &str) -> Result<RawBody> {
        let response = self.get(endpoint).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        Ok(RawBody {
            content_type,
            bytes: response.bytes().await?.to_vec(),
        })
    }
}
