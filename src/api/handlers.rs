//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::cache::ResponseCache;
use crate::client::{HttpFetcher, StatsClient};
use crate::config::Config;
use crate::error::{Result, StatsError};
use crate::models::{CleanResponse, HealthResponse, PlayerPath, StatsResponse};
use crate::storage::FileStore;

/// Media type used when upstream sends none.
const DEFAULT_BINARY_TYPE: &str = "application/octet-stream";

/// Prefix of upstream API paths the proxy forwards.
const UPSTREAM_PREFIX: &str = "/v1/";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Caching upstream client
    pub client: StatsClient,
}

impl AppState {
    /// Creates a new AppState around a client.
    pub fn new(client: StatsClient) -> Self {
        Self { client }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the file-backed cache and an HTTP fetcher for the upstream API.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = FileStore::open(&config.cache_path)?;
        let cache = ResponseCache::new(store, config.cache_config())?;
        let fetcher = HttpFetcher::new(config.api_base_url.clone(), config.auth_key.clone());

        Ok(Self::new(StatsClient::new(
            Arc::new(Mutex::new(cache)),
            Arc::new(fetcher),
        )))
    }

    /// Shared cache handle.
    pub fn cache(&self) -> Arc<Mutex<ResponseCache>> {
        self.client.cache().clone()
    }
}

/// Handler for GET /v1/players/:ign
///
/// Returns player stats, from the cache when a fresh entry matches the name.
pub async fn player_handler(
    State(state): State<AppState>,
    Path(req): Path<PlayerPath>,
) -> Result<Json<Value>> {
    if let Some(error_msg) = req.validate() {
        return Err(StatsError::InvalidRequest(error_msg));
    }

    let stats = state.client.player(&req.ign).await?;
    Ok(Json(stats))
}

/// Handler for GET /v1/players/:ign/avatar
///
/// Passes the upstream image through uncached, keeping its content type.
pub async fn avatar_handler(
    State(state): State<AppState>,
    Path(req): Path<PlayerPath>,
) -> Result<Response> {
    if let Some(error_msg) = req.validate() {
        return Err(StatsError::InvalidRequest(error_msg));
    }

    let avatar = state.client.player_avatar(&req.ign).await?;
    let content_type = avatar
        .content_type
        .unwrap_or_else(|| DEFAULT_BINARY_TYPE.to_string());

    Ok(([(header::CONTENT_TYPE, content_type)], avatar.bytes).into_response())
}

/// Fallback handler: forwards any other `GET /v1/...` request upstream,
/// query string included, and caches the response.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Json<Value>> {
    if method != Method::GET || !uri.path().starts_with(UPSTREAM_PREFIX) {
        return Err(StatsError::NotFound(format!("{} {}", method, uri.path())));
    }

    let endpoint = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let data = state.client.fetch_cached(endpoint).await?;
    Ok(Json(data))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.client.cache().lock().await.stats();
    Json(StatsResponse::new(stats))
}

/// Handler for POST /cache/clean
///
/// Runs a clean pass immediately.
pub async fn clean_handler(State(state): State<AppState>) -> Result<Json<CleanResponse>> {
    let handle = state.cache();
    let mut cache = handle.lock().await;
    let removed = cache.clean()?;
    let remaining = cache.len()?;

    Ok(Json(CleanResponse { removed, remaining }))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::client::Fetcher;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;

    /// Echoes the requested endpoint back as the payload.
    struct EchoFetcher;

    #[async_trait]
    impl Fetcher for EchoFetcher {
        async fn fetch(&self, endpoint: &str) -> Result<Value> {
            let name = endpoint.rsplit('/').next().unwrap_or_default();
            Ok(json!({ "name": name, "endpoint": endpoint }))
        }
    }

    fn test_state() -> (AppState, MemoryStore) {
        let store = MemoryStore::new();
        let cache = ResponseCache::new(store.clone(), CacheConfig::default()).unwrap();
        let client = StatsClient::new(Arc::new(Mutex::new(cache)), Arc::new(EchoFetcher));
        (AppState::new(client), store)
    }

    #[tokio::test]
    async fn test_player_handler() {
        let (state, store) = test_state();

        let path = PlayerPath {
            ign: "Steve".to_string(),
        };
        let response = player_handler(State(state), Path(path)).await.unwrap();

        assert_eq!(response["name"], "Steve");
        assert_eq!(store.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_player_handler_invalid_name() {
        let (state, _) = test_state();

        let path = PlayerPath {
            ign: "".to_string(),
        };
        let result = player_handler(State(state), Path(path)).await;
        assert!(matches!(result, Err(StatsError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_proxy_handler_keeps_query() {
        let (state, _) = test_state();

        let uri: Uri = "/v1/leaderboard?type=game&limit=10".parse().unwrap();
        let response = proxy_handler(State(state), Method::GET, uri).await.unwrap();

        assert_eq!(response["endpoint"], "/v1/leaderboard?type=game&limit=10");
    }

    #[tokio::test]
    async fn test_proxy_handler_rejects_unknown_paths() {
        let (state, _) = test_state();

        let uri: Uri = "/admin".parse().unwrap();
        let result = proxy_handler(State(state.clone()), Method::GET, uri).await;
        assert!(matches!(result, Err(StatsError::NotFound(_))));

        let uri: Uri = "/v1/guilds/x".parse().unwrap();
        let result = proxy_handler(State(state), Method::DELETE, uri).await;
        assert!(matches!(result, Err(StatsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_avatar_handler_needs_binary_fetcher() {
        let (state, _) = test_state();

        let path = PlayerPath {
            ign: "Steve".to_string(),
        };
        let result = avatar_handler(State(state), Path(path)).await;
        assert!(matches!(result, Err(StatsError::Internal(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (state, _) = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.stats.hits, 0);
        assert_eq!(response.stats.misses, 0);
    }

    #[tokio::test]
    async fn test_clean_handler() {
        let (state, _) = test_state();

        let path = PlayerPath {
            ign: "Alex".to_string(),
        };
        let stats = player_handler(State(state.clone()), Path(path)).await.unwrap();
        assert_eq!(stats["name"], "Alex");

        let response = clean_handler(State(state)).await.unwrap();
        assert_eq!(response.removed, 0);
        assert_eq!(response.remaining, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
