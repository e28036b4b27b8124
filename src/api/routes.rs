//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    avatar_handler, clean_handler, health_handler, player_handler, proxy_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /v1/players/:ign` - Player stats, name-matched against the cache
/// - `GET /v1/players/:ign/avatar` - Player avatar image, uncached
/// - `GET /stats` - Cache statistics
/// - `POST /cache/clean` - Remove stale cache entries
/// - `GET /health` - Health check endpoint
/// - anything else - forwarded upstream when it is a `GET /v1/...`
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/v1/players/:ign", get(player_handler))
        .route("/v1/players/:ign/avatar", get(avatar_handler))
        .route("/stats", get(stats_handler))
        .route("/cache/clean", post(clean_handler))
        .route("/health", get(health_handler))
        .fallback(proxy_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, ResponseCache};
    use crate::client::{Fetcher, StatsClient};
    use crate::error::{Result, StatsError};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::util::ServiceExt;

    /// Knows one player, `Steve`; everything else is a 404 upstream.
    struct OnePlayerFetcher;

    #[async_trait]
    impl Fetcher for OnePlayerFetcher {
        async fn fetch(&self, endpoint: &str) -> Result<Value> {
            match endpoint {
                "/v1/players/Steve" => Ok(json!({"name": "Steve", "kills": 12})),
                "/v1/servers" => Ok(json!([{"name": "lobby"}])),
                _ => Err(StatsError::Upstream {
                    status: 404,
                    endpoint: endpoint.to_string(),
                }),
            }
        }
    }

    fn create_test_app() -> Router {
        let cache = ResponseCache::new(MemoryStore::new(), CacheConfig::default()).unwrap();
        let client = StatsClient::new(Arc::new(Mutex::new(cache)), Arc::new(OnePlayerFetcher));
        create_router(AppState::new(client))
    }

    async fn status_of(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of(create_test_app(), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(status_of(create_test_app(), "/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_player_endpoint() {
        assert_eq!(status_of(create_test_app(), "/v1/players/Steve").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_player_not_found_upstream() {
        assert_eq!(
            status_of(create_test_app(), "/v1/players/Nobody").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_proxied_endpoint() {
        assert_eq!(status_of(create_test_app(), "/v1/servers").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(status_of(create_test_app(), "/nope").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clean_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/cache/clean")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
