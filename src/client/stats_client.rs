//! Stats client
//!
//! Combines a fetcher with a shared response cache. Player stats are served
//! from the cache while fresh; every other endpoint is always fetched and
//! the response offered to the cache.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{Fetcher, RawBody};
use crate::cache::ResponseCache;
use crate::error::Result;

/// Endpoint used to check that the upstream API is reachable.
const SERVERS_ENDPOINT: &str = "/v1/servers";

// == Stats Client ==
/// Upstream client with response caching.
///
/// The cache lock is held for one whole cache operation and never across a
/// network call. Cache operations do blocking file I/O on the async worker;
/// the store is a local file bounded to `capacity` lines, so each call is
/// short.
#[derive(Clone)]
pub struct StatsClient {
    cache: Arc<Mutex<ResponseCache>>,
    fetcher: Arc<dyn Fetcher>,
}

impl StatsClient {
    pub fn new(cache: Arc<Mutex<ResponseCache>>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { cache, fetcher }
    }

    /// Shared cache handle.
    pub fn cache(&self) -> &Arc<Mutex<ResponseCache>> {
        &self.cache
    }

    // == Player ==
    /// Player stats by in-game name, from the cache when a fresh entry with
    /// that name exists.
    pub async fn player(&self, ign: &str) -> Result<Value> {
        let cached = self.cache.lock().await.lookup(ign, true);
        match cached {
            Ok(Some(hit)) => {
                debug!("Cache hit for player {}", ign);
                return Ok(hit);
            }
            Ok(None) => debug!("Cache miss for player {}", ign),
            Err(err) => warn!("Cache lookup failed for player {}: {}", ign, err),
        }

        self.fetch_cached(&format!("/v1/players/{}", ign)).await
    }

    // == Fetch Cached ==
    /// Fetches `endpoint` and offers the response to the cache.
    ///
    /// The fresh response is returned whether or not it was written. Cache
    /// storage failures are logged, not returned: the caller still gets data.
    pub async fn fetch_cached(&self, endpoint: &str) -> Result<Value> {
        let data = self.fetcher.fetch(endpoint).await?;

        let persisted = self.cache.lock().await.persist(&data);
        match persisted {
            Ok(true) => debug!("Cached response for {}", endpoint),
            Ok(false) => debug!("Response for {} not cached", endpoint),
            Err(err) => warn!("Failed to cache response for {}: {}", endpoint, err),
        }

        Ok(data)
    }

    // == Player Avatar ==
    /// The player's avatar image, fetched as raw bytes and never cached.
    pub async fn player_avatar(&self, ign: &str) -> Result<RawBody> {
        self.fetcher
            .fetch_bytes(&format!("/v1/players/{}/avatar", ign))
            .await
    }

    // == Test Connection ==
    /// Fetches the server list, uncached.
    pub async fn test_connection(&self) -> Result<Value> {
        self.fetcher.fetch(SERVERS_ENDPOINT).await
    }
}
