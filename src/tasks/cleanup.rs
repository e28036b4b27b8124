//! Cache Clean Task
//!
//! Background task that periodically removes stale cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::ResponseCache;

/// Spawns a background task that periodically runs `clean` on the cache.
///
/// The task sleeps for the interval between runs and holds the cache lock
/// for the whole clean pass. Storage errors are logged and the next run
/// tries again.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(Mutex::new(ResponseCache::new(store, config)?));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    cache: Arc<Mutex<ResponseCache>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache clean task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let result = {
                let mut cache_guard = cache.lock().await;
                cache_guard.clean()
            };

            match result {
                Ok(0) => debug!("Cache clean: no stale entries found"),
                Ok(removed) => info!("Cache clean: removed {} stale entries", removed),
                Err(err) => warn!("Cache clean failed: {}", err),
            }
        }
    })
}
