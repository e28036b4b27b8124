//! Configuration Module
//!
//! Handles loading and managing proxy and cache configuration from environment variables.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the line-oriented cache file
    pub cache_path: PathBuf,
    /// How long a cached response stays usable, in minutes
    pub freshness_minutes: u64,
    /// Maximum number of entries the cache file can hold
    pub cache_capacity: usize,
    /// Whether responses are written to the cache at all
    pub cache_enabled: bool,
    /// Base URL of the upstream stats API
    pub api_base_url: String,
    /// Optional upstream auth key
    pub auth_key: Option<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Background clean task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PATH` - Cache file location (default: cache.txt)
    /// - `FRESHNESS_MINUTES` - Freshness window in minutes (default: 15)
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 50)
    /// - `CACHE_ENABLED` - `false`/`0`/`no` disables writes (default: true)
    /// - `API_BASE_URL` - Upstream API (default: http://apiv2.nethergames.org)
    /// - `AUTH_KEY` - Upstream auth key, else first line of `AUTH_KEY_FILE`
    ///   (default file: auth_key.txt, optional)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Clean frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_path: env::var("CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_path),
            freshness_minutes: parse_var("FRESHNESS_MINUTES").unwrap_or(defaults.freshness_minutes),
            cache_capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            cache_enabled: env::var("CACHE_ENABLED")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.cache_enabled),
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            auth_key: load_auth_key(),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Builds the immutable cache configuration from these settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            freshness_window: Duration::from_secs(self.freshness_minutes * 60),
            capacity: self.cache_capacity,
            enabled: self.cache_enabled,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from("cache.txt"),
            freshness_minutes: 15,
            cache_capacity: 50,
            cache_enabled: true,
            api_base_url: "http://apiv2.nethergames.org".to_string(),
            auth_key: None,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

/// `AUTH_KEY` wins over the key file; a missing or blank file means no key.
fn load_auth_key() -> Option<String> {
    if let Ok(key) = env::var("AUTH_KEY") {
        let key = key.trim().to_string();
        return (!key.is_empty()).then_some(key);
    }

    let path = env::var("AUTH_KEY_FILE").unwrap_or_else(|_| "auth_key.txt".to_string());
    fs::read_to_string(path)
        .ok()
        .and_then(|content| content.lines().next().map(|l| l.trim().to_string()))
        .filter(|key| !key.is_empty())
}
