//! statcache - A caching proxy for a game-statistics API
//!
//! Keeps fetched responses in a bounded, time-windowed cache persisted one
//! entry per line, so repeated lookups within the freshness window skip the
//! upstream call.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheConfig, ResponseCache};
pub use client::{Fetcher, HttpFetcher, RawBody, StatsClient};
pub use config::Config;
pub use error::{Result, StatsError};
pub use tasks::spawn_cleanup_task;
