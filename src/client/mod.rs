//! Client Module
//!
//! Calling layer in front of the cache: fetches from the upstream stats API
//! and offers every response to the cache.

mod fetcher;
mod stats_client;

pub use fetcher::{Fetcher, HttpFetcher, RawBody};
pub use stats_client::StatsClient;
