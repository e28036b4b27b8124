//! API Module
//!
//! HTTP handlers and routing for the caching proxy.
//!
//! # Endpoints
//! - `GET /v1/players/:ign` - Player stats, served from the cache while fresh
//! - `GET /v1/...` - Any other upstream endpoint, fetched and cached
//! - `GET /stats` - Cache statistics
//! - `POST /cache/clean` - Remove stale cache entries now
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
