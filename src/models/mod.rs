//! Request and Response models for the proxy API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! extracting path parameters and serializing response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::PlayerPath;
pub use responses::{CleanResponse, ErrorResponse, HealthResponse, StatsResponse};
