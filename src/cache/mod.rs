//! Cache Module
//!
//! Bounded, time-windowed cache of API responses persisted one entry per line.

mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{is_empty_payload, payload_text, CacheEntry, SEPARATOR};
pub use stats::CacheStats;
pub use store::{CacheConfig, ResponseCache};
