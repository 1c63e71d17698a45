//! Byte Cache - A fixed-capacity in-memory cache for byte payloads
//!
//! Enforces a total byte budget, a per-item size limit and absolute expiry.
//! Eviction is FIFO by insertion order; expired entries are reclaimed lazily.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod shared;

pub use cache::{CacheKey, CacheStats, CacheStore, KB, MB};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use shared::SharedCache;
