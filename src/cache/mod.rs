//! Cache Module
//!
//! Provides a byte-budgeted cache with FIFO eviction and lazy expiry.

mod entry;
mod order;
mod stats;
mod store;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// One kilobyte in bytes
pub const KB: usize = 1024;

/// One megabyte in bytes
pub const MB: usize = 1024 * KB;

/// Default key type: an integer fingerprint of whatever is being cached
pub type CacheKey = u64;
