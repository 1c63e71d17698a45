//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Reasons a cache operation was refused.
///
/// `CacheStore::set` swallows these; `CacheStore::try_set` reports them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Value is larger than the per-item limit
    #[error("item of {size} bytes exceeds the per-item limit of {limit} bytes")]
    ItemTooLarge { size: usize, limit: usize },

    /// Value is larger than the whole cache
    #[error("item of {size} bytes exceeds the total capacity of {capacity} bytes")]
    ExceedsCapacity { size: usize, capacity: usize },

    /// Cache was built with a total capacity of zero
    #[error("cache has zero capacity")]
    ZeroCapacity,

    /// Configuration could not be loaded
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
