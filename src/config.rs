//! Configuration Module
//!
//! Handles loading cache capacities from environment variables.

use std::env;

use crate::cache::MB;
use crate::error::{CacheError, Result};

/// Environment variable holding the total byte budget
pub const MAX_TOTAL_SIZE_VAR: &str = "CACHE_MAX_TOTAL_SIZE";

/// Environment variable holding the per-item byte limit
pub const MAX_ITEM_SIZE_VAR: &str = "CACHE_MAX_ITEM_SIZE";

const DEFAULT_MAX_TOTAL_SIZE: usize = 32 * MB;
const DEFAULT_MAX_ITEM_SIZE: usize = MB;

/// Cache capacity configuration.
///
/// Both values are raw byte counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Total number of bytes the cache may hold
    pub max_total_size: usize,
    /// Largest single value the cache will accept
    pub max_item_size: usize,
}

impl CacheConfig {
    /// Creates a config with explicit capacities.
    pub fn new(max_total_size: usize, max_item_size: usize) -> Self {
        Self {
            max_total_size,
            max_item_size,
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_TOTAL_SIZE` - Total byte budget (default: 32 MB)
    /// - `CACHE_MAX_ITEM_SIZE` - Per-item byte limit (default: 1 MB)
    pub fn from_env() -> Self {
        Self {
            max_total_size: read_size(MAX_TOTAL_SIZE_VAR, DEFAULT_MAX_TOTAL_SIZE)
                .unwrap_or(DEFAULT_MAX_TOTAL_SIZE),
            max_item_size: read_size(MAX_ITEM_SIZE_VAR, DEFAULT_MAX_ITEM_SIZE)
                .unwrap_or(DEFAULT_MAX_ITEM_SIZE),
        }
    }

    /// Like [`CacheConfig::from_env`], but reports values that are set and
    /// cannot be parsed instead of ignoring them.
    pub fn try_from_env() -> Result<Self> {
        Ok(Self {
            max_total_size: read_size(MAX_TOTAL_SIZE_VAR, DEFAULT_MAX_TOTAL_SIZE)?,
            max_item_size: read_size(MAX_ITEM_SIZE_VAR, DEFAULT_MAX_ITEM_SIZE)?,
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            max_item_size: DEFAULT_MAX_ITEM_SIZE,
        }
    }
}

fn read_size(var: &str, default: usize) -> Result<usize> {
    match env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            CacheError::InvalidConfig(format!("{var} must be a byte count, got {raw:?}"))
        }),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(_)) => Err(CacheError::InvalidConfig(format!(
            "{var} is not valid unicode"
        ))),
    }
}
