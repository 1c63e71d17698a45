//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with a FIFO insertion-order
//! queue, a running byte total and lazy expiry.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::cache::order::InsertionOrder;
use crate::cache::{CacheEntry, CacheKey, CacheStats};
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Fixed-capacity byte cache.
///
/// Holds at most `max_total_size` bytes and refuses any single value larger
/// than `max_item_size`. When a new value does not fit, the oldest inserted
/// entries are evicted until it does. Expired entries keep their bytes until
/// they are read, purged, or evicted.
///
/// The store is single-threaded; wrap it in a [`crate::SharedCache`] to share it.
#[derive(Debug)]
pub struct CacheStore<K = CacheKey, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry>,
    /// Insertion order used to pick eviction victims
    order: InsertionOrder<K>,
    /// Sum of `size` over all entries
    current_size: usize,
    max_total_size: usize,
    max_item_size: usize,
    /// Performance statistics
    stats: CacheStats,
    clock: C,
}

impl<K> CacheStore<K, SystemClock>
where
    K: Eq + Hash + Clone + Debug,
{
    // == Constructor ==
    /// Creates an empty cache driven by the wall clock.
    ///
    /// # Arguments
    /// * `max_total_size` - Total byte budget; zero means nothing is ever stored
    /// * `max_item_size` - Largest value, in bytes, the cache will accept
    pub fn new(max_total_size: usize, max_item_size: usize) -> Self {
        Self::with_clock(max_total_size, max_item_size, SystemClock)
    }

    /// Creates an empty cache sized from `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_total_size, config.max_item_size)
    }
}

impl<K, C> CacheStore<K, C>
where
    K: Eq + Hash + Clone + Debug,
    C: Clock,
{
    /// Creates an empty cache that reads time from `clock`.
    pub fn with_clock(max_total_size: usize, max_item_size: usize, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            current_size: 0,
            max_total_size,
            max_item_size,
            stats: CacheStats::new(),
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key` until `expires_at`.
    ///
    /// Values that can never fit are dropped silently; use
    /// [`CacheStore::try_set`] to learn why.
    pub fn set(&mut self, key: K, value: impl Into<Arc<[u8]>>, expires_at: DateTime<Utc>) {
        let _ = self.try_set(key, value, expires_at);
    }

    /// Stores `value` under `key` until `expires_at`, reporting refusals.
    ///
    /// Overwriting a key keeps its original position in the eviction queue.
    /// On refusal the cache is left untouched, including any previous value
    /// stored under `key`.
    pub fn try_set(
        &mut self,
        key: K,
        value: impl Into<Arc<[u8]>>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let value = value.into();
        let item_size = value.len();

        if let Err(err) = self.check_admission(item_size) {
            self.stats.record_rejection();
            debug!(?key, item_size, %err, "Rejected cache item");
            return Err(err);
        }

        // The replaced entry's bytes are released now, but its slot stays queued
        let mut kept_stamp = self.entries.remove(&key).map(|old| {
            self.current_size -= old.size;
            old.stamp
        });

        while self.current_size + item_size > self.max_total_size {
            let Some((victim, stamp)) = self.order.pop_oldest() else {
                break;
            };
            if kept_stamp == Some(stamp) && victim == key {
                kept_stamp = None;
                continue;
            }
            self.evict(&victim, stamp);
        }

        let stamp = match kept_stamp {
            Some(stamp) => stamp,
            None => self.order.push(key.clone()),
        };
        self.current_size += item_size;
        self.entries.insert(key, CacheEntry::new(value, expires_at, stamp));

        debug_assert!(self.current_size <= self.max_total_size);
        Ok(())
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// Returns `None` if the key is absent or its entry has expired. Expired
    /// entries are removed on discovery. The returned bytes are never
    /// modified by later writes to the same key.
    pub fn get<Q>(&mut self, key: &Q) -> Option<Arc<[u8]>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();

        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            trace!("Cache miss");
            return None;
        };

        if entry.is_expired_at(now) {
            self.reclaim(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            trace!("Cache miss on expired entry");
            return None;
        }

        let value = Arc::clone(&entry.value);
        self.stats.record_hit();
        trace!("Cache hit");
        Some(value)
    }

    // == Remove ==
    /// Removes an entry by key, returning whether one was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.reclaim(key).is_some()
    }

    // == Purge Expired ==
    /// Removes every expired entry and returns how many were removed.
    ///
    /// Never called by the cache itself.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.reclaim(key);
            self.stats.record_expiration();
        }

        if !expired.is_empty() {
            debug!(count = expired.len(), "Purged expired entries");
        }
        expired.len()
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.current_size = 0;
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_totals(self.entries.len(), self.current_size);
        stats
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of bytes currently stored.
    pub fn size(&self) -> usize {
        self.current_size
    }

    pub fn max_total_size(&self) -> usize {
        self.max_total_size
    }

    pub fn max_item_size(&self) -> usize {
        self.max_item_size
    }

    /// Returns the number of keys queued for eviction.
    ///
    /// Always equal to [`CacheStore::len`] between calls.
    pub fn tracked_keys(&self) -> usize {
        self.order.live()
    }

    fn check_admission(&self, item_size: usize) -> Result<()> {
        if self.max_total_size == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        if item_size > self.max_item_size {
            return Err(CacheError::ItemTooLarge {
                size: item_size,
                limit: self.max_item_size,
            });
        }
        if item_size > self.max_total_size {
            return Err(CacheError::ExceedsCapacity {
                size: item_size,
                capacity: self.max_total_size,
            });
        }
        Ok(())
    }

    /// Evicts the entry owning a popped queue slot.
    fn evict(&mut self, key: &K, stamp: u64) {
        match self.entries.get(key) {
            Some(entry) if entry.stamp == stamp => {
                let size = entry.size;
                self.entries.remove(key);
                self.current_size -= size;
                self.stats.record_eviction();
                debug!(?key, size, "Evicted cache entry");
            }
            // Slot outlived its entry
            _ => self.order.release_stale(),
        }
    }

    /// Removes an entry outside the eviction path, leaving a stale slot.
    fn reclaim<Q>(&mut self, key: &Q) -> Option<CacheEntry>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key)?;
        self.current_size -= entry.size;
        self.order.mark_stale();
        self.compact_order();
        Some(entry)
    }

    fn compact_order(&mut self) {
        if self.order.stale() <= self.entries.len() {
            return;
        }
        let entries = &self.entries;
        self.order
            .compact(|key, stamp| entries.get(key).is_some_and(|e| e.stamp == stamp));
        debug_assert_eq!(self.order.len(), self.entries.len());
    }
}
