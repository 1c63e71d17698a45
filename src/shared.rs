//! Shared Cache
//!
//! Thread-safe handle around a [`CacheStore`].

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::cache::{CacheKey, CacheStats, CacheStore};
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;

/// Cloneable, thread-safe cache handle.
///
/// Every clone points at the same store. One exclusive lock guards the
/// entries, the eviction queue and the byte total together, so no caller ever
/// sees a byte total that disagrees with the entries. Reads take the same
/// lock because they may reclaim an expired entry.
pub struct SharedCache<K = CacheKey, C = SystemClock> {
    inner: Arc<Mutex<CacheStore<K, C>>>,
}

impl<K, C> Clone for SharedCache<K, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> SharedCache<K, SystemClock>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new(max_total_size: usize, max_item_size: usize) -> Self {
        Self::from_store(CacheStore::new(max_total_size, max_item_size))
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::from_store(CacheStore::from_config(config))
    }
}

impl<K, C> SharedCache<K, C>
where
    K: Eq + Hash + Clone + Debug,
    C: Clock,
{
    /// Creates a shared cache that reads time from `clock`.
    ///
    /// The clock cannot be swapped once the cache is shared.
    pub fn with_clock(max_total_size: usize, max_item_size: usize, clock: C) -> Self {
        Self::from_store(CacheStore::with_clock(max_total_size, max_item_size, clock))
    }

    pub fn from_store(store: CacheStore<K, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// See [`CacheStore::set`].
    pub fn set(&self, key: K, value: impl Into<Arc<[u8]>>, expires_at: DateTime<Utc>) {
        self.inner.lock().set(key, value, expires_at);
    }

    /// See [`CacheStore::try_set`].
    pub fn try_set(
        &self,
        key: K,
        value: impl Into<Arc<[u8]>>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.inner.lock().try_set(key, value, expires_at)
    }

    /// See [`CacheStore::get`].
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<[u8]>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().get(key)
    }

    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    pub fn purge_expired(&self) -> usize {
        self.inner.lock().purge_expired()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the number of bytes currently stored.
    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }
}

impl<K, C> Debug for SharedCache<K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::KB;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone};
    use std::thread;

    #[test]
    fn test_clones_share_one_store() {
        let cache: SharedCache = SharedCache::new(KB, KB);
        let other = cache.clone();

        cache.set(1, b"shared".to_vec(), Utc::now() + Duration::minutes(1));

        assert_eq!(&*other.get(&1).unwrap(), b"shared");
        assert_eq!(other.len(), 1);
        assert_eq!(other.size(), 6);
    }

    #[test]
    fn test_concurrent_writers_respect_budget() {
        let cache: SharedCache = SharedCache::new(10 * KB, KB);
        let expires_at = Utc::now() + Duration::hours(1);

        thread::scope(|scope| {
            for worker in 0..4u64 {
                let cache = cache.clone();
                scope.spawn(move || {
                    for i in 0..200u64 {
                        let key = worker * 1_000 + i;
                        cache.set(key, vec![worker as u8; 512], expires_at);
                        let _ = cache.get(&key);
                        assert!(cache.size() <= 10 * KB);
                    }
                });
            }
        });

        let stats = cache.stats();
        assert_eq!(stats.total_bytes, 10 * KB);
        assert_eq!(stats.total_entries, 20);
        assert_eq!(stats.evictions, 4 * 200 - 20);
    }

    #[test]
    fn test_shared_expiry_with_manual_clock() {
        let start = Utc.with_ymd_and_hms(2023, 1, 22, 17, 30, 0).unwrap();
        let clock = ManualClock::new(start);
        let cache: SharedCache<u64, ManualClock> =
            SharedCache::with_clock(KB, KB, clock.clone());

        cache.set(1, b"v".to_vec(), start + Duration::seconds(1));
        assert!(cache.get(&1).is_some());

        clock.advance(Duration::seconds(2));
        assert!(cache.get(&1).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_try_set_reports_rejection() {
        let cache: SharedCache = SharedCache::from_config(&CacheConfig::new(KB, 16));

        let result = cache.try_set(1, vec![0u8; 17], Utc::now() + Duration::minutes(1));

        assert!(result.is_err());
        assert_eq!(cache.stats().rejections, 1);
    }
}
