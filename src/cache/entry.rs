//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with absolute expiry.

use std::sync::Arc;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A stored value together with its expiry and accounted size.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    /// The stored bytes, shared with callers of `get`
    pub(crate) value: Arc<[u8]>,
    /// Instant at which the entry stops being served
    pub(crate) expires_at: DateTime<Utc>,
    /// Byte count charged against the cache budget, fixed at insertion
    pub(crate) size: usize,
    /// Slot in the insertion-order queue
    pub(crate) stamp: u64,
}

impl CacheEntry {
    pub(crate) fn new(value: Arc<[u8]>, expires_at: DateTime<Utc>, stamp: u64) -> Self {
        let size = value.len();
        Self {
            value,
            expires_at,
            size,
            stamp,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now`.
    ///
    /// Expiry is inclusive: an entry read exactly at `expires_at` is expired.
    pub(crate) fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 22, 17, 30, 0).unwrap()
    }

    #[test]
    fn test_entry_records_size() {
        let entry = CacheEntry::new(Arc::from(&b"hello world"[..]), start(), 0);
        assert_eq!(entry.size, 11);
        assert_eq!(&*entry.value, b"hello world");
    }

    #[test]
    fn test_entry_expiration_boundary() {
        let entry = CacheEntry::new(Arc::from(Vec::<u8>::new()), start(), 0);

        assert!(!entry.is_expired_at(start() - Duration::milliseconds(1)));
        assert!(entry.is_expired_at(start()), "Entry should be expired at boundary");
        assert!(entry.is_expired_at(start() + Duration::seconds(1)));
    }
}
