//! Insertion Order Module
//!
//! Tracks the order in which keys were inserted to pick eviction victims.

use std::collections::VecDeque;

// == Insertion Order ==
/// FIFO queue of keys, oldest at the front.
///
/// Each pushed key gets a stamp that the owning entry remembers. When an
/// entry leaves the cache by any path other than `pop_oldest` its slot is
/// left in place and only counted as stale; the owner recognises the
/// mismatch when the slot is popped. `compact` drops stale slots in bulk.
#[derive(Debug)]
pub(crate) struct InsertionOrder<K> {
    slots: VecDeque<(K, u64)>,
    next_stamp: u64,
    stale: usize,
}

impl<K> InsertionOrder<K> {
    pub(crate) fn new() -> Self {
        Self {
            slots: VecDeque::new(),
            next_stamp: 0,
            stale: 0,
        }
    }

    // == Push ==
    /// Appends a key as the newest slot and returns its stamp.
    pub(crate) fn push(&mut self, key: K) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.slots.push_back((key, stamp));
        stamp
    }

    // == Pop Oldest ==
    /// Removes and returns the oldest slot, stale or not.
    pub(crate) fn pop_oldest(&mut self) -> Option<(K, u64)> {
        self.slots.pop_front()
    }

    /// Records that one queued slot no longer has a live entry.
    pub(crate) fn mark_stale(&mut self) {
        self.stale += 1;
    }

    /// Records that a stale slot was popped.
    pub(crate) fn release_stale(&mut self) {
        self.stale = self.stale.saturating_sub(1);
    }

    pub(crate) fn stale(&self) -> usize {
        self.stale
    }

    // == Compact ==
    /// Drops every slot for which `is_live` returns false.
    pub(crate) fn compact(&mut self, mut is_live: impl FnMut(&K, u64) -> bool) {
        self.slots.retain(|(key, stamp)| is_live(key, *stamp));
        self.stale = 0;
    }

    /// Number of queued slots, stale ones included.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots that still belong to a live entry.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.stale
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.stale = 0;
    }
}
