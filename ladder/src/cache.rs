//! Caller-owned memo for formatted graph stops.
//!
//! A row's stop depends only on `(total_size, max)`, and between two book
//! updates most levels keep both. The cache is bounded; when full it is
//! cleared wholesale rather than tracking recency.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

/// Default number of distinct `(total_size, max)` pairs retained.
const DEFAULT_CAPACITY: usize = 4096;

/// Bit patterns, so `-0.0` and `0.0` stay distinct keys.
type StopKey = (u64, u64);

/// Memoized graph-stop strings keyed on `(total_size, max)`.
#[derive(Debug)]
pub struct GraphStopCache {
    entries: HashMap<StopKey, String>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for GraphStopCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl GraphStopCache {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Stop for `(total_size, max)`, computing it from the fill ratio on a miss.
    pub fn stop<F>(&mut self, total_size: f64, max: f64, compute: F) -> String
    where
        F: FnOnce(f64) -> String,
    {
        let key = (total_size.to_bits(), max.to_bits());

        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            debug!(
                entries = self.entries.len(),
                hits = self.hits,
                misses = self.misses,
                "graph stop cache full, clearing"
            );
            self.entries.clear();
        }

        match self.entries.entry(key) {
            Entry::Occupied(e) => {
                self.hits += 1;
                e.get().clone()
            }
            Entry::Vacant(e) => {
                self.misses += 1;
                e.insert(compute(total_size / max)).clone()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to compute a stop.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
