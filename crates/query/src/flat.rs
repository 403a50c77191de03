//! Flattening cache
//!
//! Materialized query results keyed by `(index, shape)` and stamped with the
//! index version they were computed from. A stale stamp means the index has
//! mutated since, so the entry is recomputed and replaced.

use crate::subiterator::QueryShape;
use castor_core::FsRef;
use castor_index::{FsIndex, IndexId};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{trace, warn};

/// Default entry bound
pub const DEFAULT_MAX_ENTRIES: usize = 256;

#[derive(Debug)]
struct FlatEntry {
    version: u64,
    items: Arc<[FsRef]>,
}

/// Per-store cache of flattened query results
#[derive(Debug)]
pub struct FlatCache {
    enabled: bool,
    max_entries: usize,
    entries: Mutex<FxHashMap<(IndexId, QueryShape), FlatEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for FlatCache {
    fn default() -> Self {
        Self::new(true, DEFAULT_MAX_ENTRIES)
    }
}

impl FlatCache {
    /// Create a cache; a disabled cache always recomputes
    pub fn new(enabled: bool, max_entries: usize) -> Self {
        Self {
            enabled,
            max_entries: max_entries.max(1),
            entries: Mutex::new(FxHashMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache that never stores anything
    pub fn disabled() -> Self {
        Self::new(false, DEFAULT_MAX_ENTRIES)
    }

    /// True if results are kept
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Lookups answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that had to compute
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Cached result for `shape` over the current version of `index`
    ///
    /// `compute` runs on a miss or when the stored version is stale.
    pub fn get_or_compute<F>(&self, index: &FsIndex, shape: &QueryShape, compute: F) -> Arc<[FsRef]>
    where
        F: FnOnce() -> Vec<FsRef>,
    {
        if !self.enabled {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return compute().into();
        }

        let version = index.version();
        let key = (index.id(), shape.clone());
        if let Some(entry) = self.entries.lock().get(&key) {
            if entry.version == version {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(target: "castor::query", index = %index.id(), version, "Flat cache hit");
                return Arc::clone(&entry.items);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let items: Arc<[FsRef]> = compute().into();
        trace!(
            target: "castor::query",
            index = %index.id(),
            version,
            len = items.len(),
            "Flat cache miss"
        );

        let mut entries = self.entries.lock();
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let id = index.id();
            entries.retain(|(owner, _), entry| *owner != id || entry.version == version);
            if entries.len() >= self.max_entries {
                warn!(
                    target: "castor::query",
                    max_entries = self.max_entries,
                    "Flat cache full, clearing"
                );
                entries.clear();
            }
        }
        entries.insert(
            key,
            FlatEntry {
                version,
                items: Arc::clone(&items),
            },
        );
        items
    }
}
