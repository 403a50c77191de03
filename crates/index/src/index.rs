//! Feature structure indexes
//!
//! An [`FsIndex`] keeps the records of its base type (and subtypes) in one of
//! three orders:
//! - Sorted: comparator order, equal keys ordered by id
//! - Set: comparator order, first record per key wins
//! - Bag: insertion order
//!
//! Sorted and set indexes insert by binary search, so the backing vector is
//! always in order and snapshots need no sorting.
//!
//! # Versioning
//!
//! Every successful mutation bumps `version`. The ordered snapshot handed to
//! cursors is materialized at most once per version and reused until the
//! next mutation, which is what makes repeated full traversals O(1) to start.

use crate::cursor::{FsCursor, SeekOrder};
use crate::definition::{IndexDefinition, IndexId, IndexKind};
use castor_core::{FeatureStructure, FsComparator, FsId, FsRef, TypeCapability};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Snapshot {
    version: u64,
    items: Arc<[FsRef]>,
}

/// A maintained, queryable collection of feature structures
#[derive(Debug)]
pub struct FsIndex {
    id: IndexId,
    definition: IndexDefinition,
    comparator: FsComparator,
    items: Vec<FsRef>,
    members: FxHashSet<FsId>,
    version: u64,
    snapshot: Mutex<Option<Snapshot>>,
}

impl FsIndex {
    /// Create an empty index
    ///
    /// The definition is assumed validated by the registry.
    pub fn new(id: IndexId, definition: IndexDefinition, types: Arc<dyn TypeCapability>) -> Self {
        let comparator = FsComparator::new(definition.keys.clone(), types);
        Self {
            id,
            definition,
            comparator,
            items: Vec::new(),
            members: FxHashSet::default(),
            version: 0,
            snapshot: Mutex::new(None),
        }
    }

    /// Registry handle
    pub fn id(&self) -> IndexId {
        self.id
    }

    /// Declaration this index was built from
    pub fn definition(&self) -> &IndexDefinition {
        &self.definition
    }

    /// Label
    pub fn label(&self) -> &str {
        &self.definition.label
    }

    /// Order kind
    pub fn kind(&self) -> IndexKind {
        self.definition.kind
    }

    /// Comparator of the stored order (empty keys for bags)
    pub fn comparator(&self) -> &FsComparator {
        &self.comparator
    }

    /// True for sorted/set indexes in begin-asc/end-desc order
    pub fn is_annotation_index(&self) -> bool {
        self.definition.is_annotation_ordered()
    }

    /// Mutation counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Membership by identity
    pub fn contains(&self, fs: &FeatureStructure) -> bool {
        self.members.contains(&fs.id())
    }

    fn locate(&self, fs: &FeatureStructure) -> std::result::Result<usize, usize> {
        self.items
            .binary_search_by(|probe| self.comparator.compare(probe, fs))
    }

    /// Add a record at its position
    ///
    /// Returns false without changing anything when the record is already
    /// present, or when a set index already holds a record with equal key.
    pub fn insert(&mut self, fs: FsRef) -> bool {
        if self.members.contains(&fs.id()) {
            return false;
        }
        match self.definition.kind {
            IndexKind::Bag => self.items.push(Arc::clone(&fs)),
            IndexKind::Sorted | IndexKind::Set => {
                let slot = match self.locate(&fs) {
                    Ok(slot) | Err(slot) => slot,
                };
                if self.definition.kind == IndexKind::Set && self.has_equal_key_near(slot, &fs) {
                    return false;
                }
                self.items.insert(slot, Arc::clone(&fs));
            }
        }
        self.members.insert(fs.id());
        self.version += 1;
        true
    }

    // Equal keys are adjacent, so only the neighbours of the slot can match.
    fn has_equal_key_near(&self, slot: usize, fs: &FeatureStructure) -> bool {
        let equal = |i: usize| {
            self.items
                .get(i)
                .map_or(false, |other| self.comparator.compare_keys(other, fs) == Ordering::Equal)
        };
        equal(slot) || (slot > 0 && equal(slot - 1))
    }

    /// Remove a record by identity; false if absent
    pub fn remove(&mut self, fs: &FeatureStructure) -> bool {
        if !self.members.remove(&fs.id()) {
            return false;
        }
        let slot = match self.definition.kind {
            IndexKind::Bag => self.items.iter().position(|x| x.id() == fs.id()),
            IndexKind::Sorted | IndexKind::Set => self.locate(fs).ok(),
        };
        if let Some(slot) = slot {
            self.items.remove(slot);
        }
        self.version += 1;
        true
    }

    /// Drop every record
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.members.clear();
        self.version += 1;
    }

    /// Ordered contents, shared until the next mutation
    pub fn snapshot(&self) -> Arc<[FsRef]> {
        let mut cached = self.snapshot.lock();
        if let Some(snapshot) = cached.as_ref() {
            if snapshot.version == self.version {
                return Arc::clone(&snapshot.items);
            }
        }
        let items: Arc<[FsRef]> = self.items.clone().into();
        *cached = Some(Snapshot {
            version: self.version,
            items: Arc::clone(&items),
        });
        items
    }

    /// Seek strategy matching the stored order
    pub fn seek_order(&self) -> SeekOrder {
        match self.definition.kind {
            IndexKind::Bag => SeekOrder::Identity,
            IndexKind::Sorted | IndexKind::Set => SeekOrder::Keyed(self.comparator.clone()),
        }
    }

    /// Cursor over the full current order
    pub fn cursor(&self) -> FsCursor {
        FsCursor::new(self.snapshot(), self.seek_order())
    }
}
