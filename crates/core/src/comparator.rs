//! Comparator / key model
//!
//! Every sorted traversal and every binary-search seek in castor uses an
//! [`FsComparator`]. A comparator is a list of [`SortKey`] components
//! followed by an implicit identifier tie-break, so the order is total:
//!
//! - annotation order: `begin` ascending, `end` descending (longer spans
//!   first), then type priority rank when requested, then id
//! - feature order: declared features in their declared direction, then id
//!
//! `compare_keys` stops before the id and is what seeks and set-index
//! duplicate detection use; `compare` includes it.

use crate::record::FeatureStructure;
use crate::type_system::TypeCapability;
use crate::value::FeatureValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Direction of a feature key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Smallest value first
    #[serde(alias = "asc")]
    Ascending,
    /// Largest value first
    #[serde(alias = "desc")]
    Descending,
}

impl Direction {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// One component of a sort key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Span begin, ascending
    Begin,
    /// Span end, descending
    EndDescending,
    /// Type priority rank, ascending
    TypePriority,
    /// Named feature value
    Feature {
        /// Feature name
        name: String,
        /// Sort direction
        direction: Direction,
    },
}

/// Total order over feature structures
#[derive(Debug, Clone)]
pub struct FsComparator {
    keys: Arc<[SortKey]>,
    types: Arc<dyn TypeCapability>,
}

impl FsComparator {
    /// Comparator over explicit key components
    pub fn new(keys: Vec<SortKey>, types: Arc<dyn TypeCapability>) -> Self {
        Self {
            keys: keys.into(),
            types,
        }
    }

    /// Annotation order, optionally with type priority
    pub fn annotation(types: Arc<dyn TypeCapability>, type_priority: bool) -> Self {
        let mut keys = vec![SortKey::Begin, SortKey::EndDescending];
        if type_priority {
            keys.push(SortKey::TypePriority);
        }
        Self::new(keys, types)
    }

    /// Same keys with type priority appended (no-op if already present)
    pub fn with_type_priority(&self) -> Self {
        if self.has_type_priority() {
            return self.clone();
        }
        let mut keys = self.keys.to_vec();
        keys.push(SortKey::TypePriority);
        Self::new(keys, Arc::clone(&self.types))
    }

    /// True if the key list ranks by type priority
    pub fn has_type_priority(&self) -> bool {
        self.keys.contains(&SortKey::TypePriority)
    }

    /// Key components, without the implicit id tie-break
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Type capability used for priority ranks
    pub fn types(&self) -> &Arc<dyn TypeCapability> {
        &self.types
    }

    /// Compare key components only; equal keys may still be distinct records
    pub fn compare_keys(&self, a: &FeatureStructure, b: &FeatureStructure) -> Ordering {
        for key in self.keys.iter() {
            let ord = match key {
                SortKey::Begin => a.begin().cmp(&b.begin()),
                SortKey::EndDescending => b.end().cmp(&a.end()),
                SortKey::TypePriority => self
                    .types
                    .priority_rank(a.type_id())
                    .cmp(&self.types.priority_rank(b.type_id())),
                SortKey::Feature { name, direction } => {
                    let null = FeatureValue::Null;
                    let va = a.feature(name).unwrap_or(&null);
                    let vb = b.feature(name).unwrap_or(&null);
                    direction.apply(va.cmp(vb))
                }
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Full order: key components, then id
    pub fn compare(&self, a: &FeatureStructure, b: &FeatureStructure) -> Ordering {
        self.compare_keys(a, b).then_with(|| a.id().cmp(&b.id()))
    }
}
