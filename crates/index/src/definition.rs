//! Index definitions
//!
//! An index is declared by label, base type, order kind and sort keys.
//! Records of the base type and of every subtype flow into it.

use castor_core::{SortKey, TypeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to an index inside an [`IndexRegistry`](crate::IndexRegistry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexId(u32);

impl IndexId {
    pub(crate) fn new(raw: usize) -> Self {
        Self(raw as u32)
    }

    /// Position in the registry
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index:{}", self.0)
    }
}

/// Order kind of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Comparator order; equal keys kept, ordered by id
    Sorted,
    /// Comparator order; at most one record per key
    Set,
    /// Insertion order
    Bag,
}

/// Declaration of an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    /// Unique label
    pub label: String,
    /// Records of this type and its subtypes are indexed
    pub base_type: TypeId,
    /// Order kind
    pub kind: IndexKind,
    /// Sort keys; ignored for bags
    pub keys: Vec<SortKey>,
}

impl IndexDefinition {
    /// Sorted index over explicit keys
    pub fn sorted(label: impl Into<String>, base_type: TypeId, keys: Vec<SortKey>) -> Self {
        Self {
            label: label.into(),
            base_type,
            kind: IndexKind::Sorted,
            keys,
        }
    }

    /// Set index over explicit keys
    pub fn set(label: impl Into<String>, base_type: TypeId, keys: Vec<SortKey>) -> Self {
        Self {
            label: label.into(),
            base_type,
            kind: IndexKind::Set,
            keys,
        }
    }

    /// Insertion-order index
    pub fn bag(label: impl Into<String>, base_type: TypeId) -> Self {
        Self {
            label: label.into(),
            base_type,
            kind: IndexKind::Bag,
            keys: Vec::new(),
        }
    }

    /// Sorted index in annotation order (begin asc, end desc)
    pub fn annotation(label: impl Into<String>, base_type: TypeId) -> Self {
        Self::sorted(label, base_type, vec![SortKey::Begin, SortKey::EndDescending])
    }

    /// True if the keys use span offsets
    pub fn uses_span_keys(&self) -> bool {
        self.keys
            .iter()
            .any(|k| matches!(k, SortKey::Begin | SortKey::EndDescending))
    }

    /// True if the keys start with annotation order
    pub fn is_annotation_ordered(&self) -> bool {
        self.kind != IndexKind::Bag
            && self.keys.len() >= 2
            && self.keys[0] == SortKey::Begin
            && self.keys[1] == SortKey::EndDescending
    }
}
