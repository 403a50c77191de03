//! Index views
//!
//! An [`IndexView`] is what callers get back from a store: one index, a
//! type filter narrowing it (the index base type by default), and the
//! store's flat cache. Views are cheap copies of references.

use crate::bounds::{Bound, BoundsUse};
use crate::flat::FlatCache;
use crate::select::Select;
use crate::subiterator::{QueryShape, Subiterator};
use castor_core::{Error, FeatureStructure, FsRef, Result, TypeCapability, TypeId};
use castor_index::{FsCursor, FsIndex, SeekOrder};
use std::sync::Arc;

/// Type-filtered handle over one index
#[derive(Debug, Clone, Copy)]
pub struct IndexView<'a> {
    index: &'a FsIndex,
    types: &'a dyn TypeCapability,
    type_filter: TypeId,
    flat: &'a FlatCache,
}

impl<'a> IndexView<'a> {
    /// View over every record of the index
    pub fn new(index: &'a FsIndex, types: &'a dyn TypeCapability, flat: &'a FlatCache) -> Self {
        Self {
            index,
            types,
            type_filter: index.definition().base_type,
            flat,
        }
    }

    /// Underlying index
    pub fn index(&self) -> &'a FsIndex {
        self.index
    }

    /// Type capability
    pub fn types(&self) -> &'a dyn TypeCapability {
        self.types
    }

    /// Records must be of this type or a subtype
    pub fn type_filter(&self) -> TypeId {
        self.type_filter
    }

    /// True if the index is in annotation order
    pub fn is_annotation_index(&self) -> bool {
        self.index.is_annotation_index()
    }

    /// Narrow the view to a subtype of its current filter
    pub fn with_type(&self, t: TypeId) -> Result<Self> {
        if !self.types.is_subtype_of(t, self.type_filter) {
            return Err(Error::type_mismatch(
                self.types.display_name(self.type_filter),
                self.types.display_name(t),
            ));
        }
        Ok(Self {
            type_filter: t,
            ..*self
        })
    }

    /// Number of records passing the type filter
    pub fn len(&self) -> usize {
        if self.type_filter == self.index.definition().base_type {
            return self.index.len();
        }
        self.index
            .snapshot()
            .iter()
            .filter(|fs| self.types.is_subtype_of(fs.type_id(), self.type_filter))
            .count()
    }

    /// True if no record passes the type filter
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Membership by identity, respecting the type filter
    pub fn contains(&self, fs: &FeatureStructure) -> bool {
        self.types.is_subtype_of(fs.type_id(), self.type_filter) && self.index.contains(fs)
    }

    /// Full ordered traversal of the view
    pub fn cursor(&self) -> FsCursor {
        let shape = QueryShape::unbounded(self.type_filter);
        FsCursor::new(self.flattened(&shape), self.seek_order(false))
    }

    /// Full traversal; `ambiguous = false` yields greedy non-overlapping
    /// records and needs an annotation index
    pub fn iter(&self, ambiguous: bool) -> Result<FsCursor> {
        let shape = QueryShape {
            ambiguous,
            ..QueryShape::unbounded(self.type_filter)
        };
        Ok(FsCursor::new(self.materialize(&shape)?, self.seek_order(false)))
    }

    /// Records covered by `bound`, with type priority and same
    /// begin/end/type skipping
    pub fn subiterator(&self, bound: &FeatureStructure, ambiguous: bool, strict: bool) -> Result<FsCursor> {
        let shape = QueryShape {
            strict,
            ambiguous,
            type_priority: true,
            skip_same_begin_end_type: true,
            ..QueryShape::bounded(
                BoundsUse::CoveredBy,
                Bound::of(bound, self.types)?,
                self.type_filter,
            )
        };
        Ok(FsCursor::new(self.materialize(&shape)?, self.seek_order(true)))
    }

    /// Start a query over this view
    pub fn select(&self) -> Select<'a> {
        Select::new(*self)
    }

    /// Start a query narrowed to `t`
    pub fn select_type(&self, t: TypeId) -> Result<Select<'a>> {
        Ok(Select::new(self.with_type(t)?))
    }

    pub(crate) fn seek_order(&self, type_priority: bool) -> SeekOrder {
        match self.index.seek_order() {
            SeekOrder::Keyed(cmp) if type_priority => SeekOrder::Keyed(cmp.with_type_priority()),
            order => order,
        }
    }

    /// Results of `shape`, after checking the index can answer it
    pub(crate) fn materialize(&self, shape: &QueryShape) -> Result<Arc<[FsRef]>> {
        let needs_order = shape.mode.is_bounded() || !shape.ambiguous;
        if needs_order && !self.is_annotation_index() {
            let base = self.index.definition().base_type;
            return Err(Error::type_mismatch(
                format!("annotation-ordered index over {}", self.types.display_name(self.types.annotation_type())),
                format!("index '{}' over {}", self.index.label(), self.types.display_name(base)),
            ));
        }
        Ok(self.flattened(shape))
    }

    fn flattened(&self, shape: &QueryShape) -> Arc<[FsRef]> {
        let snapshot = self.index.snapshot();
        if shape.is_identity_for(self.index.definition().base_type) {
            return snapshot;
        }
        self.flat.get_or_compute(self.index, shape, || {
            Subiterator::new(&snapshot, shape, self.types).collect()
        })
    }
}
