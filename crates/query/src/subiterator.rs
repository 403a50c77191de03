//! Subiterator engine
//!
//! Filters an annotation-ordered snapshot by a [`QueryShape`]:
//!
//! 1. Two binary searches cut the snapshot down to the window that can
//!    possibly qualify (for `CoveredBy`: first `begin >= B` up to the last
//!    `begin <= E`).
//! 2. The window is scanned one same-span run at a time. With type priority
//!    the run is reordered by `(rank, id)` before anything is yielded.
//! 3. Each record passes the type filter, the bound-identity and
//!    same-begin-end-type exclusions, and the mode predicate.
//! 4. Unambiguous shapes yield greedily: after `r` is yielded every later
//!    record with `begin < r.end` is dropped.
//!
//! The scan never backtracks, so cost is one seek plus the window.

use crate::bounds::{span_key, Bound, BoundsUse};
use castor_core::{FeatureStructure, FsRef, TypeCapability, TypeId};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::ops::Range;
use std::sync::Arc;

/// Everything that determines the result of a scan
///
/// Two equal shapes over the same index version produce the same
/// sequence, which is what lets the flat cache key on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryShape {
    /// Relation to the bound
    pub mode: BoundsUse,
    /// Bound; ignored for `NotBounded`
    pub bound: Option<Bound>,
    /// Only records of this type or a subtype qualify
    pub type_filter: TypeId,
    /// `CoveredBy` requires `end <= E` when set
    pub strict: bool,
    /// False selects greedy non-overlapping results
    pub ambiguous: bool,
    /// Reorder same-span runs by type priority rank
    pub type_priority: bool,
    /// Drop records with the bound's begin, end and type, and collapse
    /// consecutive results sharing begin, end and type
    pub skip_same_begin_end_type: bool,
}

impl QueryShape {
    /// Whole-index shape filtered by type
    pub fn unbounded(type_filter: TypeId) -> Self {
        Self {
            mode: BoundsUse::NotBounded,
            bound: None,
            type_filter,
            strict: true,
            ambiguous: true,
            type_priority: false,
            skip_same_begin_end_type: false,
        }
    }

    /// Bounded shape with default flags (strict, ambiguous)
    pub fn bounded(mode: BoundsUse, bound: Bound, type_filter: TypeId) -> Self {
        Self {
            mode,
            bound: Some(bound),
            ..Self::unbounded(type_filter)
        }
    }

    /// True if the scan is the plain ordered traversal of `base_type`
    pub fn is_identity_for(&self, base_type: TypeId) -> bool {
        !self.mode.is_bounded()
            && self.ambiguous
            && !self.skip_same_begin_end_type
            && !self.type_priority
            && self.type_filter == base_type
    }
}

/// Portion of an annotation-ordered snapshot that can satisfy `shape`
pub fn window(items: &[FsRef], shape: &QueryShape) -> Range<usize> {
    let bound = match shape.bound {
        Some(bound) if shape.mode.is_bounded() => bound,
        _ => return 0..items.len(),
    };
    let first_begin = |pos: i32| items.partition_point(|fs| fs.begin() < pos);
    let past_begin = |pos: i32| items.partition_point(|fs| fs.begin() <= pos);
    let first_key = || items.partition_point(|fs| span_key(fs) < bound.key());
    let past_key = || items.partition_point(|fs| span_key(fs) <= bound.key());

    let (start, stop) = match shape.mode {
        BoundsUse::CoveredBy => (first_begin(bound.begin()), past_begin(bound.end())),
        BoundsUse::Covering => (0, past_begin(bound.begin())),
        BoundsUse::SameBeginEnd => (first_key(), past_key()),
        BoundsUse::Following => (first_key(), items.len()),
        BoundsUse::Preceding => (0, past_key()),
        BoundsUse::StartAt => (first_begin(bound.begin()), items.len()),
        BoundsUse::NotBounded => (0, items.len()),
    };
    start..stop.max(start)
}

/// Lazy filtered scan over a snapshot
pub struct Subiterator<'a> {
    items: &'a [FsRef],
    shape: &'a QueryShape,
    types: &'a dyn TypeCapability,
    next: usize,
    stop: usize,
    run: SmallVec<[&'a FsRef; 8]>,
    run_pos: usize,
    last: Option<&'a FsRef>,
    reach: Option<i32>,
}

impl<'a> Subiterator<'a> {
    /// Start a scan; `items` must be in annotation order for bounded shapes
    pub fn new(items: &'a [FsRef], shape: &'a QueryShape, types: &'a dyn TypeCapability) -> Self {
        let range = window(items, shape);
        Self {
            items,
            shape,
            types,
            next: range.start,
            stop: range.end,
            run: SmallVec::new(),
            run_pos: 0,
            last: None,
            reach: None,
        }
    }

    /// Load the next same-span run of the window; false when exhausted
    fn fill_run(&mut self) -> bool {
        self.run.clear();
        self.run_pos = 0;
        if self.next >= self.stop {
            return false;
        }
        let items = self.items;
        let mut end = self.next + 1;
        if self.shape.type_priority {
            let span = items[self.next].span();
            while end < self.stop && items[end].span() == span {
                end += 1;
            }
        }
        self.run.extend(items[self.next..end].iter());
        if self.run.len() > 1 {
            let types = self.types;
            self.run
                .sort_by_key(|fs| (types.priority_rank(fs.type_id()), fs.id()));
        }
        self.next = end;
        true
    }

    fn rank(&self, t: TypeId) -> u32 {
        if self.shape.type_priority {
            self.types.priority_rank(t)
        } else {
            0
        }
    }

    // Sort-key position of `fs` relative to the bound. Equal spans fall back
    // to (rank, id) only when the bound came from a record.
    fn relative_to(&self, fs: &FeatureStructure, bound: &Bound) -> Ordering {
        span_key(fs).cmp(&bound.key()).then_with(|| match (bound.id, bound.type_id) {
            (Some(id), Some(t)) => (self.rank(fs.type_id()), fs.id()).cmp(&(self.rank(t), id)),
            _ => Ordering::Equal,
        })
    }

    fn qualifies(&self, fs: &FeatureStructure) -> bool {
        let shape = self.shape;
        if !self.types.is_subtype_of(fs.type_id(), shape.type_filter) {
            return false;
        }
        let bound = match shape.bound {
            Some(bound) if shape.mode.is_bounded() => bound,
            _ => return true,
        };
        if bound.is_bound_record(fs) {
            return false;
        }
        if shape.skip_same_begin_end_type && bound.same_begin_end_type(fs) {
            return false;
        }
        match shape.mode {
            BoundsUse::Following => self.relative_to(fs, &bound) == Ordering::Greater,
            BoundsUse::Preceding => self.relative_to(fs, &bound) == Ordering::Less,
            mode => bound.admits(mode, shape.strict, fs),
        }
    }
}

impl Iterator for Subiterator<'_> {
    type Item = FsRef;

    fn next(&mut self) -> Option<FsRef> {
        loop {
            if self.run_pos >= self.run.len() && !self.fill_run() {
                return None;
            }
            let fs = self.run[self.run_pos];
            self.run_pos += 1;

            if !self.qualifies(fs) {
                continue;
            }
            if self.shape.skip_same_begin_end_type
                && self.last.map_or(false, |last| last.same_begin_end_type(fs))
            {
                continue;
            }
            if !self.shape.ambiguous {
                if self.reach.map_or(false, |reach| fs.begin() < reach) {
                    continue;
                }
                self.reach = Some(fs.end());
            }
            self.last = Some(fs);
            return Some(Arc::clone(fs));
        }
    }
}
