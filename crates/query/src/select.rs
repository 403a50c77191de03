//! Select builder
//!
//! Accumulates a query over an [`IndexView`] and compiles it to a
//! [`QueryShape`] when a terminal runs. Modifiers apply in a fixed order:
//! forward scan, then reverse if `backwards`, then `skip`, then `limit`.
//!
//! ```text
//! view.select()
//!     .covered_by(&sentence)
//!     .non_overlapping()
//!     .limit(3)
//!     .to_vec()?
//! ```

use crate::bounds::{Bound, BoundsUse};
use crate::subiterator::QueryShape;
use crate::view::IndexView;
use castor_core::{Error, FeatureStructure, FsRef, Result};
use castor_index::FsCursor;

/// Accumulated query over one view
#[derive(Debug, Clone)]
pub struct Select<'a> {
    view: IndexView<'a>,
    mode: BoundsUse,
    bound: Option<Bound>,
    pending: Option<Error>,
    strict: bool,
    type_priority: bool,
    non_overlapping: bool,
    skip_same_begin_end_type: bool,
    backwards: bool,
    skip: usize,
    limit: Option<usize>,
    null_ok: bool,
}

impl<'a> Select<'a> {
    /// Unbounded, ambiguous, forward query
    pub fn new(view: IndexView<'a>) -> Self {
        Self {
            view,
            mode: BoundsUse::NotBounded,
            bound: None,
            pending: None,
            strict: true,
            type_priority: false,
            non_overlapping: false,
            skip_same_begin_end_type: false,
            backwards: false,
            skip: 0,
            limit: None,
            null_ok: false,
        }
    }

    fn bounded(mut self, mode: BoundsUse, bound: Bound) -> Self {
        self.mode = mode;
        self.bound = Some(bound);
        self
    }

    // A record that cannot bound is reported by the terminal
    fn bounded_by(mut self, mode: BoundsUse, fs: &FeatureStructure) -> Self {
        match Bound::of(fs, self.view.types()) {
            Ok(bound) => self.bounded(mode, bound),
            Err(e) => {
                self.pending = Some(e);
                self
            }
        }
    }

    // ========================================
    // Bounds
    // ========================================

    /// Records inside `fs`
    pub fn covered_by(self, fs: &FeatureStructure) -> Self {
        self.bounded_by(BoundsUse::CoveredBy, fs)
    }

    /// Records inside `[begin, end)`
    pub fn covered_by_span(self, begin: i32, end: i32) -> Self {
        self.bounded(BoundsUse::CoveredBy, Bound::span(begin, end))
    }

    /// Records spanning all of `fs`
    pub fn covering(self, fs: &FeatureStructure) -> Self {
        self.bounded_by(BoundsUse::Covering, fs)
    }

    /// Records spanning all of `[begin, end)`
    pub fn covering_span(self, begin: i32, end: i32) -> Self {
        self.bounded(BoundsUse::Covering, Bound::span(begin, end))
    }

    /// Records with exactly the span of `fs`
    pub fn at(self, fs: &FeatureStructure) -> Self {
        self.bounded_by(BoundsUse::SameBeginEnd, fs)
    }

    /// Records with exactly `[begin, end)`
    pub fn at_span(self, begin: i32, end: i32) -> Self {
        self.bounded(BoundsUse::SameBeginEnd, Bound::span(begin, end))
    }

    /// Records sorting after `fs`
    pub fn following(self, fs: &FeatureStructure) -> Self {
        self.bounded_by(BoundsUse::Following, fs)
    }

    /// Records sorting after `[begin, end)`
    pub fn following_span(self, begin: i32, end: i32) -> Self {
        self.bounded(BoundsUse::Following, Bound::span(begin, end))
    }

    /// Records sorting before `fs`
    pub fn preceding(self, fs: &FeatureStructure) -> Self {
        self.bounded_by(BoundsUse::Preceding, fs)
    }

    /// Records sorting before `[begin, end)`
    pub fn preceding_span(self, begin: i32, end: i32) -> Self {
        self.bounded(BoundsUse::Preceding, Bound::span(begin, end))
    }

    /// Records beginning at or after `position`
    pub fn start_at(self, position: i32) -> Self {
        self.bounded(BoundsUse::StartAt, Bound::position(position))
    }

    // ========================================
    // Flags and modifiers
    // ========================================

    /// Let `covered_by` admit records ending past the bound
    pub fn include_annotations_with_end_beyond_bounds(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Set end-side strictness explicitly
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Order same-span records by type priority
    pub fn type_priority(mut self) -> Self {
        self.type_priority = true;
        self
    }

    /// Greedy non-overlapping results
    pub fn non_overlapping(mut self) -> Self {
        self.non_overlapping = true;
        self
    }

    /// Drop records with the bound's begin, end and type
    pub fn skip_when_same_begin_end_type(mut self) -> Self {
        self.skip_same_begin_end_type = true;
        self
    }

    /// Deliver results back to front
    pub fn backwards(mut self) -> Self {
        self.backwards = true;
        self
    }

    /// Drop the first `n` results
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    /// Keep at most `n` results
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Empty `get` results become `None` instead of an error
    pub fn null_ok(mut self) -> Self {
        self.null_ok = true;
        self
    }

    /// Compile to a scan shape
    pub fn shape(&self) -> Result<QueryShape> {
        if let Some(e) = &self.pending {
            return Err(e.clone());
        }
        Ok(QueryShape {
            mode: self.mode,
            bound: self.bound,
            type_filter: self.view.type_filter(),
            strict: self.strict,
            ambiguous: !self.non_overlapping,
            type_priority: self.type_priority && self.view.is_annotation_index(),
            skip_same_begin_end_type: self.skip_same_begin_end_type,
        })
    }

    // ========================================
    // Terminals
    // ========================================

    /// Cursor over the results, honoring direction, skip and limit
    ///
    /// With a limit, the cursor stays invalid once it has advanced past the
    /// last allowed result, even after `move_to_first`.
    pub fn cursor(&self) -> Result<FsCursor> {
        let shape = self.shape()?;
        let items = self.view.materialize(&shape)?;
        let n = items.len();
        let take = self.limit.unwrap_or(n);
        let range = if self.backwards {
            n.saturating_sub(self.skip.saturating_add(take))..n.saturating_sub(self.skip)
        } else {
            let start = self.skip.min(n);
            start..start.saturating_add(take).min(n)
        };
        let cursor = FsCursor::slice(
            items,
            range,
            self.view.seek_order(shape.type_priority),
            self.backwards,
        );
        Ok(match self.limit {
            Some(_) => cursor.limited(),
            None => cursor,
        })
    }

    /// Materialized results
    pub fn to_vec(&self) -> Result<Vec<FsRef>> {
        Ok(self.cursor()?.collect())
    }

    /// Number of results
    pub fn count(&self) -> Result<usize> {
        Ok(self.cursor()?.len())
    }

    /// First result
    pub fn get(&self) -> Result<Option<FsRef>> {
        self.get_at(0)
    }

    /// Result at ordinal `n`
    ///
    /// # Errors
    ///
    /// `NoInstances` when there are at most `n` results, unless `null_ok`
    /// was set.
    pub fn get_at(&self, n: usize) -> Result<Option<FsRef>> {
        match self.cursor()?.nth(n) {
            Some(fs) => Ok(Some(fs)),
            None if self.null_ok => Ok(None),
            None => Err(Error::NoInstances),
        }
    }

    /// The only result
    ///
    /// # Errors
    ///
    /// `NoInstances` for zero results, `TooManyInstances` for more than one.
    pub fn single(&self) -> Result<FsRef> {
        self.single_or_null()?.ok_or(Error::NoInstances)
    }

    /// The only result, or `None` when there is none
    pub fn single_or_null(&self) -> Result<Option<FsRef>> {
        let mut cursor = self.cursor()?;
        match cursor.len() {
            0 | 1 => Ok(cursor.next()),
            count => Err(Error::TooManyInstances { count }),
        }
    }
}
