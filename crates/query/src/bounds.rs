//! Bounds model
//!
//! A [`Bound`] is a copy of the interval (and, when taken from a record, the
//! identity and type) that a bounded query is relative to. The bounding
//! record itself is never retained.

use castor_core::{Error, FeatureStructure, FsId, Result, Span, TypeCapability, TypeId};
use std::cmp::{Ordering, Reverse};

/// How a query relates candidates to its bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundsUse {
    /// Candidate lies inside the bound
    CoveredBy,
    /// Candidate spans the whole bound
    Covering,
    /// Candidate has exactly the bound's span
    SameBeginEnd,
    /// No interval constraint
    NotBounded,
    /// Candidate sorts strictly after the bound in annotation order
    ///
    /// At an equal begin that means a shorter span (`end < bound.end`).
    /// Records with the bound's exact span follow only a record bound, and
    /// only when they rank after it by (type priority rank when enabled, id).
    Following,
    /// Candidate sorts strictly before the bound in annotation order
    ///
    /// At an equal begin that means a longer span (`end > bound.end`).
    /// Exact-span ties resolve as for [`BoundsUse::Following`], mirrored.
    Preceding,
    /// Candidate begins at or after a position
    StartAt,
}

impl BoundsUse {
    /// True for the modes that constrain by interval or position
    pub fn is_bounded(self) -> bool {
        self != BoundsUse::NotBounded
    }
}

/// Interval a bounded query is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bound {
    /// Bounding interval
    pub span: Span,
    /// Identity of the bounding record, if the bound came from one
    pub id: Option<FsId>,
    /// Type of the bounding record, if the bound came from one
    pub type_id: Option<TypeId>,
}

impl Bound {
    /// Bound over a bare interval
    pub fn span(begin: i32, end: i32) -> Self {
        Self {
            span: Span::new(begin, end),
            id: None,
            type_id: None,
        }
    }

    /// Bound at a single position (`[pos, pos)`)
    pub fn position(pos: i32) -> Self {
        Self::span(pos, pos)
    }

    /// Bound copied from an interval-bearing record
    ///
    /// Records outside the annotation hierarchy, or without a span, fail
    /// with `TypeMismatch`.
    pub fn of(fs: &FeatureStructure, types: &dyn TypeCapability) -> Result<Self> {
        match fs.span() {
            Some(span) if types.is_annotation(fs.type_id()) => Ok(Self {
                span,
                id: Some(fs.id()),
                type_id: Some(fs.type_id()),
            }),
            _ => Err(Error::type_mismatch(
                types.display_name(types.annotation_type()),
                types.display_name(fs.type_id()),
            )),
        }
    }

    /// First offset
    pub fn begin(&self) -> i32 {
        self.span.begin
    }

    /// One past the last offset
    pub fn end(&self) -> i32 {
        self.span.end
    }

    /// True if `fs` is the bounding record
    pub fn is_bound_record(&self, fs: &FeatureStructure) -> bool {
        self.id == Some(fs.id())
    }

    /// True if `fs` has the bound's begin, end and type
    pub fn same_begin_end_type(&self, fs: &FeatureStructure) -> bool {
        self.type_id == Some(fs.type_id()) && fs.span() == Some(self.span)
    }

    /// Annotation-order key of the bound
    pub(crate) fn key(&self) -> (i32, Reverse<i32>) {
        (self.span.begin, Reverse(self.span.end))
    }

    /// Interval predicate for the containment modes
    ///
    /// Positional modes (`Following`, `Preceding`) also depend on type
    /// priority and are decided by the subiterator.
    pub fn admits(&self, mode: BoundsUse, strict: bool, fs: &FeatureStructure) -> bool {
        let (b, e) = (fs.begin(), fs.end());
        let (lo, hi) = (self.begin(), self.end());
        match mode {
            BoundsUse::CoveredBy => b >= lo && b <= hi && (!strict || e <= hi),
            BoundsUse::Covering => b <= lo && e >= hi,
            BoundsUse::SameBeginEnd => b == lo && e == hi,
            BoundsUse::NotBounded => true,
            BoundsUse::StartAt => b >= lo,
            BoundsUse::Following => span_key(fs).cmp(&self.key()) != Ordering::Less,
            BoundsUse::Preceding => span_key(fs).cmp(&self.key()) != Ordering::Greater,
        }
    }
}

/// Annotation-order key: begin ascending, end descending
pub(crate) fn span_key(fs: &FeatureStructure) -> (i32, Reverse<i32>) {
    (fs.begin(), Reverse(fs.end()))
}
