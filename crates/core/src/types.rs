//! Core identifier types for castor
//!
//! This module defines the foundational types:
//! - FsId: process-unique, monotonically issued record identifier
//! - TypeId: dense index into the type table
//! - Span: half-open `[begin, end)` interval over the document

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a feature structure
///
/// Issued by the store in strictly increasing order and never reused within
/// a store. It is the final tie-break of every ordering and the identity used
/// for equality between records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FsId(u64);

impl FsId {
    /// Wrap a raw identifier
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type handle into a [`TypeTable`](crate::TypeTable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    /// Wrap a raw table index
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Position in the type table
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type:{}", self.0)
    }
}

/// Half-open interval `[begin, end)` over the document coordinate space
///
/// `begin <= end` is assumed on input and not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset
    pub begin: i32,
    /// Exclusive end offset
    pub end: i32,
}

impl Span {
    /// Create a span
    pub const fn new(begin: i32, end: i32) -> Self {
        Self { begin, end }
    }

    /// Length in offsets
    pub const fn len(&self) -> i32 {
        self.end - self.begin
    }

    /// True for zero-length spans
    pub const fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// True when `other` lies entirely inside this span
    pub const fn contains(&self, other: &Span) -> bool {
        other.begin >= self.begin && other.end <= self.end
    }

    /// True when the two spans share at least one offset
    pub const fn overlaps(&self, other: &Span) -> bool {
        self.begin < other.end && other.begin < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}
