//! Cursors over ordered snapshots
//!
//! An [`FsCursor`] walks an immutable `Arc<[FsRef]>` captured when the cursor
//! was created. Mutating the index afterwards does not disturb the cursor; it
//! simply keeps reading its own snapshot.
//!
//! # States
//!
//! - before-first / after-last: invalid, `get` fails
//! - at(k): valid, positioned on the k-th element in traversal order
//!
//! Advancing from an invalid state is an error, never a silent no-op.
//!
//! A cursor marked [`FsCursor::limited`] is spent once it advances past its
//! last element: repositioning afterwards leaves it invalid.
//!
//! # Seeking
//!
//! `move_to` is a lower-bound seek on the key (ignoring identity): it lands
//! on the leftmost element whose key is not less than the target's. A
//! reversed cursor mirrors this and lands on the rightmost element whose key
//! is not greater. Insertion-order cursors seek by identity instead.

use castor_core::{Error, FeatureStructure, FsComparator, FsRef, Result};
use std::cmp::Ordering;
use std::ops::Range;
use std::sync::Arc;

/// How a cursor positions itself on `move_to`
#[derive(Debug, Clone)]
pub enum SeekOrder {
    /// Lower-bound binary search with the comparator's keys
    Keyed(FsComparator),
    /// Linear search for the identical record
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    At(usize),
    AfterLast,
}

/// Positionable traversal handle over an ordered snapshot
#[derive(Debug, Clone)]
pub struct FsCursor {
    items: Arc<[FsRef]>,
    range: Range<usize>,
    seek: SeekOrder,
    reversed: bool,
    pos: Position,
    limited: bool,
    spent: bool,
}

impl FsCursor {
    /// Cursor over the whole snapshot, positioned on the first element
    pub fn new(items: Arc<[FsRef]>, seek: SeekOrder) -> Self {
        let range = 0..items.len();
        Self::slice(items, range, seek, false)
    }

    /// Cursor over `items[range]`, optionally walking it back to front
    ///
    /// `items[range]` must be in `seek` order (ascending) for keyed seeks to
    /// be meaningful.
    pub fn slice(items: Arc<[FsRef]>, range: Range<usize>, seek: SeekOrder, reversed: bool) -> Self {
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        let mut cursor = Self {
            items,
            range: start..end,
            seek,
            reversed,
            pos: Position::BeforeFirst,
            limited: false,
            spent: false,
        };
        cursor.move_to_first();
        cursor
    }

    /// Treat the range end as a result limit
    pub fn limited(mut self) -> Self {
        self.limited = true;
        self
    }

    /// True once a limited cursor has advanced past its last element
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Cursor with nothing to visit
    pub fn empty() -> Self {
        Self::new(Arc::from(Vec::new()), SeekOrder::Identity)
    }

    /// Number of elements visited by a full traversal
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// True if a full traversal visits nothing
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// True if the cursor walks back to front
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// True when positioned on an element
    pub fn is_valid(&self) -> bool {
        matches!(self.pos, Position::At(_))
    }

    /// Traversal ordinal of the current element
    pub fn position(&self) -> Option<usize> {
        match self.pos {
            Position::At(k) => Some(k),
            _ => None,
        }
    }

    fn slot(&self, k: usize) -> usize {
        if self.reversed {
            self.range.end - 1 - k
        } else {
            self.range.start + k
        }
    }

    /// Current element
    pub fn get(&self) -> Result<&FsRef> {
        match self.pos {
            Position::At(k) => Ok(&self.items[self.slot(k)]),
            _ => Err(Error::InvalidPosition),
        }
    }

    fn reposition(&mut self, pos: Position) {
        self.pos = if self.spent { Position::AfterLast } else { pos };
    }

    /// Position on the first element; invalid if empty or spent
    pub fn move_to_first(&mut self) {
        let pos = if self.is_empty() {
            Position::AfterLast
        } else {
            Position::At(0)
        };
        self.reposition(pos);
    }

    /// Position on the last element; invalid if empty or spent
    pub fn move_to_last(&mut self) {
        let pos = match self.len() {
            0 => Position::BeforeFirst,
            n => Position::At(n - 1),
        };
        self.reposition(pos);
    }

    /// Advance one element; past the end becomes invalid
    pub fn move_to_next(&mut self) -> Result<()> {
        match self.pos {
            Position::At(k) if k + 1 < self.len() => self.pos = Position::At(k + 1),
            Position::At(_) => {
                self.pos = Position::AfterLast;
                self.spent = self.limited;
            }
            _ => return Err(Error::InvalidPosition),
        }
        Ok(())
    }

    /// Step back one element; before the start becomes invalid
    pub fn move_to_previous(&mut self) -> Result<()> {
        match self.pos {
            Position::At(0) => self.pos = Position::BeforeFirst,
            Position::At(k) => self.pos = Position::At(k - 1),
            _ => return Err(Error::InvalidPosition),
        }
        Ok(())
    }

    /// Seek to the target's key (see module docs)
    pub fn move_to(&mut self, target: &FeatureStructure) {
        let window = &self.items[self.range.clone()];
        let pos = match &self.seek {
            SeekOrder::Keyed(cmp) if !self.reversed => {
                let lower = window.partition_point(|fs| cmp.compare_keys(fs, target) == Ordering::Less);
                if lower < window.len() {
                    Position::At(lower)
                } else {
                    Position::AfterLast
                }
            }
            SeekOrder::Keyed(cmp) => {
                let upper =
                    window.partition_point(|fs| cmp.compare_keys(fs, target) != Ordering::Greater);
                if upper == 0 {
                    Position::AfterLast
                } else {
                    Position::At(window.len() - upper)
                }
            }
            SeekOrder::Identity => match window.iter().position(|fs| fs.id() == target.id()) {
                Some(slot) if self.reversed => Position::At(window.len() - 1 - slot),
                Some(slot) => Position::At(slot),
                None => Position::AfterLast,
            },
        };
        self.reposition(pos);
    }

    /// Copy the remaining traversal into a vector
    pub fn to_vec(&self) -> Vec<FsRef> {
        self.clone().collect()
    }
}

impl Iterator for FsCursor {
    type Item = FsRef;

    /// Yield the current element, then advance
    fn next(&mut self) -> Option<FsRef> {
        let current = self.get().ok().map(Arc::clone)?;
        let _ = self.move_to_next();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.pos {
            Position::At(k) => self.len() - k,
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}
