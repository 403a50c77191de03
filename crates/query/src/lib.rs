//! Interval queries for castor
//!
//! Everything between an index and a caller's result list:
//! - Bound / BoundsUse: what a bounded query is relative to
//! - Subiterator: the filtered, optionally non-overlapping scan
//! - FlatCache: materialized results per index version
//! - IndexView: type-filtered handle over one index
//! - Select: the query builder and its cardinality terminals

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bounds;
pub mod flat;
pub mod select;
pub mod subiterator;
pub mod view;

pub use bounds::{Bound, BoundsUse};
pub use flat::{FlatCache, DEFAULT_MAX_ENTRIES};
pub use select::Select;
pub use subiterator::{window, QueryShape, Subiterator};
pub use view::IndexView;
