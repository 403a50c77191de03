//! Castor - typed in-memory feature structure store with interval indexes
//!
//! Castor holds immutable records ("feature structures") of declared types,
//! keeps them in sorted, set or bag indexes and answers interval queries
//! over annotations: covered-by, covering, same-span, following, preceding,
//! with optional non-overlapping, type-priority and cardinality semantics.
//!
//! # Quick Start
//!
//! ```ignore
//! use castor::{Cas, TypeTable};
//! use std::sync::Arc;
//!
//! let mut b = TypeTable::builder();
//! let token = b.add_type("Token", TypeTable::ANNOTATION)?;
//! let sentence = b.add_type("Sentence", TypeTable::ANNOTATION)?;
//! let mut cas = Cas::new(Arc::new(b.build()))?;
//!
//! let s = cas.create_and_add_annotation(sentence, 0, 10)?;
//! cas.create_and_add_annotation(token, 0, 5)?;
//! cas.create_and_add_annotation(token, 5, 10)?;
//!
//! assert_eq!(cas.select(token)?.covered_by(&s).count()?, 2);
//! ```
//!
//! # Architecture
//!
//! - `castor-core`: ids, spans, values, records, the type system, comparators
//! - `castor-index`: sorted/set/bag indexes, the registry and cursors
//! - `castor-query`: bounds, subiterators, the flat cache and `Select`
//! - this crate: the [`Cas`] store facade and TOML configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cas;
pub mod config;

pub use cas::{Cas, FsBuilder, ANNOTATION_INDEX};
pub use config::{CasConfig, FlattenConfig, IndexConfig, IndexKeyConfig};

pub use castor_core::{
    Direction, Error, FeatureDecl, FeatureRange, FeatureStructure, FeatureValue, FsComparator,
    FsId, FsRef, Result, SortKey, Span, TypeCapability, TypeId, TypeTable, TypeTableBuilder,
};
pub use castor_index::{FsCursor, FsIndex, IndexDefinition, IndexId, IndexKind, SeekOrder};
pub use castor_query::{Bound, BoundsUse, FlatCache, IndexView, QueryShape, Select};
