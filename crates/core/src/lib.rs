//! Core types and traits for castor
//!
//! This crate defines the foundational types used throughout the system:
//! - FsId / TypeId / Span: record identity, type handles, intervals
//! - FeatureValue: attribute slot values with a total order
//! - FeatureStructure: the immutable, shared record
//! - TypeCapability: the type-system questions the engine asks
//! - TypeTable: precomputed TypeCapability implementation
//! - FsComparator: the key model behind every sorted traversal
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comparator;
pub mod error;
pub mod record;
pub mod type_system;
pub mod types;
pub mod value;

pub use comparator::{Direction, FsComparator, SortKey};
pub use error::{Error, Result};
pub use record::{FeatureStructure, FsRef};
pub use type_system::{
    FeatureDecl, FeatureRange, TypeCapability, TypeTable, TypeTableBuilder, TYPE_NAME_ANNOTATION,
    TYPE_NAME_DOCUMENT_ANNOTATION, TYPE_NAME_TOP,
};
pub use types::{FsId, Span, TypeId};
pub use value::FeatureValue;
