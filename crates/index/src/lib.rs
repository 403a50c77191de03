//! Feature structure indexes for castor
//!
//! This crate keeps records retrievable in a stable, type-aware order:
//! - IndexDefinition: label, base type, kind (sorted/set/bag), sort keys
//! - FsIndex: one maintained index with version-stamped snapshots
//! - IndexRegistry: all indexes of a store plus type fan-out
//! - FsCursor: positionable traversal over a snapshot

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod definition;
pub mod index;
pub mod registry;

pub use cursor::{FsCursor, SeekOrder};
pub use definition::{IndexDefinition, IndexId, IndexKind};
pub use index::FsIndex;
pub use registry::{FanOut, IndexRegistry};
