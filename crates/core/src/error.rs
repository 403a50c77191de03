//! Error types for castor
//!
//! Every failure the index and query engine can report is a variant of
//! [`Error`]. We use `thiserror` for the `Display` and `Error` impls.
//!
//! The variants map onto four error kinds callers branch on:
//! - invalid position: dereferencing or advancing an invalid cursor
//! - empty result: a cardinality-constrained terminal found nothing
//! - ambiguous result: `single` found more than one element
//! - type mismatch: an index or bound was requested over the wrong type
//!
//! Nothing is retried or downgraded inside the engine; all errors surface
//! synchronously to the immediate caller.

use thiserror::Error;

/// Result type alias for castor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the feature structure store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Cursor was dereferenced or advanced while not positioned on an element
    #[error("Cursor is not positioned on an element")]
    InvalidPosition,

    /// A `get`/`single` terminal found no matching instance
    #[error("Select found no instances")]
    NoInstances,

    /// A `single` terminal found more than one matching instance
    #[error("Select found too many instances: expected 1, found {count}")]
    TooManyInstances {
        /// Number of instances found (at least 2)
        count: usize,
    },

    /// An index, filter or bound was requested over an incompatible type
    #[error("Type mismatch: expected a subtype of {expected}, got {actual}")]
    TypeMismatch {
        /// Name of the type the operation requires
        expected: String,
        /// Name of the type that was supplied
        actual: String,
    },

    /// No index is registered under the label
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// An index with the same label is already registered
    #[error("Index already defined: {0}")]
    DuplicateIndex(String),

    /// A type with the same name is already declared
    #[error("Type already declared: {0}")]
    DuplicateType(String),

    /// Type name or id is not part of the type system
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Feature is not declared on the type (or any supertype)
    #[error("Unknown feature '{feature}' on type {type_name}")]
    UnknownFeature {
        /// Type the feature was looked up on
        type_name: String,
        /// Requested feature name
        feature: String,
    },

    /// Configuration could not be read, parsed or applied
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a type mismatch error from two type names
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// True for the empty-result kind
    pub fn is_no_instances(&self) -> bool {
        matches!(self, Error::NoInstances)
    }

    /// True for the ambiguous-result kind
    pub fn is_too_many_instances(&self) -> bool {
        matches!(self, Error::TooManyInstances { .. })
    }

    /// True for the invalid-position kind
    pub fn is_invalid_position(&self) -> bool {
        matches!(self, Error::InvalidPosition)
    }
}
