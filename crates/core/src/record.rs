//! Feature structures: the records stored and indexed
//!
//! A [`FeatureStructure`] is immutable once created. The store keeps the
//! canonical [`FsRef`] and every index holds a clone of the same `Arc`, so
//! records are shared by reference and compared by identity.

use crate::types::{FsId, Span, TypeId};
use crate::value::FeatureValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a feature structure
pub type FsRef = Arc<FeatureStructure>;

/// A typed record with identity and attribute slots
#[derive(Debug, Clone)]
pub struct FeatureStructure {
    id: FsId,
    type_id: TypeId,
    span: Option<Span>,
    features: BTreeMap<String, FeatureValue>,
}

impl FeatureStructure {
    /// Assemble a record
    ///
    /// Validation against the type system is the store's job; this
    /// constructor accepts whatever it is given.
    pub fn new(
        id: FsId,
        type_id: TypeId,
        span: Option<Span>,
        features: BTreeMap<String, FeatureValue>,
    ) -> Self {
        Self {
            id,
            type_id,
            span,
            features,
        }
    }

    /// Record identity
    pub fn id(&self) -> FsId {
        self.id
    }

    /// Record type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Interval, for annotation-like records
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Start offset; `i32::MIN` for records without a span
    pub fn begin(&self) -> i32 {
        self.span.map_or(i32::MIN, |s| s.begin)
    }

    /// End offset; `i32::MIN` for records without a span
    pub fn end(&self) -> i32 {
        self.span.map_or(i32::MIN, |s| s.end)
    }

    /// Feature value, `None` when unset
    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    /// All set features in name order
    pub fn features(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Same begin, end and type as `other`
    pub fn same_begin_end_type(&self, other: &FeatureStructure) -> bool {
        self.type_id == other.type_id && self.span == other.span
    }
}

impl PartialEq for FeatureStructure {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FeatureStructure {}

impl std::hash::Hash for FeatureStructure {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for FeatureStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.id, self.type_id)?;
        if let Some(span) = self.span {
            write!(f, " {}", span)?;
        }
        Ok(())
    }
}
