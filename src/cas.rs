//! The feature structure store
//!
//! [`Cas`] owns the type system, the canonical table of created records, the
//! index registry and the flat cache. Creating a record only registers it
//! with the store; it becomes visible to queries once added to the indexes.
//!
//! # Example
//!
//! ```ignore
//! let mut cas = Cas::new(types)?;
//! let sentence = cas.create_and_add_annotation(sentence_type, 0, 10)?;
//! cas.create_and_add_annotation(token_type, 0, 5)?;
//! let tokens = cas.select(token_type)?.covered_by(&sentence).to_vec()?;
//! ```

use crate::config::CasConfig;
use castor_core::{
    Error, FeatureStructure, FeatureValue, FsId, FsRef, Result, Span, TypeCapability, TypeId,
};
use castor_index::{IndexDefinition, IndexId, IndexRegistry};
use castor_query::{FlatCache, IndexView, Select};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Label of the built-in annotation index
pub const ANNOTATION_INDEX: &str = "AnnotationIndex";

/// Typed in-memory record store with interval indexes
#[derive(Debug)]
pub struct Cas {
    types: Arc<dyn TypeCapability>,
    registry: IndexRegistry,
    flat: FlatCache,
    records: FxHashMap<FsId, FsRef>,
    indexed: FxHashSet<FsId>,
    // Indexed ids in the order they were added; back-fill replays it
    indexed_order: Vec<FsId>,
    next_id: AtomicU64,
    document_annotation: Option<FsRef>,
    annotation_index: IndexId,
}

impl Cas {
    /// Store with default configuration
    pub fn new(types: Arc<dyn TypeCapability>) -> Result<Self> {
        Self::with_config(types, &CasConfig::default())
    }

    /// Store with the built-in annotation index plus the configured ones
    ///
    /// # Errors
    ///
    /// Any registration error of a configured index (`UnknownType`,
    /// `UnknownFeature`, `DuplicateIndex`, `TypeMismatch`).
    pub fn with_config(types: Arc<dyn TypeCapability>, config: &CasConfig) -> Result<Self> {
        let mut registry = IndexRegistry::new(Arc::clone(&types));
        let annotation_index = registry.register(IndexDefinition::annotation(
            ANNOTATION_INDEX,
            types.annotation_type(),
        ))?;
        for index in &config.indexes {
            registry.register(index.to_definition(types.as_ref())?)?;
        }
        debug!(
            target: "castor::cas",
            indexes = registry.len(),
            flatten = config.flatten.enabled,
            "Store created"
        );
        Ok(Self {
            types,
            registry,
            flat: FlatCache::new(config.flatten.enabled, config.flatten.max_entries),
            records: FxHashMap::default(),
            indexed: FxHashSet::default(),
            indexed_order: Vec::new(),
            next_id: AtomicU64::new(1),
            document_annotation: None,
            annotation_index,
        })
    }

    /// Type system of this store
    pub fn types(&self) -> &Arc<dyn TypeCapability> {
        &self.types
    }

    /// Flat cache shared by all queries of this store
    pub fn flat_cache(&self) -> &FlatCache {
        &self.flat
    }

    fn issue_id(&self) -> FsId {
        FsId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // ========================================
    // Record creation
    // ========================================

    /// Start building a record of type `t`
    pub fn create(&mut self, t: TypeId) -> FsBuilder<'_> {
        FsBuilder {
            cas: self,
            type_id: t,
            span: None,
            features: BTreeMap::new(),
        }
    }

    /// Create an annotation over `[begin, end)` without indexing it
    pub fn create_annotation(&mut self, t: TypeId, begin: i32, end: i32) -> Result<FsRef> {
        self.create(t).span(begin, end).build()
    }

    /// Create an annotation and add it to the indexes
    pub fn create_and_add_annotation(&mut self, t: TypeId, begin: i32, end: i32) -> Result<FsRef> {
        let fs = self.create_annotation(t, begin, end)?;
        self.add_fs(&fs);
        Ok(fs)
    }

    /// Record by id
    pub fn get_fs(&self, id: FsId) -> Option<&FsRef> {
        self.records.get(&id)
    }

    /// Number of records known to the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no record was created since the last reset
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ========================================
    // Index maintenance
    // ========================================

    /// Add a record to every index of its type and supertypes
    ///
    /// Returns how many indexes took it; adding twice is a no-op.
    pub fn add_fs(&mut self, fs: &FsRef) -> usize {
        self.records
            .entry(fs.id())
            .or_insert_with(|| Arc::clone(fs));
        if self.indexed.insert(fs.id()) {
            self.indexed_order.push(fs.id());
        }
        self.registry.add(fs)
    }

    /// Remove a record from every index; the record stays known
    pub fn remove_fs(&mut self, fs: &FeatureStructure) -> usize {
        if self.indexed.remove(&fs.id()) {
            self.indexed_order.retain(|id| *id != fs.id());
        }
        self.registry.remove(fs)
    }

    /// True if the record is in the indexes
    pub fn is_indexed(&self, fs: &FeatureStructure) -> bool {
        self.indexed.contains(&fs.id())
    }

    /// Replace the whole-document annotation with `[0, end)`
    pub fn set_document_annotation(&mut self, end: i32) -> Result<FsRef> {
        if let Some(previous) = self.document_annotation.take() {
            self.remove_fs(&previous);
        }
        let fs = self.create_and_add_annotation(self.types.document_annotation_type(), 0, end)?;
        debug!(target: "castor::cas", fs = %fs.id(), end, "Document annotation set");
        self.document_annotation = Some(Arc::clone(&fs));
        Ok(fs)
    }

    /// Current whole-document annotation
    pub fn document_annotation(&self) -> Option<&FsRef> {
        self.document_annotation.as_ref()
    }

    /// Register another index and fill it with the indexed records
    ///
    /// Records are replayed in the order they were added, so a bag index
    /// defined late still yields insertion order.
    pub fn define_index(&mut self, definition: IndexDefinition) -> Result<IndexId> {
        let id = self.registry.register(definition)?;
        let mut backfilled = 0;
        for fs_id in &self.indexed_order {
            if let Some(fs) = self.records.get(fs_id) {
                if self.registry.insert_into(id, fs) {
                    backfilled += 1;
                }
            }
        }
        trace!(target: "castor::cas", index = %id, backfilled, "Index backfilled");
        Ok(id)
    }

    /// Drop every record and empty every index; ids keep counting
    pub fn reset(&mut self) {
        debug!(target: "castor::cas", records = self.records.len(), "Store reset");
        self.records.clear();
        self.indexed.clear();
        self.indexed_order.clear();
        self.registry.clear();
        self.flat.clear();
        self.document_annotation = None;
    }

    // ========================================
    // Queries
    // ========================================

    fn view(&self, id: IndexId) -> Result<IndexView<'_>> {
        let index = self
            .registry
            .get(id)
            .ok_or_else(|| Error::IndexNotFound(id.to_string()))?;
        Ok(IndexView::new(index, self.types.as_ref(), &self.flat))
    }

    /// The built-in annotation index
    pub fn annotation_index(&self) -> IndexView<'_> {
        IndexView::new(
            self.registry.index(self.annotation_index),
            self.types.as_ref(),
            &self.flat,
        )
    }

    /// The annotation index narrowed to `t`
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if `t` is not in the annotation hierarchy.
    pub fn annotation_index_of(&self, t: TypeId) -> Result<IndexView<'_>> {
        if !self.types.is_annotation(t) {
            return Err(Error::type_mismatch(
                self.types.display_name(self.types.annotation_type()),
                self.types.display_name(t),
            ));
        }
        self.annotation_index().with_type(t)
    }

    /// Index by label
    pub fn index(&self, label: &str) -> Result<IndexView<'_>> {
        let id = self
            .registry
            .id_of(label)
            .ok_or_else(|| Error::IndexNotFound(label.to_string()))?;
        self.view(id)
    }

    /// Query over the annotation index narrowed to `t`
    pub fn select(&self, t: TypeId) -> Result<Select<'_>> {
        Ok(self.annotation_index_of(t)?.select())
    }
}

/// Builder for a new record
#[derive(Debug)]
pub struct FsBuilder<'a> {
    cas: &'a mut Cas,
    type_id: TypeId,
    span: Option<Span>,
    features: BTreeMap<String, FeatureValue>,
}

impl FsBuilder<'_> {
    /// Set the interval
    pub fn span(mut self, begin: i32, end: i32) -> Self {
        self.span = Some(Span::new(begin, end));
        self
    }

    /// Set a feature value
    pub fn feature(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }

    /// Validate, issue an id and register the record with the store
    ///
    /// # Errors
    ///
    /// - `UnknownType` for an undeclared type
    /// - `UnknownFeature` for a feature the type does not declare
    /// - `TypeMismatch` for a value outside the feature's range, or a span
    ///   set on a non-annotation type (or missing on an annotation type)
    pub fn build(self) -> Result<FsRef> {
        let types = Arc::clone(&self.cas.types);
        let t = self.type_id;
        if types.type_name(t).is_none() {
            return Err(Error::UnknownType(t.to_string()));
        }
        for (name, value) in &self.features {
            let decl = types.feature(t, name).ok_or_else(|| Error::UnknownFeature {
                type_name: types.display_name(t),
                feature: name.clone(),
            })?;
            if !decl.range.admits(value) {
                return Err(Error::type_mismatch(
                    format!("{:?}", decl.range),
                    value.to_string(),
                ));
            }
        }
        match (types.is_annotation(t), self.span.is_some()) {
            (true, false) => {
                return Err(Error::type_mismatch(
                    "record with a span",
                    types.display_name(t),
                ))
            }
            (false, true) => {
                return Err(Error::type_mismatch(
                    types.display_name(types.annotation_type()),
                    types.display_name(t),
                ))
            }
            _ => {}
        }

        let fs = Arc::new(FeatureStructure::new(
            self.cas.issue_id(),
            t,
            self.span,
            self.features,
        ));
        self.cas.records.insert(fs.id(), Arc::clone(&fs));
        Ok(fs)
    }
}
