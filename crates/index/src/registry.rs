//! Index registry and type fan-out
//!
//! The registry owns every [`FsIndex`] of a store. Adding a record routes it
//! to each index whose base type is a supertype-or-equal of the record's
//! type. The routing list per concrete type is computed on first use and
//! cached; registering an index drops the cache.

use crate::definition::{IndexDefinition, IndexId};
use crate::index::FsIndex;
use castor_core::{Error, FeatureStructure, FsRef, Result, SortKey, TypeCapability, TypeId};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

/// Fan-out list; most types feed a handful of indexes
pub type FanOut = SmallVec<[IndexId; 4]>;

/// Owner of all indexes of a store
#[derive(Debug)]
pub struct IndexRegistry {
    types: Arc<dyn TypeCapability>,
    indexes: Vec<FsIndex>,
    by_label: FxHashMap<String, IndexId>,
    fan_out: Mutex<FxHashMap<TypeId, FanOut>>,
}

impl IndexRegistry {
    /// Empty registry over a type system
    pub fn new(types: Arc<dyn TypeCapability>) -> Self {
        Self {
            types,
            indexes: Vec::new(),
            by_label: FxHashMap::default(),
            fan_out: Mutex::new(FxHashMap::default()),
        }
    }

    /// Type system the indexes order by
    pub fn types(&self) -> &Arc<dyn TypeCapability> {
        &self.types
    }

    /// Validate and register a new index
    ///
    /// # Errors
    ///
    /// - `DuplicateIndex` if the label is taken
    /// - `UnknownType` if the base type is not declared
    /// - `UnknownFeature` if a feature key is not declared on the base type
    /// - `TypeMismatch` if span keys are used on a non-annotation base type
    pub fn register(&mut self, definition: IndexDefinition) -> Result<IndexId> {
        if self.by_label.contains_key(&definition.label) {
            return Err(Error::DuplicateIndex(definition.label));
        }
        self.validate(&definition)?;

        let id = IndexId::new(self.indexes.len());
        debug!(
            target: "castor::index",
            label = %definition.label,
            base_type = %self.types.display_name(definition.base_type),
            kind = ?definition.kind,
            %id,
            "Index registered"
        );
        self.by_label.insert(definition.label.clone(), id);
        self.indexes
            .push(FsIndex::new(id, definition, Arc::clone(&self.types)));
        self.fan_out.lock().clear();
        Ok(id)
    }

    fn validate(&self, definition: &IndexDefinition) -> Result<()> {
        let base = definition.base_type;
        if self.types.type_name(base).is_none() {
            return Err(Error::UnknownType(base.to_string()));
        }
        if definition.uses_span_keys() && !self.types.is_annotation(base) {
            return Err(Error::type_mismatch(
                self.types.display_name(self.types.annotation_type()),
                self.types.display_name(base),
            ));
        }
        for key in &definition.keys {
            if let SortKey::Feature { name, .. } = key {
                if self.types.feature(base, name).is_none() {
                    return Err(Error::UnknownFeature {
                        type_name: self.types.display_name(base),
                        feature: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Index by handle
    pub fn get(&self, id: IndexId) -> Option<&FsIndex> {
        self.indexes.get(id.index())
    }

    /// Index by a handle this registry issued
    ///
    /// # Panics
    ///
    /// If `id` came from another registry.
    pub fn index(&self, id: IndexId) -> &FsIndex {
        &self.indexes[id.index()]
    }

    /// Index by label
    pub fn lookup(&self, label: &str) -> Result<&FsIndex> {
        self.id_of(label)
            .and_then(|id| self.get(id))
            .ok_or_else(|| Error::IndexNotFound(label.to_string()))
    }

    /// Handle of a label, if registered
    pub fn id_of(&self, label: &str) -> Option<IndexId> {
        self.by_label.get(label).copied()
    }

    /// Number of registered indexes
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Registered indexes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &FsIndex> {
        self.indexes.iter()
    }

    /// Indexes a record of type `t` is routed to
    pub fn indexes_for(&self, t: TypeId) -> FanOut {
        let mut cache = self.fan_out.lock();
        if let Some(ids) = cache.get(&t) {
            return ids.clone();
        }
        let ids: FanOut = self
            .indexes
            .iter()
            .filter(|index| self.types.is_subtype_of(t, index.definition().base_type))
            .map(FsIndex::id)
            .collect();
        cache.insert(t, ids.clone());
        ids
    }

    /// Insert a record into every matching index; returns how many took it
    pub fn add(&mut self, fs: &FsRef) -> usize {
        let targets = self.indexes_for(fs.type_id());
        let mut added = 0;
        for id in &targets {
            if self.indexes[id.index()].insert(Arc::clone(fs)) {
                added += 1;
            }
        }
        trace!(
            target: "castor::index",
            fs = %fs.id(),
            fan_out = targets.len(),
            added,
            "Record added"
        );
        added
    }

    /// Insert a record into one index if its type matches the index's base type
    pub fn insert_into(&mut self, id: IndexId, fs: &FsRef) -> bool {
        let types = Arc::clone(&self.types);
        match self.indexes.get_mut(id.index()) {
            Some(index) if types.is_subtype_of(fs.type_id(), index.definition().base_type) => {
                index.insert(Arc::clone(fs))
            }
            _ => false,
        }
    }

    /// Remove a record from every matching index; returns how many held it
    pub fn remove(&mut self, fs: &FeatureStructure) -> usize {
        let targets = self.indexes_for(fs.type_id());
        let mut removed = 0;
        for id in &targets {
            if self.indexes[id.index()].remove(fs) {
                removed += 1;
            }
        }
        trace!(target: "castor::index", fs = %fs.id(), removed, "Record removed");
        removed
    }

    /// True if any index holds the record
    pub fn is_indexed(&self, fs: &FeatureStructure) -> bool {
        self.indexes_for(fs.type_id())
            .iter()
            .any(|id| self.indexes[id.index()].contains(fs))
    }

    /// Empty every index; definitions stay registered
    pub fn clear(&mut self) {
        for index in &mut self.indexes {
            index.clear();
        }
    }
}
