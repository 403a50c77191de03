//! Type capability consumed by the index and query engine
//!
//! The engine never walks a type hierarchy itself. It asks a
//! [`TypeCapability`] three kinds of questions:
//! - is one type a subtype of another (index fan-out, type filters)
//! - what is a type's priority rank (same-span tie-breaking)
//! - which features does a type declare (record validation, feature keys)
//!
//! [`TypeTable`] is the precomputed implementation. It is built once by
//! [`TypeTableBuilder`] and answers every question in O(1):
//! - subtype tests use DFS pre/post numbering of the hierarchy
//! - priority ranks are resolved per type at build time
//! - feature declarations are flattened to include inherited features
//!
//! Three types always exist: [`TYPE_NAME_TOP`] (root),
//! [`TYPE_NAME_ANNOTATION`] (interval-bearing records) and
//! [`TYPE_NAME_DOCUMENT_ANNOTATION`] (the whole-document span).

use crate::error::{Error, Result};
use crate::types::TypeId;
use crate::value::FeatureValue;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the root type
pub const TYPE_NAME_TOP: &str = "Top";
/// Name of the root of every interval-bearing type
pub const TYPE_NAME_ANNOTATION: &str = "Annotation";
/// Name of the whole-document annotation type
pub const TYPE_NAME_DOCUMENT_ANNOTATION: &str = "DocumentAnnotation";

/// Value range of a declared feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureRange {
    /// Integer slot
    Int,
    /// Floating point slot
    Float,
    /// Boolean slot
    Bool,
    /// String slot
    Str,
    /// Reference to another feature structure
    Ref,
}

impl FeatureRange {
    /// True if `value` may be stored in a slot of this range; `Null` always fits
    pub fn admits(self, value: &FeatureValue) -> bool {
        matches!(
            (self, value),
            (_, FeatureValue::Null)
                | (FeatureRange::Int, FeatureValue::Int(_))
                | (FeatureRange::Float, FeatureValue::Float(_))
                | (FeatureRange::Bool, FeatureValue::Bool(_))
                | (FeatureRange::Str, FeatureValue::Str(_))
                | (FeatureRange::Ref, FeatureValue::Ref(_))
        )
    }
}

/// Feature declaration on a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDecl {
    /// Short feature name, unique within the type and its supertypes
    pub name: String,
    /// Declared value range
    pub range: FeatureRange,
    /// Type that introduced the feature
    pub declared_on: TypeId,
}

/// Type-system questions the engine depends on
///
/// Implementations must be pure: the same question always gets the same
/// answer for the lifetime of a store.
pub trait TypeCapability: fmt::Debug + Send + Sync {
    /// True if `sub` equals `sup` or inherits from it
    fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool;

    /// Priority rank for same-span ordering; lower ranks sort first
    fn priority_rank(&self, t: TypeId) -> u32;

    /// Feature declared on `t` or inherited from a supertype
    fn feature(&self, t: TypeId, name: &str) -> Option<&FeatureDecl>;

    /// Fully qualified type name
    fn type_name(&self, t: TypeId) -> Option<&str>;

    /// Look a type up by name
    fn type_by_name(&self, name: &str) -> Option<TypeId>;

    /// Root type
    fn top_type(&self) -> TypeId;

    /// Root of the interval-bearing types
    fn annotation_type(&self) -> TypeId;

    /// Type of the whole-document annotation
    fn document_annotation_type(&self) -> TypeId;

    /// True if records of `t` carry a span
    fn is_annotation(&self, t: TypeId) -> bool {
        self.is_subtype_of(t, self.annotation_type())
    }

    /// Name for messages; falls back to the numeric id
    fn display_name(&self, t: TypeId) -> String {
        self.type_name(t)
            .map(str::to_string)
            .unwrap_or_else(|| t.to_string())
    }
}

#[derive(Debug, Clone)]
struct TypeDef {
    name: String,
    parent: Option<TypeId>,
    features: Vec<FeatureDecl>,
}

/// Incrementally declares types, features and priorities
#[derive(Debug, Clone)]
pub struct TypeTableBuilder {
    types: Vec<TypeDef>,
    by_name: FxHashMap<String, TypeId>,
    priorities: Vec<TypeId>,
}

impl TypeTableBuilder {
    /// Start a builder holding the three built-in types
    pub fn new() -> Self {
        let mut builder = Self {
            types: Vec::new(),
            by_name: FxHashMap::default(),
            priorities: Vec::new(),
        };
        builder.push(TYPE_NAME_TOP, None);
        builder.push(TYPE_NAME_ANNOTATION, Some(TypeTable::TOP));
        builder.push(TYPE_NAME_DOCUMENT_ANNOTATION, Some(TypeTable::ANNOTATION));
        builder
    }

    fn push(&mut self, name: &str, parent: Option<TypeId>) -> TypeId {
        let id = TypeId::new(self.types.len() as u32);
        self.types.push(TypeDef {
            name: name.to_string(),
            parent,
            features: Vec::new(),
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    fn check(&self, t: TypeId) -> Result<()> {
        if t.index() < self.types.len() {
            Ok(())
        } else {
            Err(Error::UnknownType(t.to_string()))
        }
    }

    /// Declare a new type inheriting from `parent`
    pub fn add_type(&mut self, name: &str, parent: TypeId) -> Result<TypeId> {
        self.check(parent)?;
        if self.by_name.contains_key(name) {
            return Err(Error::DuplicateType(name.to_string()));
        }
        Ok(self.push(name, Some(parent)))
    }

    /// Declare a feature on `t`
    ///
    /// Re-declaring a name already visible on `t` (own or inherited) is
    /// accepted when the range matches and rejected otherwise.
    pub fn add_feature(&mut self, t: TypeId, name: &str, range: FeatureRange) -> Result<()> {
        self.check(t)?;
        let mut cursor = Some(t);
        while let Some(current) = cursor {
            let def = &self.types[current.index()];
            if let Some(existing) = def.features.iter().find(|f| f.name == name) {
                if existing.range == range {
                    return Ok(());
                }
                return Err(Error::type_mismatch(
                    format!("{:?} feature '{}'", existing.range, name),
                    format!("{:?}", range),
                ));
            }
            cursor = def.parent;
        }
        self.types[t.index()].features.push(FeatureDecl {
            name: name.to_string(),
            range,
            declared_on: t,
        });
        Ok(())
    }

    /// Set the type priority list, highest priority first
    ///
    /// Subtypes of a listed type share its rank unless listed themselves.
    pub fn set_priorities(&mut self, order: &[TypeId]) -> Result<()> {
        for &t in order {
            self.check(t)?;
        }
        self.priorities = order.to_vec();
        Ok(())
    }

    /// Look up a type declared so far
    pub fn type_by_name(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Freeze the declarations into a lookup table
    pub fn build(self) -> TypeTable {
        let n = self.types.len();

        let mut children: Vec<Vec<TypeId>> = vec![Vec::new(); n];
        for (i, def) in self.types.iter().enumerate() {
            if let Some(parent) = def.parent {
                children[parent.index()].push(TypeId::new(i as u32));
            }
        }

        // Pre/post numbering: sub <= sup iff sup's interval encloses sub's.
        let mut pre = vec![0u32; n];
        let mut post = vec![0u32; n];
        let mut counter = 0u32;
        let mut stack: Vec<(TypeId, bool)> = vec![(TypeTable::TOP, false)];
        while let Some((t, done)) = stack.pop() {
            if done {
                post[t.index()] = counter;
                counter += 1;
                continue;
            }
            pre[t.index()] = counter;
            counter += 1;
            stack.push((t, true));
            for &child in children[t.index()].iter().rev() {
                stack.push((child, false));
            }
        }

        let mut listed: FxHashMap<TypeId, u32> = FxHashMap::default();
        for (rank, t) in self.priorities.iter().enumerate() {
            listed.entry(*t).or_insert(rank as u32);
        }
        let unlisted = self.priorities.len() as u32;
        let ranks = (0..n)
            .map(|i| {
                let mut cursor = Some(TypeId::new(i as u32));
                while let Some(t) = cursor {
                    if let Some(rank) = listed.get(&t) {
                        return *rank;
                    }
                    cursor = self.types[t.index()].parent;
                }
                unlisted
            })
            .collect();

        let features = (0..n)
            .map(|i| {
                let mut all: FxHashMap<String, FeatureDecl> = FxHashMap::default();
                let mut cursor = Some(TypeId::new(i as u32));
                while let Some(t) = cursor {
                    let def = &self.types[t.index()];
                    for decl in &def.features {
                        all.entry(decl.name.clone()).or_insert_with(|| decl.clone());
                    }
                    cursor = def.parent;
                }
                all
            })
            .collect();

        TypeTable {
            names: self.types.into_iter().map(|def| def.name).collect(),
            by_name: self.by_name,
            pre,
            post,
            ranks,
            features,
        }
    }
}

impl Default for TypeTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Precomputed type hierarchy, priority ranks and feature declarations
#[derive(Debug, Clone)]
pub struct TypeTable {
    names: Vec<String>,
    by_name: FxHashMap<String, TypeId>,
    pre: Vec<u32>,
    post: Vec<u32>,
    ranks: Vec<u32>,
    features: Vec<FxHashMap<String, FeatureDecl>>,
}

impl TypeTable {
    /// Root type id
    pub const TOP: TypeId = TypeId::new(0);
    /// Annotation type id
    pub const ANNOTATION: TypeId = TypeId::new(1);
    /// Document annotation type id
    pub const DOCUMENT_ANNOTATION: TypeId = TypeId::new(2);

    /// Start declaring a type table
    pub fn builder() -> TypeTableBuilder {
        TypeTableBuilder::new()
    }

    /// Number of declared types, built-ins included
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: the built-in types are present
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a type name or fail with `UnknownType`
    pub fn require(&self, name: &str) -> Result<TypeId> {
        self.type_by_name(name)
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    fn known(&self, t: TypeId) -> bool {
        t.index() < self.names.len()
    }
}

impl TypeCapability for TypeTable {
    fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        if !self.known(sub) || !self.known(sup) {
            return false;
        }
        let (s, p) = (sub.index(), sup.index());
        self.pre[p] <= self.pre[s] && self.post[s] <= self.post[p]
    }

    fn priority_rank(&self, t: TypeId) -> u32 {
        self.ranks.get(t.index()).copied().unwrap_or(u32::MAX)
    }

    fn feature(&self, t: TypeId, name: &str) -> Option<&FeatureDecl> {
        self.features.get(t.index()).and_then(|all| all.get(name))
    }

    fn type_name(&self, t: TypeId) -> Option<&str> {
        self.names.get(t.index()).map(String::as_str)
    }

    fn type_by_name(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    fn top_type(&self) -> TypeId {
        Self::TOP
    }

    fn annotation_type(&self) -> TypeId {
        Self::ANNOTATION
    }

    fn document_annotation_type(&self) -> TypeId {
        Self::DOCUMENT_ANNOTATION
    }
}
