//! Store configuration via TOML
//!
//! A store is configured with a small TOML document: flat-cache settings
//! plus any indexes to register next to the built-in annotation index.
//! Every field has a default, so an empty document is a valid config.

use castor_core::{Direction, Error, Result, SortKey, TypeCapability};
use castor_index::{IndexDefinition, IndexKind};
use castor_query::DEFAULT_MAX_ENTRIES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Flat cache settings, `[flatten]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlattenConfig {
    /// Cache materialized query results per index version
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Entry bound before the cache is purged
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_entries: default_max_entries(),
        }
    }
}

/// One feature sort key of a configured index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexKeyConfig {
    /// Feature name, declared on the index type or a supertype
    pub feature: String,
    /// `"asc"` (default) or `"desc"`
    #[serde(default = "default_direction")]
    pub direction: Direction,
}

fn default_direction() -> Direction {
    Direction::Ascending
}

/// Extra index, `[[index]]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexConfig {
    /// Unique label
    pub label: String,
    /// Base type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// `"sorted"` (default), `"set"` or `"bag"`
    #[serde(default = "default_kind")]
    pub kind: IndexKind,
    /// Feature keys; empty keys on an annotation type mean annotation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<IndexKeyConfig>,
}

fn default_kind() -> IndexKind {
    IndexKind::Sorted
}

impl IndexConfig {
    /// Resolve names against a type system
    ///
    /// # Errors
    ///
    /// `UnknownType` if the type name is not declared. Feature keys are
    /// checked when the definition is registered.
    pub fn to_definition(&self, types: &dyn TypeCapability) -> Result<IndexDefinition> {
        let base_type = types
            .type_by_name(&self.type_name)
            .ok_or_else(|| Error::UnknownType(self.type_name.clone()))?;
        let mut keys: Vec<SortKey> = self
            .keys
            .iter()
            .map(|k| SortKey::Feature {
                name: k.feature.clone(),
                direction: k.direction,
            })
            .collect();
        if keys.is_empty() && self.kind != IndexKind::Bag && types.is_annotation(base_type) {
            keys = vec![SortKey::Begin, SortKey::EndDescending];
        }
        Ok(IndexDefinition {
            label: self.label.clone(),
            base_type,
            kind: self.kind,
            keys,
        })
    }
}

/// Store configuration
///
/// # Example
///
/// ```toml
/// [flatten]
/// enabled = true
/// max_entries = 256
///
/// [[index]]
/// label = "tokens-by-lemma"
/// type = "Token"
/// kind = "sorted"
/// keys = [{ feature = "lemma", direction = "asc" }]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CasConfig {
    /// Flat cache settings
    #[serde(default)]
    pub flatten: FlattenConfig,
    /// Extra indexes, registered in order
    #[serde(default, rename = "index", skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexConfig>,
}

impl CasConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# castor store configuration
#
# Flattening: keep materialized query results until their index mutates
[flatten]
enabled = true
max_entries = 256

# Extra indexes next to the built-in annotation index.
# kind is "sorted" (default), "set" or "bag".
# [[index]]
# label = "tokens-by-lemma"
# type = "Token"
# kind = "sorted"
# keys = [{ feature = "lemma", direction = "asc" }]
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
