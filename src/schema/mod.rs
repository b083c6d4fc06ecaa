//! Record schema registry
//!
//! The attribute path resolver needs one thing from the host application:
//! the attribute table of a record type. [`SchemaProvider`] is that seam.
//! [`SchemaRegistry`] is the default provider, an explicit service the host
//! owns and populates.
//!
//! Record types may extend a parent and inherit its attributes. The registry
//! caches each type's flattened table on first lookup; redefining or
//! reopening a type drops its cached table and the tables of every type that
//! inherits from it.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::SchemaError;

/// What an attribute holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    /// Plain value of the named type
    Scalar(String),
    /// Reference to a single record of the named type
    ToOne(String),
    /// Reference to many records of the named type
    ToMany(String),
}

/// A record attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn scalar(type_name: impl Into<String>) -> Self {
        Self {
            kind: AttributeKind::Scalar(type_name.into()),
        }
    }

    pub fn to_one(record_type: impl Into<String>) -> Self {
        Self {
            kind: AttributeKind::ToOne(record_type.into()),
        }
    }

    pub fn to_many(record_type: impl Into<String>) -> Self {
        Self {
            kind: AttributeKind::ToMany(record_type.into()),
        }
    }

    /// Whether the attribute points at other records
    pub fn is_relation(&self) -> bool {
        matches!(self.kind, AttributeKind::ToOne(_) | AttributeKind::ToMany(_))
    }

    /// Record type on the other end of a relation
    pub fn related_type(&self) -> Option<&str> {
        match &self.kind {
            AttributeKind::ToOne(name) | AttributeKind::ToMany(name) => Some(name),
            AttributeKind::Scalar(_) => None,
        }
    }
}

/// Attribute name to attribute, in declaration order
pub type AttributeTable = IndexMap<String, Attribute>;

/// Read-only access to record attribute tables
pub trait SchemaProvider {
    /// Attribute table of `record_type`, or `None` if it is not known.
    ///
    /// Implementations own any caching and must never hand out a table that
    /// a later redefinition has made stale.
    fn attributes(&self, record_type: &str) -> Option<Arc<AttributeTable>>;
}

/// A registered record type
#[derive(Debug, Clone, Default)]
struct RecordTypeDef {
    parent: Option<String>,
    attributes: AttributeTable,
}

#[derive(Debug, Default)]
struct RegistryState {
    definitions: IndexMap<String, RecordTypeDef>,
    /// Flattened tables, filled on lookup
    cache: HashMap<String, Arc<AttributeTable>>,
}

impl RegistryState {
    fn subtypes(&self, name: &str) -> Vec<String> {
        self.definitions
            .iter()
            .filter(|(_, def)| def.parent.as_deref() == Some(name))
            .map(|(sub, _)| sub.clone())
            .collect()
    }

    /// Drop cached tables for `name` and everything inheriting from it
    fn invalidate(&mut self, name: &str) {
        let mut pending = vec![name.to_string()];
        let mut seen = HashSet::new();

        while let Some(current) = pending.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            self.cache.remove(&current);
            pending.extend(self.subtypes(&current));
        }
        debug!("Invalidated attribute cache for {} record type(s)", seen.len());
    }

    /// `name` followed by its ancestors, nearest first
    fn lineage(&self, name: &str) -> Option<Vec<&RecordTypeDef>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(name);

        while let Some(type_name) = current {
            if !seen.insert(type_name) {
                break;
            }
            let def = self.definitions.get(type_name)?;
            chain.push(def);
            current = def.parent.as_deref();
        }
        Some(chain)
    }

    fn flatten(&self, name: &str) -> Option<AttributeTable> {
        let lineage = self.lineage(name)?;
        let mut table = AttributeTable::new();
        for def in lineage.into_iter().rev() {
            for (attr_name, attribute) in &def.attributes {
                table.insert(attr_name.clone(), attribute.clone());
            }
        }
        Some(table)
    }

    fn is_ancestor_or_self(&self, candidate: &str, of: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(of);
        while let Some(type_name) = current {
            if type_name == candidate {
                return true;
            }
            if !seen.insert(type_name) {
                return false;
            }
            current = self
                .definitions
                .get(type_name)
                .and_then(|def| def.parent.as_deref());
        }
        false
    }
}

/// Default [`SchemaProvider`], owned and populated by the host
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    state: RwLock<RegistryState>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a root record type
    pub fn define(&self, name: impl Into<String>, attributes: AttributeTable) {
        let name = name.into();
        let mut state = self.write();
        state.definitions.insert(
            name.clone(),
            RecordTypeDef {
                parent: None,
                attributes,
            },
        );
        state.invalidate(&name);
        debug!("Defined record type {}", name);
    }

    /// Define (or redefine) a record type inheriting from `parent`
    pub fn extend(
        &self,
        parent: &str,
        name: impl Into<String>,
        attributes: AttributeTable,
    ) -> Result<(), SchemaError> {
        let name = name.into();
        let mut state = self.write();

        if !state.definitions.contains_key(parent) {
            return Err(SchemaError::UnknownParent {
                record_type: name,
                parent: parent.to_string(),
            });
        }
        if state.is_ancestor_or_self(&name, parent) {
            return Err(SchemaError::InheritanceCycle(name));
        }

        state.definitions.insert(
            name.clone(),
            RecordTypeDef {
                parent: Some(parent.to_string()),
                attributes,
            },
        );
        state.invalidate(&name);
        debug!("Defined record type {} extending {}", name, parent);
        Ok(())
    }

    /// Add or replace attributes on an existing record type
    pub fn reopen(&self, name: &str, attributes: AttributeTable) -> Result<(), SchemaError> {
        let mut state = self.write();
        let def = state
            .definitions
            .get_mut(name)
            .ok_or_else(|| SchemaError::UnknownRecordType(name.to_string()))?;
        def.attributes.extend(attributes);
        state.invalidate(name);
        debug!("Reopened record type {}", name);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().definitions.contains_key(name)
    }

    /// Registered record type names, in definition order
    pub fn record_types(&self) -> Vec<String> {
        self.read().definitions.keys().cloned().collect()
    }

    /// Direct subtypes of `name`
    pub fn subtypes(&self, name: &str) -> Vec<String> {
        self.read().subtypes(name)
    }

    /// Parent of `name`, if it extends one
    pub fn parent(&self, name: &str) -> Option<String> {
        self.read()
            .definitions
            .get(name)
            .and_then(|def| def.parent.clone())
    }

    #[cfg(test)]
    fn is_cached(&self, name: &str) -> bool {
        self.read().cache.contains_key(name)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SchemaProvider for SchemaRegistry {
    fn attributes(&self, record_type: &str) -> Option<Arc<AttributeTable>> {
        if let Some(table) = self.read().cache.get(record_type) {
            return Some(Arc::clone(table));
        }

        let mut state = self.write();
        let table = Arc::new(state.flatten(record_type)?);
        state
            .cache
            .insert(record_type.to_string(), Arc::clone(&table));
        Some(table)
    }
}
