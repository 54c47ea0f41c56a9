//! Compilation symbol table
//!
//! The unit a session is scoped to. Only the lookups the analysis needs are
//! modelled: types by metadata name and declared fields per type.

use super::symbols::{FieldRef, TypeRef};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compilation identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompilationId(pub u64);

impl fmt::Display for CompilationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compilation#{}", self.0)
    }
}

/// Read-only symbol table for one compilation
#[derive(Debug, Clone)]
pub struct Compilation {
    pub id: CompilationId,
    types: FxHashMap<String, TypeRef>,
    fields: FxHashMap<String, Vec<FieldRef>>,
}

impl Compilation {
    pub fn new(id: CompilationId) -> Self {
        Self {
            id,
            types: FxHashMap::default(),
            fields: FxHashMap::default(),
        }
    }

    /// Register a type under its metadata name
    pub fn add_type(&mut self, ty: TypeRef) -> &mut Self {
        self.types.insert(ty.name.clone(), ty);
        self
    }

    /// Register a field declared by `field.containing_type`
    pub fn add_field(&mut self, field: FieldRef) -> &mut Self {
        self.fields
            .entry(field.containing_type.clone())
            .or_default()
            .push(field);
        self
    }

    pub fn get_type_by_metadata_name(&self, name: &str) -> Option<TypeRef> {
        self.types.get(name).cloned()
    }

    /// Fields declared directly by the named type
    pub fn fields_of(&self, type_name: &str) -> &[FieldRef] {
        self.fields
            .get(type_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
