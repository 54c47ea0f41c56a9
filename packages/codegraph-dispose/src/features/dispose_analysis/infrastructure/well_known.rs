//! Well-known types resolved from a compilation

use crate::config::WellKnownTypeNames;
use crate::errors::{DisposeError, Result};
use crate::shared::models::{Compilation, TypeRef, TypeSymbol};

/// Types the dispose rules are keyed on
#[derive(Debug, Clone)]
pub struct WellKnownTypes {
    /// Disposable-resource protocol interface
    pub disposable: TypeRef,
    pub async_disposable: Option<TypeRef>,
    pub task: Option<TypeRef>,
    pub generic_task: Option<TypeRef>,
    pub value_task: Option<TypeRef>,
    pub generic_value_task: Option<TypeRef>,
    pub collection_interfaces: Vec<TypeRef>,
}

impl WellKnownTypes {
    /// Resolve by metadata name; only the disposable interface is required.
    pub fn resolve(compilation: &Compilation, names: &WellKnownTypeNames) -> Result<Self> {
        let disposable = compilation
            .get_type_by_metadata_name(&names.disposable)
            .ok_or_else(|| DisposeError::MissingWellKnownType(names.disposable.clone()))?;

        Ok(Self {
            disposable,
            async_disposable: compilation.get_type_by_metadata_name(&names.async_disposable),
            task: compilation.get_type_by_metadata_name(&names.task),
            generic_task: compilation.get_type_by_metadata_name(&names.generic_task),
            value_task: compilation.get_type_by_metadata_name(&names.value_task),
            generic_value_task: compilation.get_type_by_metadata_name(&names.generic_value_task),
            collection_interfaces: names
                .collection_interfaces
                .iter()
                .filter_map(|n| compilation.get_type_by_metadata_name(n))
                .collect(),
        })
    }

    pub fn is_disposable(&self, ty: &TypeSymbol) -> bool {
        ty.inherits_or_implements(&self.disposable.name)
            || self
                .async_disposable
                .as_ref()
                .is_some_and(|a| ty.inherits_or_implements(&a.name))
    }

    pub fn is_task(&self, ty: &TypeSymbol) -> bool {
        [&self.task, &self.generic_task]
            .into_iter()
            .flatten()
            .any(|t| ty.inherits_or_implements(&t.name))
    }

    /// `ValueTask` or `ValueTask<T>`; these are structs, so matched by name
    pub fn is_value_task(&self, ty: &TypeSymbol) -> bool {
        [&self.value_task, &self.generic_value_task]
            .into_iter()
            .flatten()
            .any(|t| t.name == ty.name)
    }

    /// Disposable reference type other than a task
    pub fn is_tracked_type(&self, ty: &TypeSymbol) -> bool {
        !ty.is_value_type() && !self.is_task(ty) && self.is_disposable(ty)
    }

    pub fn is_collection(&self, ty: &TypeSymbol) -> bool {
        self.collection_interfaces
            .iter()
            .any(|c| ty.inherits_or_implements(&c.name))
    }
}
