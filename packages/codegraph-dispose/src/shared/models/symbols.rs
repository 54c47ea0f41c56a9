//! Symbol models consumed by the analysis
//!
//! Produced by semantic binding; the analysis only reads them. Types are
//! shared through `Arc` so operation trees, parameters and locations can all
//! point at the same symbol without copying.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a type symbol
pub type TypeRef = Arc<TypeSymbol>;

/// Shared handle to a method symbol
pub type MethodRef = Arc<MethodSymbol>;

/// Shared handle to a field symbol
pub type FieldRef = Arc<FieldSymbol>;

/// Type kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    /// Value type
    Struct,
    Interface,
    Delegate,
    Array,
    TypeParameter,
    /// Unresolved type
    Error,
}

/// Type symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    /// Fully qualified metadata name (e.g. `System.IO.Stream`)
    pub name: String,
    pub kind: TypeKind,
    pub base_type: Option<TypeRef>,
    /// Directly implemented interfaces
    pub interfaces: Vec<TypeRef>,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base_type: None,
            interfaces: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn value_type(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base_type = Some(base);
        self
    }

    pub fn implementing(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn into_ref(self) -> TypeRef {
        Arc::new(self)
    }

    /// Value types are copied, never aliased, and are not tracked.
    pub fn is_value_type(&self) -> bool {
        self.kind == TypeKind::Struct
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Self, any base type, or any (transitively) implemented interface
    /// carries the given metadata name.
    pub fn inherits_or_implements(&self, name: &str) -> bool {
        if self.name == name {
            return true;
        }
        if self
            .interfaces
            .iter()
            .any(|i| i.inherits_or_implements(name))
        {
            return true;
        }
        match &self.base_type {
            Some(base) => base.inherits_or_implements(name),
            None => false,
        }
    }

    /// Every interface reachable from this type, including through base types.
    pub fn all_interfaces(&self) -> Vec<TypeRef> {
        let mut out: Vec<TypeRef> = Vec::new();
        let mut stack: Vec<TypeRef> = self.interfaces.clone();
        if let Some(base) = &self.base_type {
            stack.extend(base.all_interfaces());
        }
        while let Some(iface) = stack.pop() {
            if out.iter().any(|seen| seen.name == iface.name) {
                continue;
            }
            stack.extend(iface.interfaces.iter().cloned());
            out.push(iface);
        }
        out
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Method kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    Ordinary,
    Constructor,
    /// User-defined conversion operator
    Conversion,
}

/// Parameter passing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefKind {
    None,
    Ref,
    Out,
    In,
}

/// Parameter symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSymbol {
    pub name: String,
    pub ordinal: usize,
    pub ty: TypeRef,
    pub ref_kind: RefKind,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, ordinal: usize, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ordinal,
            ty,
            ref_kind: RefKind::None,
        }
    }

    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    pub fn is_by_value(&self) -> bool {
        matches!(self.ref_kind, RefKind::None | RefKind::In)
    }
}

/// Method symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    pub name: String,
    pub kind: MethodKind,
    pub containing_type: TypeRef,
    pub parameters: Vec<ParameterSymbol>,
    /// `None` for void methods and constructors
    pub return_type: Option<TypeRef>,
    pub is_static: bool,
    /// Explicitly implements the disposable-resource release method
    pub implements_dispose: bool,
}

impl MethodSymbol {
    pub fn new(name: impl Into<String>, kind: MethodKind, containing_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind,
            containing_type,
            parameters: Vec::new(),
            return_type: None,
            is_static: false,
            implements_dispose: false,
        }
    }

    pub fn constructor(containing_type: TypeRef) -> Self {
        Self::new(".ctor", MethodKind::Constructor, containing_type)
    }

    pub fn ordinary(name: impl Into<String>, containing_type: TypeRef) -> Self {
        Self::new(name, MethodKind::Ordinary, containing_type)
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        let ordinal = self.parameters.len();
        self.parameters.push(ParameterSymbol::new(name, ordinal, ty));
        self
    }

    pub fn with_ref_parameter(
        mut self,
        name: impl Into<String>,
        ty: TypeRef,
        ref_kind: RefKind,
    ) -> Self {
        let ordinal = self.parameters.len();
        self.parameters
            .push(ParameterSymbol::new(name, ordinal, ty).with_ref_kind(ref_kind));
        self
    }

    pub fn returning(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn marked_dispose_implementation(mut self) -> Self {
        self.implements_dispose = true;
        self
    }

    pub fn into_ref(self) -> MethodRef {
        Arc::new(self)
    }

    /// `Type.Name`, used as the recursion-guard key.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.containing_type.name, self.name)
    }

    pub fn returns_named(&self, name: &str) -> bool {
        self.return_type.as_ref().is_some_and(|t| t.name == name)
    }
}

/// Field symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSymbol {
    pub name: String,
    /// Metadata name of the declaring type
    pub containing_type: String,
    pub ty: TypeRef,
    pub is_static: bool,
}

impl FieldSymbol {
    pub fn new(name: impl Into<String>, containing_type: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            containing_type: containing_type.into(),
            ty,
            is_static: false,
        }
    }

    pub fn into_ref(self) -> FieldRef {
        Arc::new(self)
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.containing_type, self.name)
    }
}

/// Local variable symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSymbol {
    pub name: String,
    pub ty: TypeRef,
}

impl LocalSymbol {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
