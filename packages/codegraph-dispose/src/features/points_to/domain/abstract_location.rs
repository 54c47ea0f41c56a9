//! Abstract Heap Location
//!
//! Stands for one allocation site, one parameter's entry value or one
//! field's default value. The dispose analysis only attaches state to
//! locations; it never creates them.

use crate::shared::models::{OperationId, TypeRef};
use std::fmt;

/// Unique identifier for abstract locations
pub type LocationId = u32;

/// What an abstract location stands for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocationKind {
    /// Object created by the operation
    Allocation(OperationId),
    /// Entry value of the named parameter
    Parameter(String),
    /// Value held by the (qualified) field before this procedure ran
    FieldDefault(String),
    Null,
    Unknown,
}

/// Abstract representation of a heap location
#[derive(Debug, Clone)]
pub struct AbstractLocation {
    /// Unique numeric ID for efficient set operations
    pub id: LocationId,
    pub kind: LocationKind,
    /// Static type of the objects this location stands for
    pub location_type: Option<TypeRef>,
    /// Whether this is a summary node (represents multiple concrete locations)
    pub is_summary: bool,
}

impl PartialEq for AbstractLocation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AbstractLocation {}

impl std::hash::Hash for AbstractLocation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl AbstractLocation {
    #[inline]
    pub fn new(id: LocationId, kind: LocationKind) -> Self {
        Self {
            id,
            kind,
            location_type: None,
            is_summary: false,
        }
    }

    #[inline]
    pub fn with_type(mut self, ty: TypeRef) -> Self {
        self.location_type = Some(ty);
        self
    }

    #[inline]
    pub fn as_summary(mut self) -> Self {
        self.is_summary = true;
        self
    }

    /// Create a special "null" location
    #[inline]
    pub fn null() -> Self {
        Self::new(0, LocationKind::Null).as_summary()
    }

    /// Create a special "unknown" location (conservative)
    #[inline]
    pub fn unknown() -> Self {
        Self::new(u32::MAX, LocationKind::Unknown).as_summary()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.kind == LocationKind::Null
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.kind == LocationKind::Unknown
    }

    /// Operation that allocated this location, if any
    pub fn allocation(&self) -> Option<OperationId> {
        match self.kind {
            LocationKind::Allocation(op) => Some(op),
            _ => None,
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.location_type.as_ref().map(|t| t.name.as_str())
    }
}

impl fmt::Display for AbstractLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LocationKind::Allocation(op) => write!(f, "alloc:{}", op)?,
            LocationKind::Parameter(name) => write!(f, "param:{}", name)?,
            LocationKind::FieldDefault(name) => write!(f, "field:{}", name)?,
            LocationKind::Null => f.write_str("null")?,
            LocationKind::Unknown => f.write_str("unknown")?,
        }
        if let Some(ty) = &self.location_type {
            write!(f, ":{}", ty.name)?;
        }
        Ok(())
    }
}

/// Factory for creating abstract locations with unique IDs
#[derive(Debug)]
pub struct LocationFactory {
    next_id: LocationId,
}

impl Default for LocationFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationFactory {
    pub fn new() -> Self {
        Self { next_id: 1 } // 0 is reserved for null
    }

    #[inline]
    pub fn create(&mut self, kind: LocationKind) -> AbstractLocation {
        let id = self.next_id;
        self.next_id += 1;
        AbstractLocation::new(id, kind)
    }

    /// Current count of created locations
    #[inline]
    pub fn count(&self) -> u32 {
        self.next_id - 1
    }
}
