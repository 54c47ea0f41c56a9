/*
 * Dispose Leaks
 *
 * Findings produced from a finished dispose analysis.
 */

use crate::features::points_to::LocationId;
use crate::shared::models::OperationId;
use serde::{Deserialize, Serialize};

/// Leak kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeakKind {
    /// Allocated and never disposed on some path to exit
    NotDisposed,

    /// Disposable field not disposed by the type's Dispose method
    FieldNotDisposed,
}

impl std::fmt::Display for LeakKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeakKind::NotDisposed => write!(f, "Not Disposed"),
            LeakKind::FieldNotDisposed => write!(f, "Field Not Disposed"),
        }
    }
}

/// A likely resource leak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposeLeak {
    pub kind: LeakKind,

    /// Leaked location; `None` for a field that was never read
    pub location: Option<LocationId>,

    /// Allocating operation, when the location is an allocation site
    pub allocation: Option<OperationId>,

    /// Qualified field name for field findings
    pub field: Option<String>,

    pub type_name: Option<String>,

    /// Human-readable message
    pub message: String,
}

impl DisposeLeak {
    pub fn new(kind: LeakKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: None,
            allocation: None,
            field: None,
            type_name: None,
            message: message.into(),
        }
    }

    pub fn with_location(mut self, location: LocationId) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_allocation(mut self, allocation: Option<OperationId>) -> Self {
        self.allocation = allocation;
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_type_name(mut self, type_name: Option<String>) -> Self {
        self.type_name = type_name;
        self
    }

    /// Format for display
    pub fn format_message(&self) -> String {
        let subject = match (&self.field, self.allocation, self.location) {
            (Some(field), _, _) => format!("field {}", field),
            (None, Some(op), _) => format!("op {}", op),
            (None, None, Some(location)) => format!("location {}", location),
            (None, None, None) => "unknown".to_string(),
        };
        format!("{}: {} - {}", subject, self.kind, self.message)
    }
}

impl std::fmt::Display for DisposeLeak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_message())
    }
}
