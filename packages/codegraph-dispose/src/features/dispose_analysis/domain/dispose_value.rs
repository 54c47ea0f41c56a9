//! Dispose abstract value
//!
//! One location's dispose state plus the operations that justify it.

use crate::shared::models::OperationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Dispose state kind
///
/// Declaration order is the lattice order used by `compare`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DisposeAbstractValueKind {
    /// Cannot hold a disposable object, or incompatible values met at a join
    NotDisposable,
    NotDisposed,
    Disposed,
    /// Disposed on some paths, or escaped
    MaybeDisposed,
}

impl fmt::Display for DisposeAbstractValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDisposable => write!(f, "NotDisposable"),
            Self::NotDisposed => write!(f, "NotDisposed"),
            Self::Disposed => write!(f, "Disposed"),
            Self::MaybeDisposed => write!(f, "MaybeDisposed"),
        }
    }
}

/// Immutable dispose state of one abstract location
///
/// `NotDisposable` and `NotDisposed` never carry evidence; `Disposed`
/// always does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisposeAbstractValue {
    kind: DisposeAbstractValueKind,
    disposing_or_escaping_operations: BTreeSet<OperationId>,
}

impl DisposeAbstractValue {
    pub const NOT_DISPOSABLE: Self = Self::evidence_free(DisposeAbstractValueKind::NotDisposable);
    pub const NOT_DISPOSED: Self = Self::evidence_free(DisposeAbstractValueKind::NotDisposed);
    /// `MaybeDisposed` with no evidence
    pub const UNKNOWN: Self = Self::evidence_free(DisposeAbstractValueKind::MaybeDisposed);

    const fn evidence_free(kind: DisposeAbstractValueKind) -> Self {
        Self {
            kind,
            disposing_or_escaping_operations: BTreeSet::new(),
        }
    }

    /// Build a value, degrading to `MaybeDisposed` if the evidence does not
    /// fit the kind.
    pub fn new(operations: BTreeSet<OperationId>, kind: DisposeAbstractValueKind) -> Self {
        let valid = match kind {
            DisposeAbstractValueKind::NotDisposable | DisposeAbstractValueKind::NotDisposed => {
                operations.is_empty()
            }
            DisposeAbstractValueKind::Disposed => !operations.is_empty(),
            DisposeAbstractValueKind::MaybeDisposed => true,
        };
        debug_assert!(valid, "evidence {:?} does not fit {}", operations, kind);

        if valid {
            Self {
                kind,
                disposing_or_escaping_operations: operations,
            }
        } else {
            Self {
                kind: DisposeAbstractValueKind::MaybeDisposed,
                disposing_or_escaping_operations: operations,
            }
        }
    }

    pub fn disposed(operation: OperationId) -> Self {
        Self::new(BTreeSet::from([operation]), DisposeAbstractValueKind::Disposed)
    }

    pub fn escaped(operation: OperationId) -> Self {
        Self::new(BTreeSet::from([operation]), DisposeAbstractValueKind::MaybeDisposed)
    }

    pub fn kind(&self) -> DisposeAbstractValueKind {
        self.kind
    }

    pub fn disposing_or_escaping_operations(&self) -> &BTreeSet<OperationId> {
        &self.disposing_or_escaping_operations
    }

    /// `Disposed`, whatever the current kind, with `operation` added.
    pub fn with_new_disposing_operation(&self, operation: OperationId) -> Self {
        self.with_operation(operation, DisposeAbstractValueKind::Disposed)
    }

    /// `MaybeDisposed`, with `operation` added.
    pub fn with_new_escaping_operation(&self, operation: OperationId) -> Self {
        self.with_operation(operation, DisposeAbstractValueKind::MaybeDisposed)
    }

    fn with_operation(&self, operation: OperationId, kind: DisposeAbstractValueKind) -> Self {
        let mut operations = self.disposing_or_escaping_operations.clone();
        operations.insert(operation);
        Self::new(operations, kind)
    }
}

impl fmt::Display for DisposeAbstractValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.disposing_or_escaping_operations.is_empty() {
            write!(f, "{:?}", self.disposing_or_escaping_operations)?;
        }
        Ok(())
    }
}
