//! Dispose value lattice

use super::dispose_value::{DisposeAbstractValue, DisposeAbstractValueKind};
use crate::features::flow_analysis::domain::{AbstractValueDomain, SetAbstractDomain};
use crate::shared::models::OperationId;
use std::cmp::Ordering;

/// Join semilattice over [`DisposeAbstractValue`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DisposeAbstractValueDomain {
    operations: SetAbstractDomain<OperationId>,
}

impl DisposeAbstractValueDomain {
    pub const fn new() -> Self {
        Self {
            operations: SetAbstractDomain::new(),
        }
    }
}

impl AbstractValueDomain<DisposeAbstractValue> for DisposeAbstractValueDomain {
    fn bottom(&self) -> DisposeAbstractValue {
        DisposeAbstractValue::NOT_DISPOSABLE
    }

    fn unknown_or_maybe(&self) -> DisposeAbstractValue {
        DisposeAbstractValue::UNKNOWN
    }

    fn merge(&self, a: &DisposeAbstractValue, b: &DisposeAbstractValue) -> DisposeAbstractValue {
        use DisposeAbstractValueKind::*;

        if a.kind() == NotDisposable || b.kind() == NotDisposable {
            return DisposeAbstractValue::NOT_DISPOSABLE;
        }
        if a.kind() == NotDisposed && b.kind() == NotDisposed {
            return DisposeAbstractValue::NOT_DISPOSED;
        }

        let kind = if a.kind() == Disposed && b.kind() == Disposed {
            Disposed
        } else {
            MaybeDisposed
        };
        let operations = self.operations.merge(
            a.disposing_or_escaping_operations(),
            b.disposing_or_escaping_operations(),
        );
        if operations.is_empty() {
            return DisposeAbstractValue::UNKNOWN;
        }
        DisposeAbstractValue::new(operations, kind)
    }

    fn compare(&self, old: &DisposeAbstractValue, new: &DisposeAbstractValue) -> Ordering {
        if std::ptr::eq(old, new) {
            return Ordering::Equal;
        }
        if old.kind() == new.kind() {
            return self.operations.compare(
                old.disposing_or_escaping_operations(),
                new.disposing_or_escaping_operations(),
            );
        }

        let increasing = old.kind() < new.kind();
        debug_assert!(
            increasing,
            "non-monotonic dispose transition: {} -> {}",
            old,
            new
        );
        if increasing {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}
