//! Dispose method classification

use super::well_known::WellKnownTypes;
use crate::shared::models::{MethodKind, MethodSymbol, RefKind};

const BOOLEAN: &str = "System.Boolean";

/// How a method relates to the disposable-resource protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisposeMethodKind {
    None,
    /// `Dispose()`
    Dispose,
    /// `Dispose(bool disposing)`
    DisposeBool,
    /// `DisposeAsync()`
    DisposeAsync,
    /// `Close()`
    Close,
}

impl DisposeMethodKind {
    pub fn is_disposing(self) -> bool {
        self != Self::None
    }

    pub fn classify(method: &MethodSymbol, well_known: &WellKnownTypes) -> Self {
        if method.kind != MethodKind::Ordinary || method.is_static {
            return Self::None;
        }
        if method.implements_dispose {
            return Self::Dispose;
        }
        if !well_known.is_disposable(&method.containing_type) {
            return Self::None;
        }

        let params = &method.parameters;
        match method.name.as_str() {
            "Dispose" if params.is_empty() && method.return_type.is_none() => Self::Dispose,
            "Dispose"
                if params.len() == 1
                    && params[0].ty.name == BOOLEAN
                    && params[0].ref_kind == RefKind::None
                    && method.return_type.is_none() =>
            {
                Self::DisposeBool
            }
            "DisposeAsync"
                if params.is_empty()
                    && method
                        .return_type
                        .as_ref()
                        .is_some_and(|t| well_known.is_task(t) || well_known.is_value_task(t)) =>
            {
                Self::DisposeAsync
            }
            "Close" if params.is_empty() && method.return_type.is_none() => Self::Close,
            _ => Self::None,
        }
    }
}

/// `bool TryGetX(..., out T value)` style lookup
pub fn is_try_get_method(method: &MethodSymbol, prefix: &str) -> bool {
    method.name.starts_with(prefix) && method.returns_named(BOOLEAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WellKnownTypeNames;
    use crate::shared::models::{Compilation, CompilationId, TypeRef, TypeSymbol};

    fn setup() -> (WellKnownTypes, TypeRef) {
        let mut c = Compilation::new(CompilationId(1));
        let disposable = TypeSymbol::interface("System.IDisposable").into_ref();
        c.add_type(disposable.clone());
        let wk = WellKnownTypes::resolve(&c, &WellKnownTypeNames::default()).unwrap();
        let resource = TypeSymbol::class("R").implementing(disposable).into_ref();
        (wk, resource)
    }

    #[test]
    fn test_classify() {
        let (wk, r) = setup();
        let boolean = TypeSymbol::value_type(BOOLEAN).into_ref();

        let dispose = MethodSymbol::ordinary("Dispose", r.clone());
        let dispose_bool = MethodSymbol::ordinary("Dispose", r.clone()).with_parameter("disposing", boolean);
        let close = MethodSymbol::ordinary("Close", r.clone());
        let read = MethodSymbol::ordinary("Read", r.clone());

        assert_eq!(DisposeMethodKind::classify(&dispose, &wk), DisposeMethodKind::Dispose);
        assert_eq!(DisposeMethodKind::classify(&dispose_bool, &wk), DisposeMethodKind::DisposeBool);
        assert_eq!(DisposeMethodKind::classify(&close, &wk), DisposeMethodKind::Close);
        assert_eq!(DisposeMethodKind::classify(&read, &wk), DisposeMethodKind::None);
    }

    #[test]
    fn test_dispose_async_needs_resolved_task_type() {
        let mut c = Compilation::new(CompilationId(1));
        let disposable = TypeSymbol::interface("System.IDisposable").into_ref();
        let value_task = TypeSymbol::value_type("System.Threading.Tasks.ValueTask").into_ref();
        c.add_type(disposable.clone());
        c.add_type(value_task.clone());
        let wk = WellKnownTypes::resolve(&c, &WellKnownTypeNames::default()).unwrap();
        let r = TypeSymbol::class("R").implementing(disposable).into_ref();

        let async_dispose = MethodSymbol::ordinary("DisposeAsync", r.clone()).returning(value_task);
        assert_eq!(DisposeMethodKind::classify(&async_dispose, &wk), DisposeMethodKind::DisposeAsync);

        let lookalike = TypeSymbol::value_type("MyLib.ValueTask").into_ref();
        let other = MethodSymbol::ordinary("DisposeAsync", r).returning(lookalike);
        assert_eq!(DisposeMethodKind::classify(&other, &wk), DisposeMethodKind::None);
    }

    #[test]
    fn test_non_disposable_receiver_is_not_disposing() {
        let (wk, _) = setup();
        let plain = TypeSymbol::class("P").into_ref();
        let close = MethodSymbol::ordinary("Close", plain);
        assert!(!DisposeMethodKind::classify(&close, &wk).is_disposing());
    }

    #[test]
    fn test_explicit_implementation_wins() {
        let (wk, r) = setup();
        let m = MethodSymbol::ordinary("System.IDisposable.Dispose", r).marked_dispose_implementation();
        assert_eq!(DisposeMethodKind::classify(&m, &wk), DisposeMethodKind::Dispose);
    }

    #[test]
    fn test_try_get() {
        let (_, r) = setup();
        let boolean = TypeSymbol::value_type(BOOLEAN).into_ref();
        let try_get = MethodSymbol::ordinary("TryGetValue", r.clone()).returning(boolean);
        let get = MethodSymbol::ordinary("GetValue", r);
        assert!(is_try_get_method(&try_get, "TryGet"));
        assert!(!is_try_get_method(&get, "TryGet"));
    }
}
