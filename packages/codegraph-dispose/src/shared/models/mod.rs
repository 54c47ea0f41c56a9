//! Shared models consumed by every feature

pub mod cfg;
pub mod compilation;
pub mod operation;
pub mod symbols;

pub use cfg::{BasicBlock, BlockId, BlockKind, ControlFlowGraph, OperationBlock};
pub use compilation::{Compilation, CompilationId};
pub use operation::{Argument, Operation, OperationId, OperationKind};
pub use symbols::{
    FieldRef, FieldSymbol, LocalSymbol, MethodKind, MethodRef, MethodSymbol, ParameterSymbol,
    RefKind, TypeKind, TypeRef, TypeSymbol,
};
