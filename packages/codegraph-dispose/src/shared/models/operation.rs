//! Operation tree
//!
//! A typed, read-only tree of operations built by semantic analysis. Every
//! node carries a procedure-unique `OperationId`, which is what points-to
//! results and dispose evidence refer to.

use super::symbols::{FieldRef, LocalSymbol, MethodRef, ParameterSymbol, TypeRef};

/// Procedure-unique operation identity
pub type OperationId = u32;

/// One node of the operation tree
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub id: OperationId,
    /// Static type of the value this operation produces, if any
    pub ty: Option<TypeRef>,
    pub kind: OperationKind,
}

/// Call argument bound to a parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub id: OperationId,
    /// `None` for arglist or unbound arguments
    pub parameter: Option<ParameterSymbol>,
    pub value: Operation,
}

/// Operation kinds understood by the analysis
#[derive(Debug, Clone, PartialEq)]
pub enum OperationKind {
    ObjectCreation {
        constructor: MethodRef,
        arguments: Vec<Argument>,
        initializer: Option<Box<Operation>>,
    },
    Invocation {
        method: MethodRef,
        instance: Option<Box<Operation>>,
        arguments: Vec<Argument>,
    },
    LocalReference {
        local: LocalSymbol,
    },
    ParameterReference {
        parameter: ParameterSymbol,
    },
    /// `this`
    InstanceReference,
    FieldReference {
        field: FieldRef,
        instance: Option<Box<Operation>>,
    },
    PropertyReference {
        name: String,
        instance: Option<Box<Operation>>,
    },
    ArrayElementReference {
        array: Box<Operation>,
        indices: Vec<Operation>,
    },
    SimpleAssignment {
        target: Box<Operation>,
        value: Box<Operation>,
    },
    VariableDeclarator {
        local: LocalSymbol,
        initializer: Option<Box<Operation>>,
    },
    Return {
        value: Option<Box<Operation>>,
    },
    Throw {
        exception: Option<Box<Operation>>,
    },
    Conversion {
        operand: Box<Operation>,
        /// User-defined conversion operator, if any
        operator: Option<MethodRef>,
    },
    ArrayCreation {
        elements: Vec<Operation>,
    },
    TupleLiteral {
        elements: Vec<Operation>,
    },
    Literal,
    ExpressionStatement {
        operation: Box<Operation>,
    },
    Block {
        operations: Vec<Operation>,
    },
    /// Anything else; children are still visited
    Other {
        children: Vec<Operation>,
    },
}

impl Operation {
    pub fn new(id: OperationId, ty: Option<TypeRef>, kind: OperationKind) -> Self {
        Self { id, ty, kind }
    }

    /// Direct children in evaluation order
    pub fn children(&self) -> Vec<&Operation> {
        use OperationKind::*;
        match &self.kind {
            ObjectCreation {
                arguments,
                initializer,
                ..
            } => {
                let mut out: Vec<&Operation> = arguments.iter().map(|a| &a.value).collect();
                out.extend(initializer.as_deref());
                out
            }
            Invocation {
                instance,
                arguments,
                ..
            } => {
                let mut out: Vec<&Operation> = instance.as_deref().into_iter().collect();
                out.extend(arguments.iter().map(|a| &a.value));
                out
            }
            FieldReference { instance, .. } | PropertyReference { instance, .. } => {
                instance.as_deref().into_iter().collect()
            }
            ArrayElementReference { array, indices } => {
                let mut out = vec![array.as_ref()];
                out.extend(indices.iter());
                out
            }
            SimpleAssignment { target, value } => vec![target.as_ref(), value.as_ref()],
            VariableDeclarator { initializer, .. } => initializer.as_deref().into_iter().collect(),
            Return { value } => value.as_deref().into_iter().collect(),
            Throw { exception } => exception.as_deref().into_iter().collect(),
            Conversion { operand, .. } => vec![operand.as_ref()],
            ArrayCreation { elements } | TupleLiteral { elements } => elements.iter().collect(),
            ExpressionStatement { operation } => vec![operation.as_ref()],
            Block { operations } => operations.iter().collect(),
            Other { children } => children.iter().collect(),
            LocalReference { .. } | ParameterReference { .. } | InstanceReference | Literal => {
                Vec::new()
            }
        }
    }

    /// Strips implicit conversions without an operator
    pub fn without_conversions(&self) -> &Operation {
        match &self.kind {
            OperationKind::Conversion {
                operand,
                operator: None,
            } => operand.without_conversions(),
            _ => self,
        }
    }

    pub fn is_instance_reference(&self) -> bool {
        matches!(
            self.without_conversions().kind,
            OperationKind::InstanceReference
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::symbols::TypeSymbol;

    fn local_ref(id: OperationId, name: &str) -> Operation {
        let ty = TypeSymbol::class("R").into_ref();
        Operation::new(
            id,
            Some(ty.clone()),
            OperationKind::LocalReference {
                local: LocalSymbol::new(name, ty),
            },
        )
    }

    #[test]
    fn test_assignment_children() {
        let assign = Operation::new(
            3,
            None,
            OperationKind::SimpleAssignment {
                target: Box::new(local_ref(1, "a")),
                value: Box::new(local_ref(2, "b")),
            },
        );
        let stmt = Operation::new(
            4,
            None,
            OperationKind::ExpressionStatement {
                operation: Box::new(assign),
            },
        );

        let statement_children: Vec<_> = stmt.children().iter().map(|o| o.id).collect();
        assert_eq!(statement_children, vec![3]);

        let assign = stmt.children()[0];
        let ids: Vec<_> = assign.children().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_without_conversions() {
        let this = Operation::new(1, None, OperationKind::InstanceReference);
        let conv = Operation::new(
            2,
            None,
            OperationKind::Conversion {
                operand: Box::new(this),
                operator: None,
            },
        );
        assert!(conv.is_instance_reference());
    }
}
