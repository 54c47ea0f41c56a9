//! Test data builders
//!
//! `ProcedureBuilder` stands in for the binder, the points-to analysis and
//! the CFG builder at once: every operation it creates gets a fresh id, and
//! references are bound to the locations their local, parameter or field
//! currently holds (flow-insensitively, at construction time).

use codegraph_dispose::features::points_to::{
    LocationId, LocationKind, PointsToResult, PointsToTable, PointsToValue,
};
use codegraph_dispose::shared::models::{
    Argument, BlockId, ControlFlowGraph, FieldRef, LocalSymbol, MethodRef, Operation, OperationBlock,
    OperationId, OperationKind, ParameterSymbol, TypeRef,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A built procedure, ready to analyse
pub struct Procedure {
    pub method: MethodRef,
    pub blocks: Vec<OperationBlock>,
    pub points_to: Arc<PointsToTable>,
}

impl Procedure {
    pub fn points_to_dyn(&self) -> Arc<dyn PointsToResult> {
        self.points_to.clone()
    }
}

pub struct ProcedureBuilder {
    method: MethodRef,
    next_id: OperationId,
    pub points_to: PointsToTable,
    locals: FxHashMap<String, (TypeRef, Vec<LocationId>)>,
    field_locations: FxHashMap<String, LocationId>,
    this_location: Option<LocationId>,
    cfg: ControlFlowGraph,
}

impl ProcedureBuilder {
    pub fn new(method: MethodRef) -> Self {
        let mut builder = Self {
            method,
            next_id: 1,
            points_to: PointsToTable::new(),
            locals: FxHashMap::default(),
            field_locations: FxHashMap::default(),
            this_location: None,
            cfg: ControlFlowGraph::new(),
        };
        let params: Vec<ParameterSymbol> = builder.method.parameters.clone();
        for param in params {
            let loc = builder.points_to.add_location(
                LocationKind::Parameter(param.name.clone()),
                Some(param.ty.clone()),
            );
            builder
                .points_to
                .bind_parameter(param.name.clone(), PointsToValue::known([loc]));
        }
        builder
    }

    fn id(&mut self) -> OperationId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn locations(&self, op: &Operation) -> Vec<LocationId> {
        self.points_to.operation_value(op.id).locations().collect()
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// `new T(args)` with a fresh allocation site
    pub fn new_object(&mut self, ctor: &MethodRef, args: Vec<Argument>) -> Operation {
        let id = self.id();
        let ty = ctor.containing_type.clone();
        self.points_to.allocate(id, ty.clone());
        Operation::new(
            id,
            Some(ty),
            OperationKind::ObjectCreation {
                constructor: ctor.clone(),
                arguments: args,
                initializer: None,
            },
        )
    }

    /// Call; a static call returning a type gets a fresh allocation site
    pub fn call(&mut self, method: &MethodRef, instance: Option<Operation>, args: Vec<Argument>) -> Operation {
        let id = self.id();
        if let Some(ret) = &method.return_type {
            if method.is_static {
                self.points_to.allocate(id, ret.clone());
            }
        }
        Operation::new(
            id,
            method.return_type.clone(),
            OperationKind::Invocation {
                method: method.clone(),
                instance: instance.map(Box::new),
                arguments: args,
            },
        )
    }

    /// Argument bound to the method's parameter at `ordinal`
    pub fn arg(&mut self, method: &MethodRef, ordinal: usize, value: Operation) -> Argument {
        Argument {
            id: self.id(),
            parameter: method.parameters.get(ordinal).cloned(),
            value,
        }
    }

    pub fn local(&mut self, name: &str) -> Operation {
        let id = self.id();
        let (ty, locs) = self
            .locals
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("unknown local {}", name));
        self.points_to.bind_operation_to(id, locs);
        Operation::new(
            id,
            Some(ty.clone()),
            OperationKind::LocalReference {
                local: LocalSymbol::new(name, ty),
            },
        )
    }

    /// Local whose value comes from somewhere opaque (e.g. an out argument)
    pub fn opaque_local(&mut self, name: &str, ty: &TypeRef) -> LocationId {
        let site = self.id();
        let loc = self
            .points_to
            .add_location(LocationKind::Allocation(site), Some(ty.clone()));
        self.locals.insert(name.to_string(), (ty.clone(), vec![loc]));
        loc
    }

    pub fn param(&mut self, ordinal: usize) -> Operation {
        let id = self.id();
        let param = self.method.parameters[ordinal].clone();
        let value = self.points_to.parameter_value(&param);
        self.points_to.bind_operation(id, value);
        Operation::new(
            id,
            Some(param.ty.clone()),
            OperationKind::ParameterReference { parameter: param },
        )
    }

    /// `this`, optionally aliased to an existing location
    pub fn this(&mut self) -> Operation {
        let id = self.id();
        if let Some(loc) = self.this_location {
            self.points_to.bind_operation_to(id, [loc]);
        }
        Operation::new(id, None, OperationKind::InstanceReference)
    }

    pub fn alias_this_to(&mut self, loc: LocationId) {
        self.this_location = Some(loc);
    }

    /// `this.field`, bound to the field's default location
    pub fn this_field(&mut self, field: &FieldRef) -> Operation {
        let this = self.this();
        let id = self.id();
        let key = field.qualified_name();
        let loc = match self.field_locations.get(&key) {
            Some(loc) => *loc,
            None => {
                let loc = self
                    .points_to
                    .add_location(LocationKind::FieldDefault(key.clone()), Some(field.ty.clone()));
                self.field_locations.insert(key, loc);
                loc
            }
        };
        self.points_to.bind_operation_to(id, [loc]);
        Operation::new(
            id,
            Some(field.ty.clone()),
            OperationKind::FieldReference {
                field: field.clone(),
                instance: Some(Box::new(this)),
            },
        )
    }

    /// Bind later reads of `this.field` to a summary location
    pub fn summary_field(&mut self, field: &FieldRef) -> LocationId {
        let key = field.qualified_name();
        let loc = self
            .points_to
            .add_summary_location(LocationKind::FieldDefault(key.clone()), Some(field.ty.clone()));
        self.field_locations.insert(key, loc);
        loc
    }

    pub fn field_location(&self, field: &FieldRef) -> Option<LocationId> {
        self.field_locations.get(&field.qualified_name()).copied()
    }

    pub fn literal(&mut self) -> Operation {
        let id = self.id();
        Operation::new(id, None, OperationKind::Literal)
    }

    pub fn user_conversion(&mut self, operand: Operation, operator: &MethodRef, to: &TypeRef) -> Operation {
        let id = self.id();
        Operation::new(
            id,
            Some(to.clone()),
            OperationKind::Conversion {
                operand: Box::new(operand),
                operator: Some(operator.clone()),
            },
        )
    }

    pub fn array(&mut self, elements: Vec<Operation>) -> Operation {
        let id = self.id();
        Operation::new(id, None, OperationKind::ArrayCreation { elements })
    }

    pub fn tuple(&mut self, elements: Vec<Operation>) -> Operation {
        let id = self.id();
        Operation::new(id, None, OperationKind::TupleLiteral { elements })
    }

    pub fn other(&mut self, children: Vec<Operation>) -> Operation {
        let id = self.id();
        Operation::new(id, None, OperationKind::Other { children })
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// `var name = init;` the local aliases whatever `init` points to
    pub fn declare(&mut self, name: &str, init: Operation) -> Operation {
        let ty = init
            .ty
            .clone()
            .unwrap_or_else(|| panic!("initializer of {} has no type", name));
        let locs = self.locations(&init);
        self.locals.insert(name.to_string(), (ty.clone(), locs));
        let id = self.id();
        Operation::new(
            id,
            None,
            OperationKind::VariableDeclarator {
                local: LocalSymbol::new(name, ty),
                initializer: Some(Box::new(init)),
            },
        )
    }

    /// `var name = new T(args);` returning the statement and the allocation site
    pub fn declare_new(&mut self, name: &str, ctor: &MethodRef, args: Vec<Argument>) -> (Operation, LocationId) {
        let creation = self.new_object(ctor, args);
        let loc = self.locations(&creation)[0];
        (self.declare(name, creation), loc)
    }

    pub fn assign(&mut self, target: Operation, value: Operation) -> Operation {
        let id = self.id();
        let assign = Operation::new(
            id,
            value.ty.clone(),
            OperationKind::SimpleAssignment {
                target: Box::new(target),
                value: Box::new(value),
            },
        );
        self.stmt(assign)
    }

    pub fn stmt(&mut self, op: Operation) -> Operation {
        let id = self.id();
        Operation::new(
            id,
            None,
            OperationKind::ExpressionStatement {
                operation: Box::new(op),
            },
        )
    }

    /// `name.Dispose();`
    pub fn dispose_local(&mut self, name: &str, dispose: &MethodRef) -> Operation {
        let receiver = self.local(name);
        let call = self.call(dispose, Some(receiver), Vec::new());
        self.stmt(call)
    }

    pub fn ret(&mut self, value: Option<Operation>) -> Operation {
        let id = self.id();
        Operation::new(
            id,
            None,
            OperationKind::Return {
                value: value.map(Box::new),
            },
        )
    }

    // ------------------------------------------------------------------
    // CFG
    // ------------------------------------------------------------------

    pub fn entry(&self) -> BlockId {
        self.cfg.entry()
    }

    pub fn exit(&self) -> BlockId {
        self.cfg.exit()
    }

    pub fn block(&mut self, operations: Vec<Operation>) -> BlockId {
        self.cfg.add_block(operations)
    }

    pub fn edge(&mut self, from: BlockId, to: BlockId) {
        self.cfg.add_edge(from, to);
    }

    /// entry -> [statements] -> exit
    pub fn straight_line(mut self, statements: Vec<Operation>) -> Procedure {
        let body = self.block(statements);
        let (entry, exit) = (self.entry(), self.exit());
        self.edge(entry, body);
        self.edge(body, exit);
        self.finish()
    }

    pub fn finish(mut self) -> Procedure {
        let root_id = self.id();
        let root = Operation::new(root_id, None, OperationKind::Block { operations: Vec::new() });
        Procedure {
            method: self.method,
            blocks: vec![OperationBlock::new(root, Some(Arc::new(self.cfg)))],
            points_to: Arc::new(self.points_to),
        }
    }

    /// Same procedure without any CFG
    pub fn finish_without_cfg(mut self) -> Procedure {
        let root_id = self.id();
        let root = Operation::new(root_id, None, OperationKind::Block { operations: Vec::new() });
        Procedure {
            method: self.method,
            blocks: vec![OperationBlock::new(root, None)],
            points_to: Arc::new(self.points_to),
        }
    }
}
