//! Dispose transfer functions
//!
//! One rule per operation kind, dispatched by a single `match` so every
//! kind is handled explicitly. Rules update the mutable analysis data of the
//! current block and return the operation's own dispose value.

use super::analyzer::DisposeAnalysis;
use super::context::DisposeAnalysisContext;
use crate::errors::{DisposeError, Result};
use crate::features::dispose_analysis::domain::{
    dispose_analysis_domain, DisposeAbstractValue, DisposeAbstractValueKind, DisposeAnalysisData,
    DisposeAnalysisDomain,
};
use crate::features::dispose_analysis::infrastructure::{is_try_get_method, DisposeMethodKind};
use crate::features::flow_analysis::{AbstractValueDomain, DataFlowOperationVisitor};
use crate::features::points_to::{LocationId, LocationKind, PointsToValue};
use crate::shared::models::{
    Argument, BasicBlock, FieldSymbol, MethodKind, MethodSymbol, Operation, OperationId,
    OperationKind, ParameterSymbol, RefKind, TypeSymbol,
};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, trace};

/// Exit dispose kind of each disposable by-value parameter, by ordinal
type CalleeSummary = FxHashMap<usize, DisposeAbstractValueKind>;

pub struct DisposeDataFlowOperationVisitor<'a> {
    ctx: &'a DisposeAnalysisContext,
    owning_method: &'a MethodSymbol,
    domain: DisposeAnalysisDomain,
    /// Qualified field name -> points-to value of its first disposable read
    tracked_instance_field_locations: FxHashMap<String, PointsToValue>,
    callee_summaries: FxHashMap<String, Option<Arc<CalleeSummary>>>,
}

impl<'a> DisposeDataFlowOperationVisitor<'a> {
    pub fn new(ctx: &'a DisposeAnalysisContext, owning_method: &'a MethodSymbol) -> Self {
        Self {
            ctx,
            owning_method,
            domain: dispose_analysis_domain(),
            tracked_instance_field_locations: FxHashMap::default(),
            callee_summaries: FxHashMap::default(),
        }
    }

    pub fn into_tracked_instance_field_locations(self) -> FxHashMap<String, PointsToValue> {
        self.tracked_instance_field_locations
    }

    /// Apply the transfer function of `op` (and its subtree) to `data`
    pub fn visit(&mut self, op: &Operation, data: &mut DisposeAnalysisData) -> Result<DisposeAbstractValue> {
        use OperationKind::*;

        #[cfg(feature = "trace")]
        trace!(operation = op.id, kind = ?std::mem::discriminant(&op.kind), "visit");

        match &op.kind {
            ObjectCreation {
                constructor,
                arguments,
                initializer,
            } => {
                self.visit_arguments(constructor, arguments, true, data)?;
                if let Some(initializer) = initializer {
                    self.visit(initializer, data)?;
                }
                self.handle_allocation(op, data);
            }
            Invocation {
                method,
                instance,
                arguments,
            } => {
                if let Some(instance) = instance {
                    self.visit(instance, data)?;
                }
                let is_factory = self.is_factory_method(method);
                self.visit_arguments(method, arguments, is_factory, data)?;
                self.handle_invocation(op, method, instance.as_deref(), arguments, data)?;
                if is_factory {
                    self.handle_allocation(op, data);
                }
            }
            FieldReference { field, instance } => {
                if let Some(instance) = instance {
                    self.visit(instance, data)?;
                }
                self.handle_field_read(op, field, instance.as_deref(), data);
            }
            PropertyReference { instance, .. } => {
                if let Some(instance) = instance {
                    self.visit(instance, data)?;
                }
            }
            ArrayElementReference { array, indices } => {
                self.visit(array, data)?;
                for index in indices {
                    self.visit(index, data)?;
                }
            }
            SimpleAssignment { target, value } => {
                self.visit(value, data)?;
                // The target itself is written, not read.
                for child in target.children() {
                    self.visit(child, data)?;
                }
                if is_escaping_target(target) {
                    self.escape(value, op.id, data, false);
                }
            }
            VariableDeclarator { initializer, .. } => {
                if let Some(initializer) = initializer {
                    self.visit(initializer, data)?;
                }
            }
            Return { value } => {
                if let Some(value) = value {
                    self.visit(value, data)?;
                    self.escape(value, op.id, data, false);
                }
            }
            Throw { exception } => {
                if let Some(exception) = exception {
                    self.visit(exception, data)?;
                    self.escape(exception, op.id, data, false);
                }
            }
            Conversion { operand, operator } => {
                self.visit(operand, data)?;
                if operator.is_some() {
                    self.escape(operand, op.id, data, false);
                }
            }
            ArrayCreation { elements } => {
                for element in elements {
                    self.visit(element, data)?;
                    self.escape(element, op.id, data, false);
                }
            }
            TupleLiteral { elements } => {
                for element in elements {
                    self.visit(element, data)?;
                }
            }
            ExpressionStatement { operation } => {
                self.visit(operation, data)?;
            }
            Block { operations } => {
                for operation in operations {
                    self.visit(operation, data)?;
                }
            }
            Other { children } => {
                for child in children {
                    self.visit(child, data)?;
                }
                return Ok(DisposeAbstractValue::NOT_DISPOSABLE);
            }
            LocalReference { .. } | ParameterReference { .. } | InstanceReference | Literal => {}
        }

        Ok(self.value_of(op, data))
    }

    // ------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------

    fn handle_allocation(&self, op: &Operation, data: &mut DisposeAnalysisData) {
        let Some(ty) = &op.ty else {
            return;
        };
        if !self.ctx.well_known.is_tracked_type(ty) {
            return;
        }
        for loc in self.locations_of(op) {
            if !self.is_special_location(loc) {
                self.set_value(loc, DisposeAbstractValue::NOT_DISPOSED, data);
            }
        }
    }

    fn visit_arguments(
        &mut self,
        method: &MethodSymbol,
        arguments: &[Argument],
        is_allocation: bool,
        data: &mut DisposeAnalysisData,
    ) -> Result<()> {
        let try_get = is_try_get_method(method, &self.ctx.config.try_get_prefix);

        for arg in arguments {
            self.visit(&arg.value, data)?;
            let Some(param) = &arg.parameter else {
                continue;
            };
            match param.ref_kind {
                RefKind::Out if try_get => {
                    trace!(argument = arg.id, method = %method.name, "try-get out argument, not escaping");
                }
                RefKind::Out | RefKind::Ref => {
                    self.escape(&arg.value, arg.id, data, true);
                }
                RefKind::None | RefKind::In => {
                    if is_allocation && self.transfers_ownership(method, param, &arg.value) {
                        self.escape(&arg.value, arg.id, data, false);
                    }
                }
            }
        }

        if method.kind == MethodKind::Ordinary
            && self.ctx.config.is_collection_add_name(&method.name)
            && self.ctx.well_known.is_collection(&method.containing_type)
        {
            if let Some(last) = arguments.last() {
                self.escape(&last.value, last.id, data, false);
            }
        }

        Ok(())
    }

    fn transfers_ownership(
        &self,
        method: &MethodSymbol,
        param: &ParameterSymbol,
        value: &Operation,
    ) -> bool {
        if self.ctx.is_ownership_transfer_type(&param.ty) {
            return true;
        }
        let well_known = &self.ctx.well_known;
        self.ctx.config.dispose_ownership_transfer_at_constructor
            && method.kind == MethodKind::Constructor
            && well_known.is_tracked_type(&method.containing_type)
            && (well_known.is_tracked_type(&param.ty)
                || value.ty.as_ref().is_some_and(|t| well_known.is_tracked_type(t)))
    }

    fn is_factory_method(&self, method: &MethodSymbol) -> bool {
        method.kind == MethodKind::Ordinary
            && method.is_static
            && method
                .return_type
                .as_ref()
                .is_some_and(|t| self.ctx.well_known.is_tracked_type(t))
            && self.ctx.config.is_factory_method_name(&method.name)
    }

    fn handle_invocation(
        &mut self,
        op: &Operation,
        method: &MethodSymbol,
        instance: Option<&Operation>,
        arguments: &[Argument],
        data: &mut DisposeAnalysisData,
    ) -> Result<()> {
        let dispose_kind = DisposeMethodKind::classify(method, &self.ctx.well_known);
        if dispose_kind.is_disposing() {
            if let Some(instance) = instance {
                // `classify` already maps explicit implementations to `Dispose`.
                if dispose_kind == DisposeMethodKind::Close && instance.is_instance_reference() {
                    trace!(operation = op.id, "self close, not disposing");
                    return Ok(());
                }
                self.dispose(instance, op.id, data);
            }
            return Ok(());
        }

        if arguments.is_empty() {
            return Ok(());
        }
        let Some(summary) = self.callee_summary(method)? else {
            return Ok(());
        };
        for arg in arguments {
            let Some(param) = &arg.parameter else {
                continue;
            };
            if !param.is_by_value() {
                continue;
            }
            match summary.get(&param.ordinal) {
                Some(DisposeAbstractValueKind::Disposed) => self.dispose(&arg.value, arg.id, data),
                Some(DisposeAbstractValueKind::MaybeDisposed) => {
                    self.escape(&arg.value, arg.id, data, false)
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_field_read(
        &mut self,
        op: &Operation,
        field: &FieldSymbol,
        instance: Option<&Operation>,
        data: &mut DisposeAnalysisData,
    ) {
        if !self.ctx.track_instance_fields
            || field.is_static
            || !instance.is_some_and(|i| i.is_instance_reference())
            || !self.ctx.well_known.is_tracked_type(&field.ty)
        {
            return;
        }

        let pts = self.points_to_value(op);
        let pts = self
            .tracked_instance_field_locations
            .entry(field.qualified_name())
            .or_insert(pts)
            .clone();

        let Some(loc) = pts.single_location() else {
            return;
        };
        // A summary location may stand for objects the procedure never owned.
        let seeds = self
            .ctx
            .points_to
            .location(loc)
            .is_some_and(|l| !l.is_summary && matches!(l.kind, LocationKind::FieldDefault(_)));
        if seeds && !data.contains_key(&loc) {
            self.set_value(loc, DisposeAbstractValue::NOT_DISPOSED, data);
        }
    }

    // ------------------------------------------------------------------
    // State updates
    // ------------------------------------------------------------------

    /// Every location `target` may alias becomes `Disposed`, whatever its
    /// current kind.
    fn dispose(&self, target: &Operation, evidence: OperationId, data: &mut DisposeAnalysisData) {
        for loc in self.locations_of(target) {
            if self.is_special_location(loc) {
                continue;
            }
            let current = match data.get(&loc) {
                Some(value) => value.clone(),
                None if self.is_trackable_location(loc, target.ty.as_deref()) => {
                    DisposeAbstractValue::NOT_DISPOSED
                }
                None => continue,
            };
            if current.kind() == DisposeAbstractValueKind::NotDisposable {
                continue;
            }
            self.set_value(loc, current.with_new_disposing_operation(evidence), data);
        }
    }

    /// Locations of `value` may outlive this procedure. With `force`, not
    /// yet tracked disposable locations are tracked as escaped.
    fn escape(
        &self,
        value: &Operation,
        evidence: OperationId,
        data: &mut DisposeAnalysisData,
        force: bool,
    ) {
        for loc in self.locations_of(value) {
            if self.is_special_location(loc) {
                continue;
            }
            let next = match data.get(&loc) {
                Some(current) if current.kind() == DisposeAbstractValueKind::NotDisposable => None,
                Some(current) => Some(current.with_new_escaping_operation(evidence)),
                None if force && self.is_trackable_location(loc, value.ty.as_deref()) => {
                    Some(DisposeAbstractValue::NOT_DISPOSED.with_new_escaping_operation(evidence))
                }
                None => None,
            };
            if let Some(next) = next {
                self.set_value(loc, next, data);
            }
        }
    }

    fn set_value(&self, loc: LocationId, value: DisposeAbstractValue, data: &mut DisposeAnalysisData) {
        let compatible = self
            .ctx
            .points_to
            .location(loc)
            .and_then(|l| l.location_type.as_ref())
            .map_or(true, |t| self.ctx.well_known.is_tracked_type(t));
        debug_assert!(compatible, "location {} cannot hold a disposable value", loc);

        let value = if compatible {
            value
        } else {
            DisposeAbstractValue::new(
                value.disposing_or_escaping_operations().clone(),
                DisposeAbstractValueKind::MaybeDisposed,
            )
        };
        data.insert(loc, value);
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    fn points_to_value(&self, op: &Operation) -> PointsToValue {
        let value = self.ctx.points_to.operation_value(op.id);
        if value == PointsToValue::Undefined {
            let inner = op.without_conversions();
            if inner.id != op.id {
                return self.ctx.points_to.operation_value(inner.id);
            }
        }
        value
    }

    fn locations_of(&self, op: &Operation) -> Vec<LocationId> {
        let mut locations: Vec<LocationId> = self.points_to_value(op).locations().collect();
        locations.sort_unstable();
        locations
    }

    fn is_special_location(&self, loc: LocationId) -> bool {
        self.ctx
            .points_to
            .location(loc)
            .is_some_and(|l| l.is_null() || l.is_unknown())
    }

    fn is_trackable_location(&self, loc: LocationId, fallback: Option<&TypeSymbol>) -> bool {
        let well_known = &self.ctx.well_known;
        match self
            .ctx
            .points_to
            .location(loc)
            .and_then(|l| l.location_type.as_ref())
        {
            Some(ty) => well_known.is_tracked_type(ty),
            None => fallback.is_some_and(|t| well_known.is_tracked_type(t)),
        }
    }

    fn value_of(&self, op: &Operation, data: &DisposeAnalysisData) -> DisposeAbstractValue {
        let value_domain = self.domain.value_domain();
        self.points_to_value(op)
            .locations()
            .filter_map(|loc| data.get(&loc))
            .fold(None, |acc: Option<DisposeAbstractValue>, v| {
                value_domain.merge_optional(acc.as_ref(), Some(v))
            })
            .unwrap_or(DisposeAbstractValue::NOT_DISPOSABLE)
    }

    // ------------------------------------------------------------------
    // Interprocedural
    // ------------------------------------------------------------------

    fn callee_summary(&mut self, method: &MethodSymbol) -> Result<Option<Arc<CalleeSummary>>> {
        let key = method.qualified_name();
        if let Some(cached) = self.callee_summaries.get(&key) {
            return Ok(cached.clone());
        }
        let summary = self.compute_callee_summary(method)?.map(Arc::new);
        self.callee_summaries.insert(key, summary.clone());
        Ok(summary)
    }

    fn compute_callee_summary(&self, method: &MethodSymbol) -> Result<Option<CalleeSummary>> {
        let well_known = &self.ctx.well_known;
        let tracked_params: Vec<&ParameterSymbol> = method
            .parameters
            .iter()
            .filter(|p| p.is_by_value() && well_known.is_tracked_type(&p.ty))
            .collect();
        if tracked_params.is_empty() {
            return Ok(None);
        }

        let Some(provider) = &self.ctx.body_provider else {
            return Ok(None);
        };
        if !self.ctx.can_analyze_callee(method) {
            debug!(
                callee = %method.qualified_name(),
                depth = self.ctx.methods_being_analyzed().len(),
                "callee lookup skipped by recursion guard"
            );
            return Ok(None);
        }
        let Some(body) = provider.body(method) else {
            return Ok(None);
        };
        let Some(callee_ctx) = self.ctx.for_callee(method, body.points_to.clone()) else {
            return Ok(None);
        };

        let result = match DisposeAnalysis::analyze(&body.blocks, method, &callee_ctx) {
            Ok(result) => result,
            Err(DisposeError::NoAnalysisPossible { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let value_domain = self.domain.value_domain();
        let exit = result.exit_state();
        let mut summary = CalleeSummary::default();
        for param in tracked_params {
            let merged = body
                .points_to
                .parameter_value(param)
                .locations()
                .filter_map(|loc| exit.get(&loc))
                .fold(None, |acc: Option<DisposeAbstractValue>, v| {
                    value_domain.merge_optional(acc.as_ref(), Some(v))
                });
            if let Some(value) = merged {
                summary.insert(param.ordinal, value.kind());
            }
        }

        debug!(
            caller = %self.owning_method.qualified_name(),
            callee = %method.qualified_name(),
            parameters = summary.len(),
            "callee summary computed"
        );
        Ok(Some(summary))
    }
}

/// Stores into slots observable outside the procedure
fn is_escaping_target(target: &Operation) -> bool {
    match &target.without_conversions().kind {
        OperationKind::FieldReference { .. }
        | OperationKind::PropertyReference { .. }
        | OperationKind::ArrayElementReference { .. } => true,
        OperationKind::ParameterReference { parameter } => {
            matches!(parameter.ref_kind, RefKind::Ref | RefKind::Out)
        }
        _ => false,
    }
}

impl DataFlowOperationVisitor for DisposeDataFlowOperationVisitor<'_> {
    type AnalysisData = DisposeAnalysisData;

    fn initial_analysis_data(&self) -> DisposeAnalysisData {
        let mut data = DisposeAnalysisData::default();
        for param in &self.owning_method.parameters {
            if !param.is_by_value() || !self.ctx.well_known.is_tracked_type(&param.ty) {
                continue;
            }
            if !self.ctx.is_callee() && !self.ctx.is_ownership_transfer_type(&param.ty) {
                continue;
            }
            for loc in self.ctx.points_to.parameter_value(param).locations() {
                if !self.is_special_location(loc) {
                    self.set_value(loc, DisposeAbstractValue::NOT_DISPOSED, &mut data);
                }
            }
        }
        data
    }

    fn merge_analysis_data(&self, a: &DisposeAnalysisData, b: &DisposeAnalysisData) -> DisposeAnalysisData {
        self.domain.merge(a, b)
    }

    fn compare_analysis_data(&self, old: &DisposeAnalysisData, new: &DisposeAnalysisData) -> Ordering {
        self.domain.compare(old, new)
    }

    fn flow(&mut self, block: &BasicBlock, mut data: DisposeAnalysisData) -> Result<DisposeAnalysisData> {
        for op in &block.operations {
            self.visit(op, &mut data)?;
        }
        Ok(data)
    }
}
