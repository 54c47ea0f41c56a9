//! Per-invocation analysis context

use crate::config::{DisposeConfig, InterproceduralMode};
use crate::features::dispose_analysis::infrastructure::WellKnownTypes;
use crate::features::dispose_analysis::ports::ProcedureBodyProvider;
use crate::features::points_to::PointsToResult;
use crate::shared::models::{MethodSymbol, TypeSymbol};
use crate::shared::CancellationToken;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Immutable inputs of one analysis run
///
/// Cloning is cheap: everything shared is behind an `Arc`, and the
/// recursion guard is copied so nested lookups never see each other's
/// entries.
#[derive(Clone)]
pub struct DisposeAnalysisContext {
    pub config: Arc<DisposeConfig>,
    pub well_known: Arc<WellKnownTypes>,
    /// Metadata names of ownership-transfer-likely types
    pub ownership_transfer_types: Arc<FxHashSet<String>>,
    pub points_to: Arc<dyn PointsToResult>,
    pub track_instance_fields: bool,
    pub body_provider: Option<Arc<dyn ProcedureBodyProvider>>,
    pub cancellation: Option<CancellationToken>,
    /// Qualified names of the methods on the analysis stack
    methods_being_analyzed: FxHashSet<String>,
    /// Analysing a callee on behalf of a caller
    is_callee: bool,
}

impl std::fmt::Debug for DisposeAnalysisContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposeAnalysisContext")
            .field("ownership_transfer_types", &self.ownership_transfer_types)
            .field("track_instance_fields", &self.track_instance_fields)
            .field("methods_being_analyzed", &self.methods_being_analyzed)
            .field("is_callee", &self.is_callee)
            .finish_non_exhaustive()
    }
}

impl DisposeAnalysisContext {
    pub fn new(
        config: Arc<DisposeConfig>,
        well_known: Arc<WellKnownTypes>,
        ownership_transfer_types: Arc<FxHashSet<String>>,
        points_to: Arc<dyn PointsToResult>,
    ) -> Self {
        let track_instance_fields = config.track_instance_fields;
        Self {
            config,
            well_known,
            ownership_transfer_types,
            points_to,
            track_instance_fields,
            body_provider: None,
            cancellation: None,
            methods_being_analyzed: FxHashSet::default(),
            is_callee: false,
        }
    }

    pub fn with_track_instance_fields(mut self, track: bool) -> Self {
        self.track_instance_fields = track;
        self
    }

    pub fn with_body_provider(mut self, provider: Arc<dyn ProcedureBodyProvider>) -> Self {
        self.body_provider = Some(provider);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn is_callee(&self) -> bool {
        self.is_callee
    }

    pub fn methods_being_analyzed(&self) -> &FxHashSet<String> {
        &self.methods_being_analyzed
    }

    /// Copy of this context with `method` pushed on the analysis stack
    pub fn entering(&self, method: &MethodSymbol) -> Self {
        let mut ctx = self.clone();
        ctx.methods_being_analyzed.insert(method.qualified_name());
        ctx
    }

    pub fn is_ownership_transfer_type(&self, ty: &TypeSymbol) -> bool {
        self.ownership_transfer_types.contains(&ty.name)
    }

    /// Whether a callee body may be analysed from here
    pub fn can_analyze_callee(&self, callee: &MethodSymbol) -> bool {
        self.config.interprocedural == InterproceduralMode::ContextSensitive
            && self.body_provider.is_some()
            && !self.methods_being_analyzed.contains(&callee.qualified_name())
            && self.methods_being_analyzed.len() <= self.config.max_call_chain_depth
    }

    /// Context for analysing `callee`; `None` when the guard forbids it
    pub fn for_callee(
        &self,
        callee: &MethodSymbol,
        points_to: Arc<dyn PointsToResult>,
    ) -> Option<Self> {
        if !self.can_analyze_callee(callee) {
            return None;
        }
        let mut ctx = self.clone();
        ctx.points_to = points_to;
        ctx.is_callee = true;
        // Fields belong to the callee's instance, not ours.
        ctx.track_instance_fields = false;
        Some(ctx)
    }
}
