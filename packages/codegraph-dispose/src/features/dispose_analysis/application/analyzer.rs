//! Dispose analysis façade
//!
//! Resolves the procedure's CFG, runs the transfer-function visitor to a
//! fixpoint on the forward engine and packages the per-block states.

use super::context::DisposeAnalysisContext;
use super::visitor::DisposeDataFlowOperationVisitor;
use crate::errors::{DisposeError, Result};
use crate::features::dispose_analysis::domain::{DisposeAbstractValue, DisposeAnalysisData};
use crate::features::flow_analysis::ForwardDataFlowEngine;
use crate::features::points_to::{LocationId, PointsToValue};
use crate::shared::models::{BlockId, ControlFlowGraph, MethodSymbol, OperationBlock};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

/// Fixpoint dispose states of one procedure
#[derive(Debug, Clone)]
pub struct DisposeAnalysisResult {
    cfg: Arc<ControlFlowGraph>,
    /// `(entry, exit)` per block, indexed by `BlockId`
    block_states: Vec<(DisposeAnalysisData, DisposeAnalysisData)>,
    exit_state: DisposeAnalysisData,
    tracked_instance_field_locations: Option<FxHashMap<String, PointsToValue>>,
    /// Block visits performed by the engine
    pub iterations: usize,
    /// `false` when the iteration cap stopped the engine
    pub converged: bool,
}

impl DisposeAnalysisResult {
    pub fn cfg(&self) -> &ControlFlowGraph {
        &self.cfg
    }

    /// Entry and exit state of `block`
    pub fn block_states(&self, block: BlockId) -> Option<(&DisposeAnalysisData, &DisposeAnalysisData)> {
        self.block_states
            .get(block.index())
            .map(|(entry, exit)| (entry, exit))
    }

    /// State flowing into the CFG exit block
    pub fn exit_state(&self) -> &DisposeAnalysisData {
        &self.exit_state
    }

    pub fn value_at_exit(&self, location: LocationId) -> Option<&DisposeAbstractValue> {
        self.exit_state.get(&location)
    }

    /// Field -> points-to value of its first disposable read; `None` when
    /// field tracking was off
    pub fn tracked_instance_field_locations(&self) -> Option<&FxHashMap<String, PointsToValue>> {
        self.tracked_instance_field_locations.as_ref()
    }
}

/// Entry point of the dispose analysis
pub struct DisposeAnalysis;

impl DisposeAnalysis {
    /// Analyse the procedure owning `blocks`
    ///
    /// Fails with [`DisposeError::NoAnalysisPossible`] when no block carries
    /// a control flow graph.
    pub fn analyze(
        blocks: &[OperationBlock],
        owning_method: &MethodSymbol,
        ctx: &DisposeAnalysisContext,
    ) -> Result<DisposeAnalysisResult> {
        let procedure = owning_method.qualified_name();
        let Some(cfg) = blocks.iter().find_map(|b| b.cfg.clone()) else {
            return Err(DisposeError::no_analysis_possible(procedure));
        };

        let ctx = ctx.entering(owning_method);
        debug!(
            procedure = %procedure,
            blocks = cfg.len(),
            callee = ctx.is_callee(),
            track_instance_fields = ctx.track_instance_fields,
            "dispose analysis started"
        );

        let mut engine = ForwardDataFlowEngine::new(ctx.config.max_iterations);
        if let Some(token) = &ctx.cancellation {
            engine = engine.with_cancellation(token.clone());
        }

        let mut visitor = DisposeDataFlowOperationVisitor::new(&ctx, owning_method);
        let result = engine.run(&cfg, &mut visitor)?;
        let tracked_instance_field_locations = ctx
            .track_instance_fields
            .then(|| visitor.into_tracked_instance_field_locations());

        let iterations = result.iterations;
        let converged = result.converged;
        let exit_state = result.input(cfg.exit()).cloned().unwrap_or_default();
        let block_states = result.into_block_data();

        debug!(
            procedure = %procedure,
            iterations,
            converged,
            tracked_locations = exit_state.len(),
            "dispose analysis finished"
        );

        Ok(DisposeAnalysisResult {
            cfg,
            block_states,
            exit_state,
            tracked_instance_field_locations,
            iterations,
            converged,
        })
    }
}
