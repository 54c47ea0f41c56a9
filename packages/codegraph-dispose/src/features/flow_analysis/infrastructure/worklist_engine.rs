//! Forward worklist dataflow engine
//!
//! Blocks are visited in reverse postorder; a block is revisited only when
//! the output of one of its predecessors changed. Each block's input is the
//! merge of its predecessors' current outputs.

use crate::errors::{DisposeError, Result};
use crate::features::flow_analysis::domain::DataFlowAnalysisResult;
use crate::features::flow_analysis::ports::DataFlowOperationVisitor;
use crate::shared::models::{BlockId, ControlFlowGraph};
use crate::shared::CancellationToken;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Default cap on block visits
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Forward fixpoint driver
#[derive(Debug, Clone)]
pub struct ForwardDataFlowEngine {
    max_iterations: usize,
    cancellation: Option<CancellationToken>,
}

impl Default for ForwardDataFlowEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

impl ForwardDataFlowEngine {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Run `visitor` over `cfg` until no block output changes
    pub fn run<V: DataFlowOperationVisitor>(
        &self,
        cfg: &ControlFlowGraph,
        visitor: &mut V,
    ) -> Result<DataFlowAnalysisResult<V::AnalysisData>> {
        let order = cfg.reverse_postorder();
        let mut position = vec![usize::MAX; cfg.len()];
        for (pos, block) in order.iter().enumerate() {
            position[block.index()] = pos;
        }

        let initial = visitor.initial_analysis_data();
        let mut inputs: Vec<Option<V::AnalysisData>> = vec![None; cfg.len()];
        let mut outputs: Vec<Option<V::AnalysisData>> = vec![None; cfg.len()];

        // Ordered by RPO position so the lowest pending block runs first.
        let mut worklist: BTreeSet<usize> = (0..order.len()).collect();
        let mut iterations = 0usize;
        let mut converged = true;

        while let Some(pos) = worklist.pop_first() {
            if let Some(token) = &self.cancellation {
                if token.is_cancelled() {
                    debug!(iterations, "dataflow run cancelled");
                    return Err(DisposeError::Cancelled);
                }
            }

            iterations += 1;
            if iterations > self.max_iterations {
                warn!(
                    max_iterations = self.max_iterations,
                    pending = worklist.len() + 1,
                    "dataflow iteration cap reached, stopping before fixpoint"
                );
                converged = false;
                iterations -= 1;
                break;
            }

            let block_id = order[pos];
            let Some(block) = cfg.block(block_id) else {
                continue;
            };

            let input = if block_id == cfg.entry() {
                initial.clone()
            } else {
                self.merge_predecessors(visitor, &block.predecessors, &outputs)
                    .unwrap_or_else(|| initial.clone())
            };

            let mut output = visitor.flow(block, input.clone())?;
            inputs[block_id.index()] = Some(input);

            let changed = match &outputs[block_id.index()] {
                None => true,
                Some(old) => match visitor.compare_analysis_data(old, &output) {
                    Ordering::Equal => false,
                    Ordering::Less => true,
                    Ordering::Greater => {
                        warn!(block = %block_id, "non-monotonic block output, widening");
                        output = visitor.merge_analysis_data(old, &output);
                        visitor.compare_analysis_data(old, &output) != Ordering::Equal
                    }
                },
            };

            if changed {
                outputs[block_id.index()] = Some(output);
                for succ in &block.successors {
                    let succ_pos = position[succ.index()];
                    if succ_pos != usize::MAX {
                        worklist.insert(succ_pos);
                    }
                }
            }
        }

        debug!(iterations, converged, blocks = cfg.len(), "dataflow run finished");

        let block_data = inputs
            .into_iter()
            .zip(outputs)
            .map(|(input, output)| {
                let input = input.unwrap_or_else(|| initial.clone());
                let output = output.unwrap_or_else(|| input.clone());
                (input, output)
            })
            .collect();

        Ok(DataFlowAnalysisResult::new(block_data, iterations, converged))
    }

    fn merge_predecessors<V: DataFlowOperationVisitor>(
        &self,
        visitor: &V,
        predecessors: &[BlockId],
        outputs: &[Option<V::AnalysisData>],
    ) -> Option<V::AnalysisData> {
        predecessors
            .iter()
            .filter_map(|p| outputs.get(p.index()).and_then(|o| o.as_ref()))
            .fold(None, |acc: Option<V::AnalysisData>, out| match acc {
                None => Some(out.clone()),
                Some(acc) => Some(visitor.merge_analysis_data(&acc, out)),
            })
    }
}
