//! Fixpoint result of a forward dataflow run

use crate::shared::models::BlockId;

/// Per-block input and output data at the fixpoint
#[derive(Debug, Clone)]
pub struct DataFlowAnalysisResult<D> {
    /// `(input, output)` indexed by `BlockId`
    block_data: Vec<(D, D)>,
    /// Block visits performed
    pub iterations: usize,
    /// `false` when the iteration cap stopped the run
    pub converged: bool,
}

impl<D> DataFlowAnalysisResult<D> {
    pub fn new(block_data: Vec<(D, D)>, iterations: usize, converged: bool) -> Self {
        Self {
            block_data,
            iterations,
            converged,
        }
    }

    pub fn input(&self, block: BlockId) -> Option<&D> {
        self.block_data.get(block.index()).map(|(input, _)| input)
    }

    pub fn output(&self, block: BlockId) -> Option<&D> {
        self.block_data.get(block.index()).map(|(_, output)| output)
    }

    pub fn block_count(&self) -> usize {
        self.block_data.len()
    }

    pub fn into_block_data(self) -> Vec<(D, D)> {
        self.block_data
    }
}
