//! Ports for the dataflow engine

use crate::errors::Result;
use crate::shared::models::BasicBlock;
use std::cmp::Ordering;

/// Transfer functions and data algebra driven by the engine
pub trait DataFlowOperationVisitor {
    /// Analysis state at one program point
    type AnalysisData: Clone;

    /// Input of the entry block
    fn initial_analysis_data(&self) -> Self::AnalysisData;

    fn merge_analysis_data(
        &self,
        a: &Self::AnalysisData,
        b: &Self::AnalysisData,
    ) -> Self::AnalysisData;

    /// See [`AbstractValueDomain::compare`](crate::features::flow_analysis::domain::AbstractValueDomain::compare)
    fn compare_analysis_data(&self, old: &Self::AnalysisData, new: &Self::AnalysisData)
        -> Ordering;

    /// Apply every operation of `block` to `data`, returning the block output
    fn flow(&mut self, block: &BasicBlock, data: Self::AnalysisData)
        -> Result<Self::AnalysisData>;
}
