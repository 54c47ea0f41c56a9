//! Ports for the dispose analysis
//!
//! Callee bodies are only needed for interprocedural lookups; callers that
//! run intraprocedurally never implement [`ProcedureBodyProvider`].

use crate::features::points_to::PointsToResult;
use crate::shared::models::{MethodSymbol, OperationBlock};
use std::sync::Arc;

/// Operation blocks and points-to data of one procedure
#[derive(Clone)]
pub struct ProcedureBody {
    pub blocks: Vec<OperationBlock>,
    pub points_to: Arc<dyn PointsToResult>,
}

impl std::fmt::Debug for ProcedureBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcedureBody")
            .field("blocks", &self.blocks.len())
            .finish_non_exhaustive()
    }
}

/// Source of callee bodies for interprocedural lookups
pub trait ProcedureBodyProvider: Send + Sync {
    /// `None` when the body is unavailable (metadata-only, abstract, extern)
    fn body(&self, method: &MethodSymbol) -> Option<ProcedureBody>;
}
