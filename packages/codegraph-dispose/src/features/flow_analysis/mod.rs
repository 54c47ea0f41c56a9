//! Generic forward dataflow framework
//!
//! Abstract value domains plus a worklist fixpoint engine. Analyses plug in
//! through [`DataFlowOperationVisitor`].

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{AbstractValueDomain, DataFlowAnalysisResult, MapAbstractDomain, SetAbstractDomain};
pub use infrastructure::{ForwardDataFlowEngine, DEFAULT_MAX_ITERATIONS};
pub use ports::DataFlowOperationVisitor;
