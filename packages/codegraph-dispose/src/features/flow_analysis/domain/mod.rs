pub mod abstract_domain;
pub mod analysis_result;

pub use abstract_domain::{AbstractValueDomain, MapAbstractDomain, SetAbstractDomain};
pub use analysis_result::DataFlowAnalysisResult;
