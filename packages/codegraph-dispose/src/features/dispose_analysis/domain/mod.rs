pub mod analysis_data;
pub mod dispose_domain;
pub mod dispose_value;
pub mod leak;

pub use analysis_data::{dispose_analysis_domain, DisposeAnalysisData, DisposeAnalysisDomain};
pub use dispose_domain::DisposeAbstractValueDomain;
pub use dispose_value::{DisposeAbstractValue, DisposeAbstractValueKind};
pub use leak::{DisposeLeak, LeakKind};
